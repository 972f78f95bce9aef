//! Validators for user-edited settings.
//!
//! Each returns the accepted value or an error naming exactly what is wrong.

use crate::error::{EvaluatorError, Result};
use crate::tariff::{TierSchedule, VatRate};
use crate::thresholds::{RoomThresholds, ThresholdPair};

pub fn validate_threshold_pair(pair: ThresholdPair) -> Result<ThresholdPair> {
    if !pair.warning.is_finite() || !pair.critical.is_finite() {
        return Err(EvaluatorError::InvalidThreshold(
            "thresholds must be finite numbers".to_string(),
        ));
    }
    if pair.warning < 0.0 || pair.critical < 0.0 {
        return Err(EvaluatorError::InvalidThreshold(
            "thresholds must not be negative".to_string(),
        ));
    }
    if pair.warning >= pair.critical {
        return Err(EvaluatorError::InvalidThreshold(format!(
            "warning ({}W) must be lower than critical ({}W)",
            pair.warning, pair.critical
        )));
    }
    Ok(pair)
}

/// Validate every room pair; the error names the first offending room.
pub fn validate_room_thresholds(thresholds: RoomThresholds) -> Result<RoomThresholds> {
    let mut room_ids: Vec<&String> = thresholds.keys().collect();
    room_ids.sort();

    for room_id in room_ids {
        if room_id.trim().is_empty() {
            return Err(EvaluatorError::InvalidThreshold(
                "room id must not be empty".to_string(),
            ));
        }
        validate_threshold_pair(thresholds[room_id]).map_err(|e| {
            EvaluatorError::InvalidThreshold(format!("{}: {}", room_id, e.reason()))
        })?;
    }
    Ok(thresholds)
}

pub fn validate_vat(value: i64) -> Result<VatRate> {
    match u8::try_from(value) {
        Ok(percent) if percent <= 100 => Ok(VatRate::from_checked(percent)),
        _ => Err(EvaluatorError::InvalidVat(format!(
            "VAT must be between 0 and 100, got {}",
            value
        ))),
    }
}

pub fn validate_tier_schedule(schedule: TierSchedule) -> Result<TierSchedule> {
    ensure_tier_schedule(&schedule)?;
    Ok(schedule)
}

pub(crate) fn ensure_tier_schedule(schedule: &TierSchedule) -> Result<()> {
    let limits = schedule.limits.as_array();
    for (i, pair) in limits.windows(2).enumerate() {
        if pair[0] >= pair[1] {
            return Err(EvaluatorError::InvalidTierSchedule(format!(
                "tier{} ({}) must be lower than tier{} ({})",
                i + 1,
                pair[0],
                i + 2,
                pair[1]
            )));
        }
    }

    for (i, price) in schedule.prices.iter().enumerate() {
        if !price.is_finite() || *price < 0.0 {
            return Err(EvaluatorError::InvalidTierSchedule(format!(
                "price of band {} must be a non-negative number, got {}",
                i + 1,
                price
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tariff::{TierLimits, DEFAULT_TIER_PRICES};

    #[test]
    fn test_threshold_pair_requires_strict_order() {
        let err = validate_threshold_pair(ThresholdPair::new(500.0, 500.0)).unwrap_err();
        assert!(matches!(err, EvaluatorError::InvalidThreshold(_)));
        assert_eq!(err.reason(), "warning (500W) must be lower than critical (500W)");

        assert!(validate_threshold_pair(ThresholdPair::new(600.0, 500.0)).is_err());
        assert!(validate_threshold_pair(ThresholdPair::new(499.0, 500.0)).is_ok());
    }

    #[test]
    fn test_threshold_pair_rejects_nonsense() {
        assert!(validate_threshold_pair(ThresholdPair::new(-1.0, 500.0)).is_err());
        assert!(validate_threshold_pair(ThresholdPair::new(f64::NAN, 500.0)).is_err());
        assert!(validate_threshold_pair(ThresholdPair::new(100.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn test_room_thresholds_name_the_room() {
        let thresholds: RoomThresholds = [
            ("room5".to_string(), ThresholdPair::new(300.0, 500.0)),
            ("room7".to_string(), ThresholdPair::new(500.0, 300.0)),
        ]
        .into_iter()
        .collect();

        let err = validate_room_thresholds(thresholds).unwrap_err();
        assert!(matches!(err, EvaluatorError::InvalidThreshold(_)));
        assert!(err.reason().starts_with("room7: "));
    }

    #[test]
    fn test_vat_range() {
        assert_eq!(validate_vat(0).unwrap().percent(), 0);
        assert_eq!(validate_vat(100).unwrap().percent(), 100);
        assert!(matches!(validate_vat(101), Err(EvaluatorError::InvalidVat(_))));
        assert!(matches!(validate_vat(-1), Err(EvaluatorError::InvalidVat(_))));
        assert!(matches!(validate_vat(1000), Err(EvaluatorError::InvalidVat(_))));
    }

    #[test]
    fn test_tier_schedule_must_increase() {
        assert!(validate_tier_schedule(TierSchedule::default()).is_ok());

        let schedule = TierSchedule::new(
            TierLimits {
                tier1: 50,
                tier2: 100,
                tier3: 90,
                tier4: 300,
                tier5: 400,
            },
            DEFAULT_TIER_PRICES,
        );
        let err = validate_tier_schedule(schedule).unwrap_err();
        assert!(matches!(err, EvaluatorError::InvalidTierSchedule(_)));
        assert_eq!(err.reason(), "tier2 (100) must be lower than tier3 (90)");
    }

    #[test]
    fn test_tier_schedule_rejects_negative_price() {
        let mut schedule = TierSchedule::default();
        schedule.prices[0] = -5.0;
        assert!(matches!(
            validate_tier_schedule(schedule),
            Err(EvaluatorError::InvalidTierSchedule(_))
        ));
    }
}
