//! Inclining block tariff.
//!
//! Monthly consumption is split into six bands by five kWh limits. Each band
//! is billed at its own unit price and VAT is added on top of the subtotal.
//! A limit belongs to the band below it: with `tier1 = 50`, the 50th kWh is
//! still billed at the first price and the 51st at the second.

use serde::{Deserialize, Serialize};

use crate::error::{EvaluatorError, Result};
use crate::validation;

/// Number of billing bands (five limits plus the open-ended top band).
pub const TIER_COUNT: usize = 6;

pub const DEFAULT_TIER_LIMITS: TierLimits = TierLimits {
    tier1: 50,
    tier2: 100,
    tier3: 200,
    tier4: 300,
    tier5: 400,
};

pub const DEFAULT_TIER_PRICES: [f64; TIER_COUNT] = [1984.0, 2050.0, 2380.0, 2998.0, 3350.0, 3460.0];

pub const DEFAULT_VAT_PERCENT: u8 = 8;

/// Largest pre-tax subtotal, in currency units, that can be billed. With VAT
/// capped at 100% the total stays within `i64`.
pub const MAX_BILLABLE_SUBTOTAL: f64 = 4.0e18;

/// Days used to project a daily meter reading onto a month.
pub const MONTH_PROJECTION_DAYS: u32 = 30;

/// Upper kWh bound of bands 1 to 5, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLimits {
    pub tier1: u32,
    pub tier2: u32,
    pub tier3: u32,
    pub tier4: u32,
    pub tier5: u32,
}

impl TierLimits {
    pub fn as_array(&self) -> [u32; TIER_COUNT - 1] {
        [self.tier1, self.tier2, self.tier3, self.tier4, self.tier5]
    }
}

impl Default for TierLimits {
    fn default() -> Self {
        DEFAULT_TIER_LIMITS
    }
}

/// Band limits and the unit price (currency per kWh) of every band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSchedule {
    pub limits: TierLimits,
    pub prices: [f64; TIER_COUNT],
}

impl Default for TierSchedule {
    fn default() -> Self {
        Self {
            limits: DEFAULT_TIER_LIMITS,
            prices: DEFAULT_TIER_PRICES,
        }
    }
}

/// One billing band: `(floor, ceiling]` kWh, or `[0, ceiling]` for the first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub floor: f64,
    pub ceiling: Option<f64>,
    pub price: f64,
}

impl TierSchedule {
    pub fn new(limits: TierLimits, prices: [f64; TIER_COUNT]) -> Self {
        Self { limits, prices }
    }

    /// Bands in billing order. The last band has no ceiling.
    pub fn bands(&self) -> [Band; TIER_COUNT] {
        let limits = self.limits.as_array();
        std::array::from_fn(|i| Band {
            floor: if i == 0 { 0.0 } else { f64::from(limits[i - 1]) },
            ceiling: limits.get(i).map(|limit| f64::from(*limit)),
            price: self.prices[i],
        })
    }

    /// Display labels, e.g. `0-50`, `51-100`, ..., `>400`.
    pub fn band_labels(&self) -> [String; TIER_COUNT] {
        let limits = self.limits.as_array();
        std::array::from_fn(|i| match (i, limits.get(i)) {
            (0, Some(upper)) => format!("0-{}", upper),
            (_, Some(upper)) => format!("{}-{}", limits[i - 1] + 1, upper),
            (_, None) => format!(">{}", limits[TIER_COUNT - 2]),
        })
    }
}

/// VAT percentage, always within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct VatRate(u8);

impl VatRate {
    pub fn percent(&self) -> u8 {
        self.0
    }

    pub(crate) fn from_checked(percent: u8) -> Self {
        Self(percent)
    }
}

impl Default for VatRate {
    fn default() -> Self {
        Self(DEFAULT_VAT_PERCENT)
    }
}

impl TryFrom<i64> for VatRate {
    type Error = EvaluatorError;

    fn try_from(value: i64) -> Result<Self> {
        validation::validate_vat(value)
    }
}

impl From<VatRate> for u8 {
    fn from(value: VatRate) -> u8 {
        value.0
    }
}

/// Cost in whole currency units. `total == subtotal + vat_amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub subtotal: i64,
    pub vat_amount: i64,
    pub total: i64,
}

/// Price `monthly_kwh` against `schedule` and add VAT.
///
/// Negative or NaN consumption is billed as zero. A schedule whose limits are
/// not strictly increasing, or that carries a negative price, is rejected with
/// [`EvaluatorError::InvalidConfiguration`]. Consumption whose subtotal is not
/// finite or exceeds [`MAX_BILLABLE_SUBTOTAL`] is rejected with
/// [`EvaluatorError::ConsumptionOutOfRange`].
pub fn calculate_tier_cost(
    monthly_kwh: f64,
    schedule: &TierSchedule,
    vat: VatRate,
) -> Result<CostBreakdown> {
    validation::ensure_tier_schedule(schedule)
        .map_err(|e| EvaluatorError::InvalidConfiguration(e.reason().to_string()))?;

    let raw_subtotal: f64 = calculate_band_usage(monthly_kwh, schedule)
        .iter()
        .zip(schedule.prices.iter())
        .map(|(kwh, price)| kwh * price)
        .sum();
    let raw_vat = raw_subtotal * f64::from(vat.percent()) / 100.0;

    let subtotal = to_currency_units(raw_subtotal, monthly_kwh)?;
    let vat_amount = to_currency_units(raw_vat, monthly_kwh)?;
    let total = subtotal
        .checked_add(vat_amount)
        .ok_or_else(|| out_of_range(monthly_kwh))?;

    Ok(CostBreakdown {
        subtotal,
        vat_amount,
        total,
    })
}

fn to_currency_units(raw: f64, monthly_kwh: f64) -> Result<i64> {
    if !raw.is_finite() || raw > MAX_BILLABLE_SUBTOTAL {
        return Err(out_of_range(monthly_kwh));
    }
    Ok(raw.round() as i64)
}

fn out_of_range(monthly_kwh: f64) -> EvaluatorError {
    EvaluatorError::ConsumptionOutOfRange(format!(
        "{} kWh exceeds the largest billable amount",
        monthly_kwh
    ))
}

/// kWh falling into each band, in band order.
pub fn calculate_band_usage(monthly_kwh: f64, schedule: &TierSchedule) -> [f64; TIER_COUNT] {
    let kwh = clamp_consumption(monthly_kwh);
    let mut usage = [0.0; TIER_COUNT];

    for (slot, band) in usage.iter_mut().zip(schedule.bands()) {
        if kwh <= band.floor {
            break;
        }
        let upper = band.ceiling.map_or(kwh, |ceiling| kwh.min(ceiling));
        *slot = upper - band.floor;
    }

    usage
}

/// Scale a daily reading to a month of `days` days.
pub fn project_monthly_kwh(daily_kwh: f64, days: u32) -> f64 {
    clamp_consumption(daily_kwh) * f64::from(days)
}

fn clamp_consumption(kwh: f64) -> f64 {
    if kwh.is_nan() || kwh < 0.0 {
        0.0
    } else {
        kwh
    }
}
