use power_monitor_core::{calculate_band_usage, CostBreakdown, TierSchedule, VatRate};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Largest monthly consumption accepted for a quote.
pub const MAX_QUOTE_KWH: f64 = 1.0e9;

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub kwh: f64,
}

impl QuoteRequest {
    pub fn validate(&self) -> Result<()> {
        if !self.kwh.is_finite() || self.kwh > MAX_QUOTE_KWH {
            return Err(AppError::InvalidInput(format!(
                "kwh must be a number no greater than {}",
                MAX_QUOTE_KWH
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct BandUsage {
    pub label: String,
    pub kwh: f64,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub kwh: f64,
    pub vat_percent: u8,
    #[serde(flatten)]
    pub cost: CostBreakdown,
    pub bands: Vec<BandUsage>,
}

impl QuoteResponse {
    pub fn new(kwh: f64, schedule: &TierSchedule, vat: VatRate, cost: CostBreakdown) -> Self {
        let bands = schedule
            .band_labels()
            .into_iter()
            .zip(calculate_band_usage(kwh, schedule))
            .zip(schedule.prices)
            .map(|((label, kwh), price)| BandUsage { label, kwh, price })
            .collect();

        Self {
            kwh,
            vat_percent: vat.percent(),
            cost,
            bands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_request_bounds() {
        assert!(QuoteRequest { kwh: 120.0 }.validate().is_ok());
        assert!(QuoteRequest { kwh: -5.0 }.validate().is_ok());
        assert!(QuoteRequest { kwh: MAX_QUOTE_KWH }.validate().is_ok());
        assert!(matches!(
            QuoteRequest { kwh: 1.0e16 }.validate(),
            Err(AppError::InvalidInput(_))
        ));
        assert!(QuoteRequest { kwh: f64::NAN }.validate().is_err());
        assert!(QuoteRequest { kwh: f64::INFINITY }.validate().is_err());
    }
}
