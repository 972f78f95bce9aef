//! Tiered electricity cost and power alert evaluation.
//!
//! Everything here is a pure function of its inputs: no I/O, no state kept
//! between calls. The monitoring service calls into it once per refresh.

pub mod alerts;
pub mod error;
pub mod reading;
pub mod relative_time;
pub mod settings;
pub mod tariff;
pub mod thresholds;
pub mod validation;

pub use alerts::{evaluate_alerts, AlertCode, AlertEvaluator, AlertEvent, AlertReport, Severity};
pub use error::{EvaluatorError, Result};
pub use reading::{total_power, RoomReading};
pub use relative_time::{relative_time, relative_time_in, Locale};
pub use settings::{EmailSettings, Settings};
pub use tariff::{
    calculate_band_usage, calculate_tier_cost, project_monthly_kwh, CostBreakdown, TierLimits,
    TierSchedule, VatRate, MAX_BILLABLE_SUBTOTAL, MONTH_PROJECTION_DAYS, TIER_COUNT,
};
pub use thresholds::{RoomThresholds, ThresholdPair};
pub use validation::{
    validate_room_thresholds, validate_threshold_pair, validate_tier_schedule, validate_vat,
};
