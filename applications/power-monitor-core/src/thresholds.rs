use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::alerts::Severity;

pub const DEFAULT_GLOBAL_WARNING_W: f64 = 500.0;
pub const DEFAULT_GLOBAL_CRITICAL_W: f64 = 1000.0;
pub const DEFAULT_ROOM_WARNING_W: f64 = 300.0;
pub const DEFAULT_ROOM_CRITICAL_W: f64 = 500.0;

/// Warning and critical power levels in watts. Valid pairs have
/// `warning < critical`, see [`crate::validation::validate_threshold_pair`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub warning: f64,
    pub critical: f64,
}

impl ThresholdPair {
    pub fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }

    /// Defaults for total system power.
    pub fn global_default() -> Self {
        Self::new(DEFAULT_GLOBAL_WARNING_W, DEFAULT_GLOBAL_CRITICAL_W)
    }

    /// Defaults applied when a room pair is created without explicit values.
    pub fn room_default() -> Self {
        Self::new(DEFAULT_ROOM_WARNING_W, DEFAULT_ROOM_CRITICAL_W)
    }

    /// Critical wins over warning; `None` below the warning level.
    pub fn classify(&self, power_watts: f64) -> Option<Severity> {
        if power_watts >= self.critical {
            Some(Severity::Critical)
        } else if power_watts >= self.warning {
            Some(Severity::Warning)
        } else {
            None
        }
    }

    /// The level that was crossed for `severity`.
    pub fn level(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Critical => self.critical,
            _ => self.warning,
        }
    }
}

impl Default for ThresholdPair {
    fn default() -> Self {
        Self::global_default()
    }
}

/// Per-room pairs keyed by room id (`room5`, `room7`, ...). Rooms without an
/// entry are not checked individually.
pub type RoomThresholds = HashMap<String, ThresholdPair>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        let pair = ThresholdPair::global_default();
        assert_eq!(pair.classify(499.9), None);
        assert_eq!(pair.classify(500.0), Some(Severity::Warning));
        assert_eq!(pair.classify(999.0), Some(Severity::Warning));
        assert_eq!(pair.classify(1000.0), Some(Severity::Critical));
        assert_eq!(pair.classify(5000.0), Some(Severity::Critical));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ThresholdPair::default(), ThresholdPair::new(500.0, 1000.0));
        assert_eq!(ThresholdPair::room_default(), ThresholdPair::new(300.0, 500.0));
    }

    #[test]
    fn test_level_for_severity() {
        let pair = ThresholdPair::room_default();
        assert_eq!(pair.level(Severity::Warning), 300.0);
        assert_eq!(pair.level(Severity::Critical), 500.0);
    }
}
