use serde::{Deserialize, Serialize};

/// Latest values reported for one room.
///
/// `is_stale` is decided by the data source (no report within its freshness
/// window). A stale room's power is unknown rather than zero, so the evaluator
/// leaves it out of totals, per-room checks and the inactive list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomReading {
    pub room_id: String,
    pub name: String,
    pub power_watts: f64,
    #[serde(default)]
    pub voltage: Option<f64>,
    #[serde(default)]
    pub current_amps: Option<f64>,
    #[serde(default)]
    pub energy_kwh: Option<f64>,
    #[serde(default)]
    pub month_cost: Option<i64>,
    #[serde(default)]
    pub is_stale: bool,
    #[serde(default)]
    pub stale_seconds: Option<u64>,
}

impl RoomReading {
    pub fn new(room_id: impl Into<String>, name: impl Into<String>, power_watts: f64) -> Self {
        Self {
            room_id: room_id.into(),
            name: name.into(),
            power_watts,
            voltage: None,
            current_amps: None,
            energy_kwh: None,
            month_cost: None,
            is_stale: false,
            stale_seconds: None,
        }
    }

    pub fn stale(mut self, seconds: u64) -> Self {
        self.is_stale = true;
        self.stale_seconds = Some(seconds);
        self
    }

    /// Power used for aggregation and alerting: zero while stale.
    pub fn effective_power(&self) -> f64 {
        if self.is_stale {
            0.0
        } else {
            self.power_watts
        }
    }

    /// Reported zero power, as opposed to having timed out.
    pub fn is_inactive(&self) -> bool {
        !self.is_stale && self.power_watts == 0.0
    }
}

/// Sum of effective power over all rooms.
pub fn total_power(rooms: &[RoomReading]) -> f64 {
    rooms.iter().map(RoomReading::effective_power).sum()
}
