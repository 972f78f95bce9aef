use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::repositories::{DeviceId, DeviceStates, RelayCommand};

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    /// `room<slave>`, e.g. `room5`.
    pub room_id: String,
    pub device_id: String,
    pub state: bool,
}

impl ToggleRequest {
    pub fn slave_id(&self) -> Result<u16> {
        self.room_id
            .strip_prefix("room")
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| AppError::InvalidInput(format!("invalid room_id '{}'", self.room_id)))
    }

    pub fn device(&self) -> Result<DeviceId> {
        self.device_id.parse()
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub success: bool,
    #[serde(flatten)]
    pub states: DeviceStates,
}

#[derive(Debug, Serialize)]
pub struct PendingCommandsResponse {
    pub commands: Vec<RelayCommand>,
}
