use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tokio::sync::RwLock;

use crate::error::AppError;

/// Relay channel of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceId {
    Device0,
    Device1,
}

impl FromStr for DeviceId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "device0" => Ok(DeviceId::Device0),
            "device1" => Ok(DeviceId::Device1),
            other => Err(AppError::InvalidInput(format!("unknown device '{}'", other))),
        }
    }
}

/// Relay states of one slave. `sync` is set while a command waits for the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStates {
    pub slave_id: u16,
    pub device0: bool,
    pub device1: bool,
    pub sync: bool,
}

impl DeviceStates {
    fn new(slave_id: u16) -> Self {
        Self {
            slave_id,
            device0: false,
            device1: false,
            sync: false,
        }
    }
}

/// Command sent to the bridge for one slave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayCommand {
    pub slave_id: u16,
    pub device0: bool,
    pub device1: bool,
}

/// Desired relay states per slave, shared between the dashboard and the bridge.
#[derive(Default)]
pub struct CommandsRepository {
    states: RwLock<BTreeMap<u16, DeviceStates>>,
}

impl CommandsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, slave_id: u16) -> Option<DeviceStates> {
        self.states.read().await.get(&slave_id).copied()
    }

    pub async fn all(&self) -> BTreeMap<u16, DeviceStates> {
        self.states.read().await.clone()
    }

    /// Set one relay and mark the slave as pending.
    pub async fn toggle(&self, slave_id: u16, device: DeviceId, state: bool) -> DeviceStates {
        let mut states = self.states.write().await;
        let entry = states
            .entry(slave_id)
            .or_insert_with(|| DeviceStates::new(slave_id));
        match device {
            DeviceId::Device0 => entry.device0 = state,
            DeviceId::Device1 => entry.device1 = state,
        }
        entry.sync = true;
        *entry
    }

    /// Mirror relay states reported by the slave. Skipped while a command is
    /// pending so that telemetry does not undo the user's toggle.
    pub async fn sync_from_telemetry(
        &self,
        slave_id: u16,
        device0: Option<bool>,
        device1: Option<bool>,
    ) {
        if device0.is_none() && device1.is_none() {
            return;
        }

        let mut states = self.states.write().await;
        let entry = states
            .entry(slave_id)
            .or_insert_with(|| DeviceStates::new(slave_id));
        if entry.sync {
            return;
        }
        if let Some(state) = device0 {
            entry.device0 = state;
        }
        if let Some(state) = device1 {
            entry.device1 = state;
        }
    }

    /// Hand every pending command to the bridge and clear the pending flag.
    pub async fn drain_pending(&self) -> Vec<RelayCommand> {
        let mut states = self.states.write().await;
        states
            .values_mut()
            .filter(|s| s.sync)
            .map(|s| {
                s.sync = false;
                RelayCommand {
                    slave_id: s.slave_id,
                    device0: s.device0,
                    device1: s.device1,
                }
            })
            .collect()
    }
}
