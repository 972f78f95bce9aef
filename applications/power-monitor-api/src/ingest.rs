//! Decoding of the register frames a room's Modbus slave publishes.
//!
//! Registers are integers scaled to keep decimals:
//!
//! | register | meaning        | scale        |
//! |----------|----------------|--------------|
//! | 40000    | voltage (V)    | x10          |
//! | 40001    | current (A)    | x100         |
//! | 40002    | power (W)      | x1           |
//! | 40003    | energy (kWh)   | x1000 (Wh)   |
//! | 40004    | device 0 relay | 0 / 1        |
//! | 40005    | device 1 relay | 0 / 1        |
//!
//! Raw values outside `0..=u32::MAX` are rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::repositories::{CommandsRepository, ReadingsRepository};

pub const REG_VOLTAGE: u16 = 40000;
pub const REG_CURRENT: u16 = 40001;
pub const REG_POWER: u16 = 40002;
pub const REG_ENERGY: u16 = 40003;
pub const REG_DEVICE0: u16 = 40004;
pub const REG_DEVICE1: u16 = 40005;

/// Payload as published by the field bridge: `{"slaveId": 5, "regs": {"40000": 2203}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModbusFrame {
    #[serde(rename = "slaveId")]
    pub slave_id: u16,
    pub regs: BTreeMap<String, i64>,
}

/// Decoded values of one frame. Registers missing from the frame stay `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegisterSnapshot {
    pub voltage: Option<f64>,
    pub current_amps: Option<f64>,
    pub power_watts: Option<f64>,
    pub energy_kwh: Option<f64>,
    pub device0: Option<bool>,
    pub device1: Option<bool>,
}

impl ModbusFrame {
    pub fn decode(&self) -> Result<RegisterSnapshot> {
        let mut snapshot = RegisterSnapshot::default();

        for (key, value) in &self.regs {
            let register: u16 = key.trim().parse().map_err(|_| {
                AppError::InvalidInput(format!("register '{}' is not a number", key))
            })?;
            let value = *value;
            if !(0..=i64::from(u32::MAX)).contains(&value) {
                return Err(AppError::InvalidInput(format!(
                    "register {} value {} is out of range",
                    register, value
                )));
            }

            match register {
                REG_VOLTAGE => snapshot.voltage = Some(value as f64 / 10.0),
                REG_CURRENT => snapshot.current_amps = Some(value as f64 / 100.0),
                REG_POWER => snapshot.power_watts = Some(value as f64),
                REG_ENERGY => snapshot.energy_kwh = Some(value as f64 / 1000.0),
                REG_DEVICE0 => snapshot.device0 = Some(value != 0),
                REG_DEVICE1 => snapshot.device1 = Some(value != 0),
                other => debug!(slave_id = self.slave_id, register = other, "ignoring unknown register"),
            }
        }

        Ok(snapshot)
    }
}

/// Store a frame and mirror its relay states into the command table.
pub async fn ingest_frame(
    readings: &ReadingsRepository,
    commands: &CommandsRepository,
    frame: &ModbusFrame,
    received_at: DateTime<Utc>,
) -> Result<RegisterSnapshot> {
    let snapshot = frame.decode()?;

    readings.record(frame.slave_id, snapshot, received_at).await;
    commands
        .sync_from_telemetry(frame.slave_id, snapshot.device0, snapshot.device1)
        .await;

    debug!(
        slave_id = frame.slave_id,
        power = ?snapshot.power_watts,
        "frame ingested"
    );

    Ok(snapshot)
}
