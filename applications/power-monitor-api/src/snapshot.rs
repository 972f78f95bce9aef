//! Dashboard view assembled from the latest frames, relay states and settings.

use chrono::{DateTime, Utc};
use power_monitor_core::{
    calculate_tier_cost, project_monthly_kwh, AlertEvaluator, AlertReport, CostBreakdown,
    RoomReading, Settings,
};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::repositories::{DeviceStates, LatestReading};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomView {
    pub slave_id: u16,
    pub name: String,
    pub power: f64,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub energy_kwh: Option<f64>,
    /// Cost of the meter reading so far.
    pub cost: i64,
    pub month_cost: i64,
    pub timeout: bool,
    pub seconds_ago: i64,
    pub device0: bool,
    pub device1: bool,
    pub command_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub power: f64,
    pub today_kwh: f64,
    pub today_cost: CostBreakdown,
    pub month_kwh: f64,
    pub month_cost: CostBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub rooms: BTreeMap<String, RoomView>,
    pub totals: Totals,
    pub alerts: AlertReport,
    pub last_update: Option<DateTime<Utc>>,
    pub generated_at: DateTime<Utc>,
}

pub fn room_id(slave_id: u16) -> String {
    format!("room{}", slave_id)
}

/// Build the dashboard for `now`.
///
/// A room is stale when its last frame is more than `stale_after_secs` away
/// from `now` in either direction. Stale rooms show 0 W and are left out of
/// the totals.
pub fn build_snapshot(
    monitor: &MonitorConfig,
    evaluator: &AlertEvaluator,
    settings: &Settings,
    readings: &[LatestReading],
    devices: &BTreeMap<u16, DeviceStates>,
    now: DateTime<Utc>,
) -> Result<DashboardSnapshot> {
    let mut rooms = BTreeMap::new();
    let mut room_readings = Vec::with_capacity(readings.len());
    let mut total_power = 0.0;
    let mut today_kwh = 0.0;

    for latest in readings {
        let id = room_id(latest.slave_id);
        let name = monitor.room_name(latest.slave_id);
        let seconds_ago = (now - latest.received_at).num_seconds();
        let timeout = seconds_ago.unsigned_abs() > monitor.stale_after_secs;

        let snapshot = &latest.snapshot;
        let power = if timeout {
            0.0
        } else {
            snapshot.power_watts.unwrap_or(0.0)
        };
        let energy = snapshot.energy_kwh.unwrap_or(0.0);

        let cost = calculate_tier_cost(energy, &settings.tiers, settings.vat)?;
        let month_cost = calculate_tier_cost(
            project_monthly_kwh(energy, monitor.month_projection_days),
            &settings.tiers,
            settings.vat,
        )?;

        if !timeout {
            total_power += power;
            today_kwh += energy;
        }

        let mut reading = RoomReading::new(id.clone(), name.clone(), power);
        reading.voltage = snapshot.voltage;
        reading.current_amps = snapshot.current_amps;
        reading.energy_kwh = snapshot.energy_kwh;
        reading.month_cost = Some(month_cost.total);
        if timeout {
            reading = reading.stale(seconds_ago.unsigned_abs());
        }
        room_readings.push(reading);

        let states = devices.get(&latest.slave_id);
        rooms.insert(
            id,
            RoomView {
                slave_id: latest.slave_id,
                name,
                power,
                voltage: snapshot.voltage,
                current: snapshot.current_amps,
                energy_kwh: snapshot.energy_kwh,
                cost: cost.total,
                month_cost: month_cost.total,
                timeout,
                seconds_ago,
                device0: states.map_or(false, |s| s.device0),
                device1: states.map_or(false, |s| s.device1),
                command_pending: states.map_or(false, |s| s.sync),
            },
        );
    }

    let month_kwh = project_monthly_kwh(today_kwh, monitor.month_projection_days);
    let totals = Totals {
        power: total_power,
        today_kwh,
        today_cost: calculate_tier_cost(today_kwh, &settings.tiers, settings.vat)?,
        month_kwh,
        month_cost: calculate_tier_cost(month_kwh, &settings.tiers, settings.vat)?,
    };

    let last_update = readings.iter().map(|r| r.received_at).max();
    let alerts = evaluator.evaluate(
        &room_readings,
        &settings.thresholds,
        &settings.room_thresholds,
        last_update.unwrap_or(now).timestamp_millis(),
        now.timestamp_millis(),
    );

    Ok(DashboardSnapshot {
        rooms,
        totals,
        alerts,
        last_update,
        generated_at: now,
    })
}
