use crate::error::{AppError, Result};
use power_monitor_core::{
    validate_room_thresholds, validate_threshold_pair, validate_tier_schedule, Locale, Settings,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    /// Settings in effect until the first edit through the API.
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

fn default_api_host() -> String {
    "0.0.0.0".into()
}

fn default_api_port() -> u16 {
    5000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// A room whose last frame is older than this is shown as disconnected.
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,
    /// Days used to project the meter reading onto a monthly bill.
    #[serde(default = "default_month_projection_days")]
    pub month_projection_days: u32,
    /// Power samples kept for the chart.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
}

fn default_stale_after_secs() -> u64 {
    60
}

fn default_month_projection_days() -> u32 {
    power_monitor_core::MONTH_PROJECTION_DAYS
}

fn default_history_capacity() -> usize {
    20_000
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            stale_after_secs: default_stale_after_secs(),
            month_projection_days: default_month_projection_days(),
            history_capacity: default_history_capacity(),
            rooms: Vec::new(),
        }
    }
}

impl MonitorConfig {
    /// Display name of a slave, `Phòng <id>` when not configured.
    pub fn room_name(&self, slave_id: u16) -> String {
        self.rooms
            .iter()
            .find(|r| r.slave_id == slave_id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| format!("Phòng {}", slave_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    pub slave_id: u16,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default)]
    pub locale: Locale,
}

impl Config {
    /// Load YAML from disk, substitute $(VAR) with env vars, then parse and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let expanded = expand_env_vars(&raw)?;
        let config: Config = serde_yaml::from_str(&expanded)?;

        config.validate()?;

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    fn validate(&self) -> Result<()> {
        if self.api.port == 0 {
            return Err(AppError::Config("API port cannot be 0".to_string()));
        }

        if self.monitor.stale_after_secs == 0 {
            return Err(AppError::Config(
                "monitor.stale_after_secs must be greater than 0".to_string(),
            ));
        }

        if self.monitor.month_projection_days == 0 {
            return Err(AppError::Config(
                "monitor.month_projection_days must be greater than 0".to_string(),
            ));
        }

        if self.monitor.history_capacity == 0 {
            return Err(AppError::Config(
                "monitor.history_capacity must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for room in &self.monitor.rooms {
            if !seen.insert(room.slave_id) {
                return Err(AppError::Config(format!(
                    "slave {} is configured more than once",
                    room.slave_id
                )));
            }
        }

        validate_threshold_pair(self.settings.thresholds)
            .and_then(|_| validate_tier_schedule(self.settings.tiers.clone()))
            .and_then(|_| validate_room_thresholds(self.settings.room_thresholds.clone()))
            .map_err(|e| AppError::Config(format!("settings: {}", e)))?;

        Ok(())
    }
}

/// Substitute environment variables in format $(VAR_NAME)
fn expand_env_vars(content: &str) -> Result<String> {
    let re = regex::Regex::new(r"\$\(([A-Z_][A-Z0-9_]*)\)")
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut result = content.to_string();
    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        let value = std::env::var(var_name).map_err(|_| {
            AppError::Config(format!("Environment variable {} not set", var_name))
        })?;
        result = result.replace(&cap[0], &value);
    }

    Ok(result)
}
