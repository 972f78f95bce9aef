use serde::{Deserialize, Serialize};

use crate::tariff::{TierSchedule, VatRate};
use crate::thresholds::{RoomThresholds, ThresholdPair};

/// Every setting the dashboard can edit.
///
/// These are also the values callers fall back to when external input
/// cannot be parsed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub thresholds: ThresholdPair,
    #[serde(default)]
    pub tiers: TierSchedule,
    #[serde(default)]
    pub vat: VatRate,
    #[serde(default)]
    pub room_thresholds: RoomThresholds,
    #[serde(default)]
    pub email: EmailSettings,
}

/// Outgoing alert mail configuration. The password is accepted on input but
/// never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub recipient: String,
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub sender_email: String,
    #[serde(default, skip_serializing)]
    pub sender_password: String,
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: u32,
    #[serde(default = "default_daily_report_time")]
    pub daily_report_time: String,
}

fn default_smtp_server() -> String {
    "smtp.gmail.com".into()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_cooldown_minutes() -> u32 {
    5
}

fn default_daily_report_time() -> String {
    "08:00".into()
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            recipient: String::new(),
            smtp_server: default_smtp_server(),
            smtp_port: default_smtp_port(),
            sender_email: String::new(),
            sender_password: String::new(),
            cooldown_minutes: default_cooldown_minutes(),
            daily_report_time: default_daily_report_time(),
        }
    }
}

impl EmailSettings {
    /// Both ends of the mail are known.
    pub fn is_configured(&self) -> bool {
        !self.recipient.trim().is_empty() && !self.sender_email.trim().is_empty()
    }

    pub fn has_password(&self) -> bool {
        !self.sender_password.is_empty()
    }

    pub fn cooldown_secs(&self) -> i64 {
        i64::from(self.cooldown_minutes) * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fallback_values() {
        let settings = Settings::default();
        assert_eq!(settings.thresholds, ThresholdPair::new(500.0, 1000.0));
        assert_eq!(settings.vat.percent(), 8);
        assert_eq!(settings.tiers.limits.as_array(), [50, 100, 200, 300, 400]);
        assert_eq!(
            settings.tiers.prices,
            [1984.0, 2050.0, 2380.0, 2998.0, 3350.0, 3460.0]
        );
        assert!(settings.room_thresholds.is_empty());
        assert!(!settings.email.enabled);
        assert_eq!(settings.email.cooldown_secs(), 300);
    }

    #[test]
    fn test_password_is_never_serialized() {
        let email = EmailSettings {
            sender_password: "hunter2".into(),
            ..EmailSettings::default()
        };
        let json = serde_json::to_value(&email).unwrap();
        assert!(json.get("sender_password").is_none());
        assert!(email.has_password());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let json = r#"{"vat": 10, "thresholds": {"warning": 400, "critical": 900}}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.vat.percent(), 10);
        assert_eq!(settings.thresholds.warning, 400.0);
        assert_eq!(settings.tiers, TierSchedule::default());
        assert_eq!(settings.email.smtp_port, 587);
    }
}
