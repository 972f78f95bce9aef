use chrono::NaiveTime;
use power_monitor_core::EmailSettings;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::notifier::DispatchOutcome;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailSettingsView {
    pub enabled: bool,
    pub recipient: String,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender_email: String,
    pub has_password: bool,
    pub cooldown_minutes: u32,
    pub daily_report_time: String,
}

impl From<&EmailSettings> for EmailSettingsView {
    fn from(email: &EmailSettings) -> Self {
        Self {
            enabled: email.enabled,
            recipient: email.recipient.clone(),
            smtp_server: email.smtp_server.clone(),
            smtp_port: email.smtp_port,
            sender_email: email.sender_email.clone(),
            has_password: email.has_password(),
            cooldown_minutes: email.cooldown_minutes,
            daily_report_time: email.daily_report_time.clone(),
        }
    }
}

/// Email settings update. Absent fields keep their current value; an empty
/// or absent password keeps the stored one.
#[derive(Debug, Default, Deserialize)]
pub struct EmailSettingsRequest {
    pub enabled: Option<bool>,
    pub recipient: Option<String>,
    pub smtp_server: Option<String>,
    pub smtp_port: Option<u16>,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub cooldown_minutes: Option<u32>,
    pub daily_report_time: Option<String>,
}

impl EmailSettingsRequest {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("recipient", &self.recipient),
            ("sender_email", &self.sender_email),
        ] {
            if let Some(address) = value {
                let address = address.trim();
                if !address.is_empty() && !address.contains('@') {
                    return Err(AppError::InvalidInput(format!(
                        "{} must be an email address",
                        field
                    )));
                }
            }
        }

        if self.smtp_port == Some(0) {
            return Err(AppError::InvalidInput(
                "smtp_port must be between 1 and 65535".to_string(),
            ));
        }

        if let Some(minutes) = self.cooldown_minutes {
            if minutes > 24 * 60 {
                return Err(AppError::InvalidInput(
                    "cooldown_minutes must be at most 1440".to_string(),
                ));
            }
        }

        if let Some(time) = &self.daily_report_time {
            NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| {
                AppError::InvalidInput("daily_report_time must be HH:MM".to_string())
            })?;
        }

        Ok(())
    }

    pub fn apply_to(self, current: &EmailSettings) -> EmailSettings {
        let mut updated = current.clone();
        if let Some(enabled) = self.enabled {
            updated.enabled = enabled;
        }
        if let Some(recipient) = self.recipient {
            updated.recipient = recipient.trim().to_string();
        }
        if let Some(server) = self.smtp_server {
            updated.smtp_server = server.trim().to_string();
        }
        if let Some(port) = self.smtp_port {
            updated.smtp_port = port;
        }
        if let Some(sender) = self.sender_email {
            updated.sender_email = sender.trim().to_string();
        }
        if let Some(password) = self.sender_password.filter(|p| !p.is_empty()) {
            updated.sender_password = password;
        }
        if let Some(minutes) = self.cooldown_minutes {
            updated.cooldown_minutes = minutes;
        }
        if let Some(time) = self.daily_report_time {
            updated.daily_report_time = time;
        }
        updated
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertMessageRequest {
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub success: bool,
    pub message: String,
}

impl NotificationResponse {
    /// Skipped sends are reported to the client as an error.
    pub fn from_outcome(outcome: DispatchOutcome) -> Result<Self> {
        match outcome {
            DispatchOutcome::Sent { .. } => Ok(Self {
                success: true,
                message: "Email sent successfully".to_string(),
            }),
            DispatchOutcome::Skipped { reason } => Err(AppError::Notification(reason)),
        }
    }
}
