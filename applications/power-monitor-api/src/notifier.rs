//! Forwarding of alerts to the configured recipient.
//!
//! Every send shares one cooldown window. Nothing is sent while mail is
//! disabled or either address is missing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use power_monitor_core::{AlertCode, AlertEvent, AlertReport, EmailSettings, Locale, Severity};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::Result;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &EmailSettings, subject: &str, body: &str) -> Result<()>;
}

/// Writes notifications to the log instead of a mail server.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, email: &EmailSettings, subject: &str, body: &str) -> Result<()> {
        info!(
            recipient = %email.recipient,
            sender = %email.sender_email,
            subject = %subject,
            body = %body,
            "notification"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Sent { subject: String },
    Skipped { reason: String },
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent { .. })
    }
}

pub struct AlertDispatcher {
    notifier: Arc<dyn Notifier>,
    locale: Locale,
    last_sent: Mutex<Option<DateTime<Utc>>>,
}

impl AlertDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, locale: Locale) -> Self {
        Self {
            notifier,
            locale,
            last_sent: Mutex::new(None),
        }
    }

    /// Send one message unless mail is off, unconfigured or cooling down.
    pub async fn send(
        &self,
        email: &EmailSettings,
        subject: &str,
        body: &str,
        now: DateTime<Utc>,
    ) -> Result<DispatchOutcome> {
        if !email.enabled {
            return Ok(skipped("Email alerts disabled"));
        }
        if !email.is_configured() {
            return Ok(skipped("Email not configured"));
        }

        let mut last_sent = self.last_sent.lock().await;
        if let Some(sent_at) = *last_sent {
            let elapsed = (now - sent_at).num_seconds();
            let cooldown = email.cooldown_secs();
            if elapsed < cooldown {
                return Ok(skipped(format!("Cooldown: {}s remaining", cooldown - elapsed)));
            }
        }

        self.notifier.send(email, subject, body).await?;
        *last_sent = Some(now);

        Ok(DispatchOutcome::Sent {
            subject: subject.to_string(),
        })
    }

    pub async fn send_test(&self, email: &EmailSettings, now: DateTime<Utc>) -> Result<DispatchOutcome> {
        let text = Text(self.locale);
        self.send(email, text.test_subject(), text.test_body(), now).await
    }

    /// Client-triggered message; missing parts fall back to a generic alert.
    pub async fn send_manual(
        &self,
        email: &EmailSettings,
        subject: Option<&str>,
        body: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<DispatchOutcome> {
        let text = Text(self.locale);
        let subject = subject.filter(|s| !s.trim().is_empty()).unwrap_or(text.manual_subject());
        let body = body.filter(|b| !b.trim().is_empty()).unwrap_or(text.manual_body());
        self.send(email, subject, body, now).await
    }

    /// Forward the global alert, then one grouped message for the rooms.
    /// Critical rooms are reported instead of warning rooms when both exist.
    pub async fn dispatch_report(
        &self,
        report: &AlertReport,
        email: &EmailSettings,
        now: DateTime<Utc>,
    ) -> Result<Vec<DispatchOutcome>> {
        let mut outcomes = Vec::new();
        let text = Text(self.locale);

        if let Some(global) = report.global_alert() {
            outcomes.push(self.send(email, &global.title, &global.description, now).await?);
        }

        let critical = alerts_with_code(report, AlertCode::RoomCritical);
        let warning = alerts_with_code(report, AlertCode::RoomWarning);
        let (severity, rooms) = if !critical.is_empty() {
            (Severity::Critical, critical)
        } else {
            (Severity::Warning, warning)
        };

        if !rooms.is_empty() {
            let subject = text.rooms_subject(severity, rooms.len());
            let body = rooms
                .iter()
                .map(|a| format!("• {}: {}", a.title, a.description))
                .collect::<Vec<_>>()
                .join("\n");
            outcomes.push(self.send(email, &subject, &body, now).await?);
        }

        for outcome in &outcomes {
            if let DispatchOutcome::Skipped { reason } = outcome {
                debug!(reason = %reason, "alert notification skipped");
            }
        }

        Ok(outcomes)
    }
}

fn alerts_with_code(report: &AlertReport, code: AlertCode) -> Vec<&AlertEvent> {
    report.alerts.iter().filter(|a| a.code == code).collect()
}

fn skipped(reason: impl Into<String>) -> DispatchOutcome {
    DispatchOutcome::Skipped {
        reason: reason.into(),
    }
}

struct Text(Locale);

impl Text {
    fn test_subject(&self) -> &'static str {
        match self.0 {
            Locale::Vi => "Test cấu hình email",
            Locale::En => "Email configuration test",
        }
    }

    fn test_body(&self) -> &'static str {
        match self.0 {
            Locale::Vi => "Nếu bạn nhận được thư này, cấu hình email đã hoạt động.",
            Locale::En => "If you received this message, the email configuration works.",
        }
    }

    fn manual_subject(&self) -> &'static str {
        match self.0 {
            Locale::Vi => "Cảnh báo hệ thống",
            Locale::En => "System alert",
        }
    }

    fn manual_body(&self) -> &'static str {
        match self.0 {
            Locale::Vi => "Có cảnh báo từ hệ thống giám sát điện năng.",
            Locale::En => "The power monitor raised an alert.",
        }
    }

    fn rooms_subject(&self, severity: Severity, count: usize) -> String {
        match (self.0, severity) {
            (Locale::Vi, Severity::Critical) => format!("NGUY HIỂM - {} phòng quá tải", count),
            (Locale::Vi, _) => format!("Cảnh báo - {} phòng công suất cao", count),
            (Locale::En, Severity::Critical) => format!("DANGER - {} rooms overloaded", count),
            (Locale::En, _) => format!("Warning - {} rooms drawing high power", count),
        }
    }
}
