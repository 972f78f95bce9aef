//! Alert classification for one data refresh.
//!
//! Order of the produced list:
//! 1. at most one global alert (critical wins over warning),
//! 2. per-room alerts in input order, for rooms with a configured pair,
//! 3. one info alert naming every room that reported exactly 0 W,
//! 4. a single "system normal" info alert when nothing above fired.
//!
//! The notification badge counts warning and critical alerts only. The
//! informational "inactive rooms" and "system normal" entries are listed but
//! never counted.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::reading::{total_power, RoomReading};
use crate::relative_time::{relative_time_in, Locale};
use crate::thresholds::{RoomThresholds, ThresholdPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Whether alerts of this severity count towards the badge.
    pub fn is_problem(&self) -> bool {
        matches!(self, Severity::Warning | Severity::Critical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCode {
    GlobalCritical,
    GlobalWarning,
    RoomCritical,
    RoomWarning,
    InactiveRooms,
    SystemNormal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub severity: Severity,
    pub code: AlertCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    pub title: String,
    pub description: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlertReport {
    pub alerts: Vec<AlertEvent>,
    pub badge_count: usize,
}

impl AlertReport {
    fn from_alerts(alerts: Vec<AlertEvent>) -> Self {
        let badge_count = alerts.iter().filter(|a| a.severity.is_problem()).count();
        Self {
            alerts,
            badge_count,
        }
    }

    /// Warning and critical alerts, in list order.
    pub fn badge_alerts(&self) -> impl Iterator<Item = &AlertEvent> {
        self.alerts.iter().filter(|a| a.severity.is_problem())
    }

    /// The global check's alert, if it fired.
    pub fn global_alert(&self) -> Option<&AlertEvent> {
        self.alerts
            .iter()
            .find(|a| matches!(a.code, AlertCode::GlobalCritical | AlertCode::GlobalWarning))
    }
}

/// Stateless evaluator; the locale only selects the text of the alerts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertEvaluator {
    locale: Locale,
}

impl AlertEvaluator {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn evaluate(
        &self,
        rooms: &[RoomReading],
        global: &ThresholdPair,
        per_room: &RoomThresholds,
        last_update_millis: i64,
        now_millis: i64,
    ) -> AlertReport {
        let timestamp = relative_time_in(self.locale, now_millis, last_update_millis);
        let text = Text(self.locale);
        let mut alerts = Vec::new();

        let total = total_power(rooms);
        if let Some(severity) = global.classify(total) {
            let (code, title, description) = match severity {
                Severity::Critical => (
                    AlertCode::GlobalCritical,
                    text.global_critical_title(),
                    text.global_critical(total, global.critical),
                ),
                _ => (
                    AlertCode::GlobalWarning,
                    text.global_warning_title(),
                    text.global_warning(total, global.warning),
                ),
            };
            alerts.push(AlertEvent {
                severity,
                code,
                room_id: None,
                title: title.to_string(),
                description,
                timestamp: timestamp.clone(),
            });
        }

        for room in rooms.iter().filter(|r| !r.is_stale) {
            let Some(pair) = per_room.get(&room.room_id) else {
                continue;
            };
            let Some(severity) = pair.classify(room.power_watts) else {
                continue;
            };
            let code = match severity {
                Severity::Critical => AlertCode::RoomCritical,
                _ => AlertCode::RoomWarning,
            };
            alerts.push(AlertEvent {
                severity,
                code,
                room_id: Some(room.room_id.clone()),
                title: text.room_title(&room.name, severity),
                description: text.room(room.power_watts, pair.level(severity), severity),
                timestamp: timestamp.clone(),
            });
        }

        let inactive: Vec<&str> = rooms
            .iter()
            .filter(|r| r.is_inactive())
            .map(|r| r.name.as_str())
            .collect();
        if !inactive.is_empty() {
            alerts.push(AlertEvent {
                severity: Severity::Info,
                code: AlertCode::InactiveRooms,
                room_id: None,
                title: text.inactive_title().to_string(),
                description: text.inactive(&inactive.join(", ")),
                timestamp: timestamp.clone(),
            });
        }

        if alerts.is_empty() {
            alerts.push(AlertEvent {
                severity: Severity::Info,
                code: AlertCode::SystemNormal,
                room_id: None,
                title: text.normal_title().to_string(),
                description: text.normal().to_string(),
                timestamp,
            });
        }

        let report = AlertReport::from_alerts(alerts);
        debug!(
            total_power = total,
            alerts = report.alerts.len(),
            badge_count = report.badge_count,
            "alerts evaluated"
        );
        report
    }
}

/// Evaluate alerts with the default locale.
pub fn evaluate_alerts(
    rooms: &[RoomReading],
    global: &ThresholdPair,
    per_room: &RoomThresholds,
    last_update_millis: i64,
    now_millis: i64,
) -> AlertReport {
    AlertEvaluator::default().evaluate(rooms, global, per_room, last_update_millis, now_millis)
}

struct Text(Locale);

impl Text {
    fn global_critical_title(&self) -> &'static str {
        match self.0 {
            Locale::Vi => "Quá tải nghiêm trọng",
            Locale::En => "Critical overload",
        }
    }

    fn global_critical(&self, total: f64, critical: f64) -> String {
        match self.0 {
            Locale::Vi => format!(
                "Tổng công suất {}W vượt ngưỡng nguy hiểm {}W",
                total, critical
            ),
            Locale::En => format!(
                "Total power {}W exceeds the critical threshold {}W",
                total, critical
            ),
        }
    }

    fn global_warning_title(&self) -> &'static str {
        match self.0 {
            Locale::Vi => "Công suất cao",
            Locale::En => "High power",
        }
    }

    fn global_warning(&self, total: f64, warning: f64) -> String {
        match self.0 {
            Locale::Vi => format!(
                "Tổng công suất {}W vượt ngưỡng cảnh báo {}W",
                total, warning
            ),
            Locale::En => format!(
                "Total power {}W exceeds the warning threshold {}W",
                total, warning
            ),
        }
    }

    fn room_title(&self, name: &str, severity: Severity) -> String {
        match (self.0, severity) {
            (Locale::Vi, Severity::Critical) => format!("{}: quá tải", name),
            (Locale::Vi, _) => format!("{}: công suất cao", name),
            (Locale::En, Severity::Critical) => format!("{}: overload", name),
            (Locale::En, _) => format!("{}: high power", name),
        }
    }

    fn room(&self, power: f64, threshold: f64, severity: Severity) -> String {
        match (self.0, severity) {
            (Locale::Vi, Severity::Critical) => {
                format!("Công suất {}W vượt ngưỡng nguy hiểm {}W", power, threshold)
            }
            (Locale::Vi, _) => format!("Công suất {}W vượt ngưỡng cảnh báo {}W", power, threshold),
            (Locale::En, Severity::Critical) => {
                format!("Power {}W exceeds the critical threshold {}W", power, threshold)
            }
            (Locale::En, _) => format!("Power {}W exceeds the warning threshold {}W", power, threshold),
        }
    }

    fn inactive_title(&self) -> &'static str {
        match self.0 {
            Locale::Vi => "Phòng không hoạt động",
            Locale::En => "Inactive rooms",
        }
    }

    fn inactive(&self, names: &str) -> String {
        match self.0 {
            Locale::Vi => format!("Không tiêu thụ điện: {}", names),
            Locale::En => format!("No power drawn: {}", names),
        }
    }

    fn normal_title(&self) -> &'static str {
        match self.0 {
            Locale::Vi => "Hệ thống bình thường",
            Locale::En => "System normal",
        }
    }

    fn normal(&self) -> &'static str {
        match self.0 {
            Locale::Vi => "Tất cả thông số nằm trong ngưỡng cho phép",
            Locale::En => "All readings are within limits",
        }
    }
}
