use power_monitor_core::{RoomThresholds, Settings, TierSchedule, ThresholdPair, VatRate};
use serde::{Deserialize, Serialize};

use super::email::EmailSettingsView;
use crate::repositories::SettingKind;

#[derive(Debug, Deserialize)]
pub struct VatRequest {
    pub vat: i64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RoomThresholdsBody {
    pub room_thresholds: RoomThresholds,
}

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub success: bool,
    pub setting: SettingKind,
}

impl SavedResponse {
    pub fn new(setting: SettingKind) -> Self {
        Self {
            success: true,
            setting,
        }
    }
}

/// Settings as shown to clients; the mail password is reduced to a flag.
#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub thresholds: ThresholdPair,
    pub tiers: TierSchedule,
    pub tier_labels: Vec<String>,
    pub vat: VatRate,
    pub room_thresholds: RoomThresholds,
    pub email: EmailSettingsView,
}

impl From<&Settings> for SettingsView {
    fn from(settings: &Settings) -> Self {
        Self {
            thresholds: settings.thresholds,
            tiers: settings.tiers.clone(),
            tier_labels: settings.tiers.band_labels().to_vec(),
            vat: settings.vat,
            room_thresholds: settings.room_thresholds.clone(),
            email: EmailSettingsView::from(&settings.email),
        }
    }
}
