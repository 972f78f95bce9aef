use async_trait::async_trait;
use power_monitor_core::{
    EmailSettings, RoomThresholds, Settings, ThresholdPair, TierSchedule, VatRate,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKind {
    Thresholds,
    Tiers,
    Vat,
    RoomThresholds,
    Email,
}

/// An accepted (already validated) settings edit.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsChange {
    Thresholds(ThresholdPair),
    Tiers(TierSchedule),
    Vat(VatRate),
    RoomThresholds(RoomThresholds),
    Email(EmailSettings),
}

impl SettingsChange {
    pub fn kind(&self) -> SettingKind {
        match self {
            SettingsChange::Thresholds(_) => SettingKind::Thresholds,
            SettingsChange::Tiers(_) => SettingKind::Tiers,
            SettingsChange::Vat(_) => SettingKind::Vat,
            SettingsChange::RoomThresholds(_) => SettingKind::RoomThresholds,
            SettingsChange::Email(_) => SettingKind::Email,
        }
    }

    fn apply(self, settings: &mut Settings) {
        match self {
            SettingsChange::Thresholds(pair) => settings.thresholds = pair,
            SettingsChange::Tiers(schedule) => settings.tiers = schedule,
            SettingsChange::Vat(vat) => settings.vat = vat,
            SettingsChange::RoomThresholds(rooms) => settings.room_thresholds = rooms,
            SettingsChange::Email(email) => settings.email = email,
        }
    }
}

/// Where accepted settings are kept. Callers validate before saving.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<Settings>;

    async fn save(&self, change: SettingsChange) -> Result<()>;
}

/// Settings held in process memory; lost on restart.
pub struct InMemorySettingsStore {
    settings: RwLock<Settings>,
}

impl InMemorySettingsStore {
    pub fn new(initial: Settings) -> Self {
        Self {
            settings: RwLock::new(initial),
        }
    }
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load(&self) -> Result<Settings> {
        Ok(self.settings.read().await.clone())
    }

    async fn save(&self, change: SettingsChange) -> Result<()> {
        let kind = change.kind();
        let mut settings = self.settings.write().await;
        change.apply(&mut settings);
        info!(kind = ?kind, "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_replaces_only_the_changed_kind() {
        let store = InMemorySettingsStore::default();
        store
            .save(SettingsChange::Thresholds(ThresholdPair::new(400.0, 900.0)))
            .await
            .unwrap();

        let settings = store.load().await.unwrap();
        assert_eq!(settings.thresholds, ThresholdPair::new(400.0, 900.0));
        assert_eq!(settings.vat, VatRate::default());
        assert_eq!(settings.tiers, TierSchedule::default());
    }

    #[tokio::test]
    async fn test_room_thresholds_replace_whole_map() {
        let store = InMemorySettingsStore::default();
        let first: RoomThresholds =
            [("room5".to_string(), ThresholdPair::room_default())].into_iter().collect();
        let second: RoomThresholds =
            [("room7".to_string(), ThresholdPair::new(100.0, 200.0))].into_iter().collect();

        store.save(SettingsChange::RoomThresholds(first)).await.unwrap();
        store
            .save(SettingsChange::RoomThresholds(second.clone()))
            .await
            .unwrap();

        assert_eq!(store.load().await.unwrap().room_thresholds, second);
    }

    #[test]
    fn test_change_kind() {
        let change = SettingsChange::Vat(VatRate::default());
        assert_eq!(change.kind(), SettingKind::Vat);
        assert_eq!(
            serde_json::to_value(SettingKind::RoomThresholds).unwrap(),
            "room_thresholds"
        );
    }
}
