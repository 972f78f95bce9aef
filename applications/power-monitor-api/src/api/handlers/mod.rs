pub mod dashboard;
pub mod devices;
pub mod email;
pub mod health;
pub mod readings;
pub mod settings;
pub mod tariff;

use power_monitor_core::AlertEvaluator;
use std::sync::Arc;

use crate::{
    config::Config,
    notifier::{AlertDispatcher, LogNotifier, Notifier},
    repositories::{CommandsRepository, InMemorySettingsStore, ReadingsRepository, SettingsStore},
};

#[derive(Clone)]
pub struct AppState {
    pub readings: Arc<ReadingsRepository>,
    pub commands: Arc<CommandsRepository>,
    pub settings: Arc<dyn SettingsStore>,
    pub dispatcher: Arc<AlertDispatcher>,
    pub evaluator: AlertEvaluator,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, settings: Arc<dyn SettingsStore>, notifier: Arc<dyn Notifier>) -> Self {
        let locale = config.alerts.locale;
        Self {
            readings: Arc::new(ReadingsRepository::new(config.monitor.history_capacity)),
            commands: Arc::new(CommandsRepository::new()),
            settings,
            dispatcher: Arc::new(AlertDispatcher::new(notifier, locale)),
            evaluator: AlertEvaluator::new(locale),
            config: Arc::new(config),
        }
    }

    /// State backed by process memory, seeded with the configured settings.
    /// Notifications go to the log.
    pub fn in_memory(config: Config) -> Self {
        let settings = Arc::new(InMemorySettingsStore::new(config.settings.clone()));
        Self::new(config, settings, Arc::new(LogNotifier))
    }
}
