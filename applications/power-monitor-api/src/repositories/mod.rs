pub mod commands;
pub mod readings;
pub mod settings;

pub use commands::{CommandsRepository, DeviceId, DeviceStates, RelayCommand};
pub use readings::{LatestReading, PowerSample, ReadingsRepository};
pub use settings::{InMemorySettingsStore, SettingKind, SettingsChange, SettingsStore};
