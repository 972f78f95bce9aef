//! HTTP service around the power monitor core: register ingest, dashboard
//! snapshots, charts, relay commands, settings and alert notifications.

pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod ingest;
pub mod notifier;
pub mod repositories;
pub mod snapshot;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, Result};
