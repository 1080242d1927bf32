//! Shared types for gmaps2vcard: the business record, extraction method
//! selection, environment-driven configuration, opening-hours parsing and
//! the vCard serializer.

pub mod app_config;
pub mod config;
pub mod method;
pub mod record;
pub mod schedule;
pub mod vcard;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use method::ExtractionMethod;
pub use record::BusinessRecord;
pub use schedule::{display_hours, WeekSchedule};
pub use vcard::{to_vcard, vcard_file_name};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
