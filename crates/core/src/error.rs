use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid duration {value:?} for {key}")]
    InvalidDuration { key: String, value: String },

    #[error("invalid time of day {value:?} for {key}, expected HH:MM")]
    InvalidTimeOfDay { key: String, value: String },

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0}")]
    Invalid(String),
}
