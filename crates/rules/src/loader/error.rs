//! Error types for the rule loader.

use std::path::PathBuf;

/// Errors that abort loading before any rule is evaluated.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read rules directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read rule file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("no rule files found in {0}")]
    NoRuleFilesFound(PathBuf),
}
