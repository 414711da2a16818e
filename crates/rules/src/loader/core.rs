//! Core [`RuleLoader`] struct: directory scan and per-file parsing.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::schema::Rule;

use super::error::LoadError;

/// Loads the rule set from a single directory.
///
/// Only regular files directly inside the directory are considered;
/// subdirectories, dotfiles and non-YAML files are skipped. Any unreadable or
/// unparseable file aborts the load.
#[derive(Debug, Clone)]
pub struct RuleLoader {
    rules_dir: PathBuf,
}

impl RuleLoader {
    pub fn new(rules_dir: impl Into<PathBuf>) -> Self {
        Self {
            rules_dir: rules_dir.into(),
        }
    }

    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// Load every rule file in file-name order.
    ///
    /// Fails with [`LoadError::NoRuleFilesFound`] when no rule is defined.
    pub fn load_all(&self) -> Result<Vec<Rule>, LoadError> {
        let mut rules = Vec::new();
        for path in self.rule_files()? {
            let file_rules = self.load_file(&path)?;
            debug!(path = %path.display(), count = file_rules.len(), "loaded rule file");
            rules.extend(file_rules);
        }

        if rules.is_empty() {
            return Err(LoadError::NoRuleFilesFound(self.rules_dir.clone()));
        }
        info!(dir = %self.rules_dir.display(), count = rules.len(), "loaded rules");
        Ok(rules)
    }

    /// Parse one rule document. An empty document holds no rules.
    pub fn load_file(&self, path: &Path) -> Result<Vec<Rule>, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let rules: Option<Vec<Rule>> =
            serde_yaml::from_str(&content).map_err(|source| LoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(rules.unwrap_or_default())
    }

    /// Sorted YAML files directly inside the rules directory.
    fn rule_files(&self) -> Result<Vec<PathBuf>, LoadError> {
        let read_dir_err = |source| LoadError::ReadDir {
            path: self.rules_dir.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.rules_dir).map_err(read_dir_err)? {
            let entry = entry.map_err(read_dir_err)?;
            let path = entry.path();

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') || !path.is_file() {
                continue;
            }
            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == "yml" || e == "yaml");
            if is_yaml {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}
