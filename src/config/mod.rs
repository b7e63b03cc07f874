pub mod settings;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::core::walker::DEFAULT_IGNORE_RULE_FILENAME;
use crate::core::{ContextOptions, LoadingPolicy, WalkOptions};

/// Persisted application settings.
///
/// Every field falls back to its default when missing, so config files
/// written by older versions keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Names of the files read as ignore rules in every directory.
    pub ignore_rule_filenames: BTreeSet<String>,
    /// Rules typed by the user, applied to the whole tree.
    pub ignore_patterns: String,
    pub loading: LoadingPolicy,
    pub last_path: Option<PathBuf>,
    pub context: ContextOptions,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        settings::load_config(None)
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            loading: self.loading,
            ignore_rule_filenames: self.ignore_rule_filenames.clone(),
            ignore_patterns: self.ignore_patterns.clone(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ignore_rule_filenames: BTreeSet::from([DEFAULT_IGNORE_RULE_FILENAME.to_string()]),
            ignore_patterns: String::new(),
            loading: LoadingPolicy::Lazy,
            last_path: None,
            context: ContextOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_walk_defaults() {
        assert_eq!(AppConfig::default().walk_options(), WalkOptions::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "loading": "eager", "ignore_patterns": "target/" }"#).unwrap();

        assert_eq!(config.loading, LoadingPolicy::Eager);
        assert_eq!(config.ignore_patterns, "target/");
        assert!(config.ignore_rule_filenames.contains(".gitignore"));
        assert_eq!(config.context, ContextOptions::default());
    }
}
