use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::history::DEFAULT_LOG_FILE;

pub const DEFAULT_HISTORY: usize = 5;

/// Settings file contents. Every field has a default, so an empty or
/// missing file is valid.
///
/// Example YAML:
/// ```yaml
/// log:
///   path: nhl_live_predictions.csv
///   tier_column: true
/// history: 5
/// colors: false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,

    /// Lines shown by `last`.
    #[serde(default = "default_history")]
    pub history: usize,

    /// Force colored output on or off. Unset means auto-detect a terminal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            history: DEFAULT_HISTORY,
            colors: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    #[serde(default = "default_log_path")]
    pub path: PathBuf,

    /// Write the tier text as a trailing `Оценка` column.
    #[serde(default = "default_tier_column")]
    pub tier_column: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
            tier_column: default_tier_column(),
        }
    }
}

fn default_history() -> usize {
    DEFAULT_HISTORY
}

fn default_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_tier_column() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log.path, PathBuf::from("nhl_live_predictions.csv"));
        assert!(config.log.tier_column);
        assert_eq!(config.history, 5);
        assert_eq!(config.colors, None);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            log: LogConfig {
                path: PathBuf::from("/tmp/predictions.csv"),
                tier_column: false,
            },
            history: 10,
            colors: Some(true),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config_parse() {
        let yaml = r#"
log:
  tier_column: false
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert!(!config.log.tier_column);
        assert_eq!(config.log.path, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(config.history, DEFAULT_HISTORY);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let yaml = "history: 3\nqueries: []\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }
}
