//! Chain configuration with TOML file support.

use std::path::Path;

use serde::{Deserialize, Serialize};

use dpos_types::GenesisParams;
use dpos_utils::LogFormat;

use crate::ChainError;

/// Genesis parameters plus logging settings.
///
/// ```toml
/// log_level = "info"
/// log_format = "json"
///
/// [genesis]
/// deposit_for_join = 1000000000000000000
/// lock_time_for_deposit_secs = 259200
/// max_producer_size = 21
/// producer_tie_break = "lowest_address"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(default)]
    pub genesis: GenesisParams,

    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            genesis: GenesisParams::default(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl ChainConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ChainError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ChainError::Settings(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ChainError> {
        toml::from_str(s).map_err(|e| ChainError::Settings(e.to_string()))
    }

    /// Install the global tracing subscriber described by this config.
    pub fn init_logging(&self) -> Result<(), ChainError> {
        Ok(dpos_utils::init_tracing(self.log_format, &self.log_level)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpos_types::{TieBreak, UNIT};
    use std::io::Write;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ChainConfig::from_toml_str("").unwrap();
        assert_eq!(config, ChainConfig::default());
        assert_eq!(config.genesis.deposit_for_join, UNIT);
        assert_eq!(config.genesis.lock_time_for_deposit_secs, 72 * 3600);
        assert_eq!(config.genesis.max_producer_size, 4);
        assert_eq!(config.log_format, LogFormat::Human);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            log_format = "json"

            [genesis]
            max_producer_size = 21
            producer_tie_break = "lowest_address"
        "#;
        let config = ChainConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.genesis.max_producer_size, 21);
        assert_eq!(config.genesis.producer_tie_break, TieBreak::LowestAddress);
        assert_eq!(config.genesis.proposal_period_secs, 72 * 3600);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = ChainConfig::from_toml_str("log_format = \"xml\"").unwrap_err();
        assert!(matches!(err, ChainError::Settings(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"\n[genesis]\nstake_for_vote = 5").unwrap();
        let config = ChainConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.genesis.stake_for_vote, 5);
    }

    #[test]
    fn missing_file_is_a_settings_error() {
        let err = ChainConfig::from_toml_file("/nonexistent/dpos.toml").unwrap_err();
        assert!(matches!(err, ChainError::Settings(_)));
    }
}
