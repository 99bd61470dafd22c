//! Engine configuration management.

use serde::Deserialize;

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Approval workflow configuration.
    #[serde(default)]
    pub approval: ApprovalConfig,
}

/// Approval workflow configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalConfig {
    /// Minimum length (in characters, after trimming) of a rejection reason.
    #[serde(default = "default_min_rejection_reason_len")]
    pub min_rejection_reason_len: usize,
}

fn default_min_rejection_reason_len() -> usize {
    5
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            min_rejection_reason_len: default_min_rejection_reason_len(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FINBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_min_rejection_reason_len() {
        let config = EngineConfig::default();
        assert_eq!(config.approval.min_rejection_reason_len, 5);
    }

    #[test]
    fn test_load_without_sources_uses_defaults() {
        let config = EngineConfig::load().expect("load should fall back to defaults");
        assert_eq!(config.approval.min_rejection_reason_len, 5);
    }
}
