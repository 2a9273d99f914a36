//! Configuration for the state mirror

use crate::MirrorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the state mirror
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// How often to run a backup pass (in seconds)
    /// Default: 300 (5 minutes)
    pub backup_interval_secs: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            backup_interval_secs: 5 * 60,
        }
    }
}

impl MirrorConfig {
    /// Check that the configuration can drive a worker
    pub fn validate(&self) -> Result<(), MirrorError> {
        if self.backup_interval_secs == 0 {
            return Err(MirrorError::Config(
                "backup_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get backup interval as Duration
    pub fn backup_interval(&self) -> Duration {
        Duration::from_secs(self.backup_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MirrorConfig::default();
        assert_eq!(config.backup_interval(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config: MirrorConfig = serde_json::from_str(r#"{"backup_interval_secs": 0}"#).unwrap();
        assert!(matches!(config.validate(), Err(MirrorError::Config(_))));
    }
}
