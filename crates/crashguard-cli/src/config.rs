//! Configuration management for the guard.

use crate::error::{CliError, Result};
use crashguard_domain::layout::{GuardLayout, STATE_DIR};
use crashguard_janitor::JanitorConfig;
use crashguard_mirror::MirrorConfig;
use crashguard_supervisor::FaultSignature;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Guard configuration.
///
/// Every field is optional in the file; missing ones take the built-in
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Path settings
    pub paths: PathsConfig,

    /// Stale-marker janitor
    pub janitor: JanitorConfig,

    /// Working-state mirror
    pub mirror: MirrorConfig,

    /// Transient fault signature
    pub faults: FaultSignature,
}

/// Path settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Home directory override; defaults to the user's home
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<PathBuf>,
}

impl GuardConfig {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(home_dir()?.join(STATE_DIR).join("crashguard.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present and the built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::default_path()?;
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let contents = fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: GuardConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.janitor.validate()?;
        self.mirror.validate()?;
        self.faults.validate()?;
        Ok(())
    }

    /// Resolve the directory layout.
    pub fn layout(&self) -> Result<GuardLayout> {
        let home = match &self.paths.home {
            Some(home) => home.clone(),
            None => home_dir()?,
        };
        Ok(GuardLayout::from_home(home))
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = GuardConfig::default();
        assert_eq!(config.janitor.max_age(), Duration::from_secs(11 * 60));
        assert_eq!(config.janitor.scan_interval(), Duration::from_secs(30));
        assert_eq!(config.mirror.backup_interval(), Duration::from_secs(5 * 60));
        assert_eq!(config.faults.stack_marker, "undici");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file() {
        let config = GuardConfig::from_toml_str(
            r#"
            [paths]
            home = "/srv/agent"

            [janitor]
            dry_run = true
            "#,
        )
        .unwrap();

        assert!(config.janitor.dry_run);
        assert_eq!(config.janitor.max_age_secs, 660);
        assert_eq!(config.mirror.backup_interval_secs, 300);
        assert_eq!(
            config.layout().unwrap().agents_root,
            PathBuf::from("/srv/agent/.openclaw/agents")
        );
    }

    #[test]
    fn test_invalid_sections_rejected() {
        let err = GuardConfig::from_toml_str("[mirror]\nbackup_interval_secs = 0\n").unwrap_err();
        assert!(matches!(err, CliError::Mirror(_)));

        let err = GuardConfig::from_toml_str("[faults]\nstack_marker = \"\"\n").unwrap_err();
        assert!(matches!(err, CliError::Supervisor(_)));

        let err =
            GuardConfig::from_toml_str("[janitor]\nscan_interval_secs = \"soon\"\n").unwrap_err();
        assert!(matches!(err, CliError::Toml(_)));
    }

    #[test]
    fn test_toml_round_trip_keeps_overrides() {
        let mut config = GuardConfig::default();
        config.paths.home = Some(PathBuf::from("/srv/agent"));
        config.faults.stack_marker = "hyper-util".to_string();

        let parsed = GuardConfig::from_toml_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.paths.home, config.paths.home);
        assert_eq!(parsed.faults, config.faults);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crashguard.toml");
        fs::write(&path, "[janitor]\nmax_age_secs = 120\n").unwrap();

        let config = GuardConfig::load(Some(&path)).unwrap();
        assert_eq!(config.janitor.max_age_secs, 120);

        let missing = GuardConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(missing, Err(CliError::Io(_))));
    }
}
