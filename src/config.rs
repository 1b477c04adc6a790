use crate::cluster::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IntegConfig {
    #[serde(default)]
    pub cli: CliConfig,
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub poll: PollConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Path to the binary under test (ECS_CLI_BIN takes precedence)
    pub bin: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AwsConfig {
    /// Region override (AWS_DEFAULT_REGION applies when unset)
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    pub interval_secs: u64,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl IntegConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .ecs-cli-integ.toml in current dir, then
            // ~/.config/ecs-cli-integ/config.toml
            let local = PathBuf::from(".ecs-cli-integ.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("ecs-cli-integ").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".ecs-cli-integ.toml"))
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: IntegConfig = toml::from_str(&content).map_err(|e| {
                ConfigError::ParseError(format!("{}: {}", config_path.display(), e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            // Use defaults but warn if the user explicitly provided a path
            if path.is_some() {
                eprintln!("WARNING: Config file not found: {}", config_path.display());
                eprintln!("   Using default configuration.");
            }
            Ok(IntegConfig::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.poll.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll.interval_secs".to_string(),
                reason: "must be at least 1 second".to_string(),
            }
            .into());
        }
        if self.poll.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll.max_attempts".to_string(),
                reason: "must be at least 1 attempt".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = IntegConfig::default();
        assert!(config.cli.bin.is_none());
        assert!(config.aws.region.is_none());
        assert_eq!(config.poll.interval_secs, 30);
        assert_eq!(config.poll.max_attempts, 10);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let mut config = IntegConfig::default();
        config.aws.region = Some("us-west-2".to_string());
        config.poll.max_attempts = 3;
        assert!(config.save(&config_path).is_ok());

        let loaded = IntegConfig::load(Some(&config_path)).unwrap();
        assert_eq!(loaded.aws.region.as_deref(), Some("us-west-2"));
        assert_eq!(loaded.poll.max_attempts, 3);
        assert_eq!(loaded.poll.interval_secs, config.poll.interval_secs);
    }

    #[test]
    fn test_config_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let fake_path = temp_dir.path().join("nonexistent.toml");

        // Should return default config
        let config = IntegConfig::load(Some(&fake_path)).unwrap();
        assert_eq!(config.poll.max_attempts, 10);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");
        std::fs::write(&config_path, "invalid toml content {").unwrap();

        let result = IntegConfig::load(Some(&config_path));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        std::fs::write(&config_path, "[aws]\nregion = \"eu-west-1\"\n").unwrap();

        let config = IntegConfig::load(Some(&config_path)).unwrap();
        assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.poll.interval_secs, 30);
        assert_eq!(config.poll.max_attempts, 10);
    }

    #[test]
    fn test_config_rejects_zero_poll_budget() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("zero.toml");
        std::fs::write(
            &config_path,
            "[poll]\ninterval_secs = 0\nmax_attempts = 10\n",
        )
        .unwrap();

        assert!(IntegConfig::load(Some(&config_path)).is_err());
    }
}
