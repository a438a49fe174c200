use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::session::GameMode;

/// Longest accepted pause before the computer replies.
pub const MAX_OPPONENT_DELAY_MS: u64 = 10_000;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: GameMode,
    /// Pause before the computer's reply, so the human sees their piece land.
    pub opponent_delay_ms: u64,
    /// Seed for the random opponent; unset means a fresh seed every run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            mode: GameMode::VsComputer,
            opponent_delay_ms: 500,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn opponent_delay(&self) -> Duration {
        Duration::from_millis(self.opponent_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Log file; the terminal belongs to the game.
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: PathBuf::from("connect_four.log"),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            eprintln!("Warning: config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.opponent_delay_ms > MAX_OPPONENT_DELAY_MS {
            return Err(ConfigError::Validation(format!(
                "game.opponent_delay_ms must be <= {MAX_OPPONENT_DELAY_MS}"
            )));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.level must not be empty".into(),
            ));
        }
        if let Err(e) = tracing_subscriber::EnvFilter::try_new(&self.logging.level) {
            return Err(ConfigError::Validation(format!(
                "logging.level is not a valid filter: {e}"
            )));
        }
        if self.logging.file.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "logging.file must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&AppConfig::default())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.game.opponent_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[game]
mode = "two-player"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.game.mode, GameMode::TwoPlayer);
        // Other fields should be defaults
        assert_eq!(config.game.opponent_delay_ms, 500);
        assert_eq!(config.game.seed, None);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[game]\nmode = \"online\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_long_delay() {
        let mut config = AppConfig::default();
        config.game.opponent_delay_ms = MAX_OPPONENT_DELAY_MS + 1;
        assert!(config.validate().is_err());

        config.game.opponent_delay_ms = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_empty_level() {
        let mut config = AppConfig::default();
        config.logging.level = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_filter() {
        let mut config = AppConfig::default();
        config.logging.level = "connect_four=notalevel".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_log_file() {
        let mut config = AppConfig::default();
        config.logging.file = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[game]
opponent_delay_ms = 0
seed = 42

[logging]
level = "debug"
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.game.opponent_delay_ms, 0);
        assert_eq!(config.game.seed, Some(42));
        assert_eq!(config.logging.level, "debug");
        // Others are defaults
        assert_eq!(config.game.mode, GameMode::VsComputer);
        assert_eq!(config.logging.file, PathBuf::from("connect_four.log"));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[game]\nopponent_delay_ms = 60000\n").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = AppConfig::load(Path::new("definitely_missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml().unwrap();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config, AppConfig::default());
    }
}
