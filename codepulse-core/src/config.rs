//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/codepulse/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/codepulse/` (~/.config/codepulse/)
//! - State/Logs: `$XDG_STATE_HOME/codepulse/` (~/.local/state/codepulse/)

use crate::analytics::RangePreset;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Dashboard defaults
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Demo data generation
    #[serde(default)]
    pub synthetic: SyntheticConfig,

    /// Export import settings
    #[serde(default)]
    pub import: ImportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dashboard defaults
#[derive(Debug, Deserialize)]
pub struct DashboardConfig {
    /// Range preset selected on startup ("today", "7d", "14d", "30d", "90d", "all")
    #[serde(default = "default_range")]
    pub default_range: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_range: default_range(),
        }
    }
}

impl DashboardConfig {
    /// The configured startup preset.
    pub fn range_preset(&self) -> Result<RangePreset> {
        self.default_range.parse::<RangePreset>().map_err(|e| {
            Error::Config(format!("dashboard.default_range: {}", e))
        })
    }
}

fn default_range() -> String {
    "30d".to_string()
}

/// Demo dataset configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SyntheticConfig {
    /// Number of days of generated activity, ending today
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Seed for reproducible demo data (random when unset)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            seed: None,
        }
    }
}

fn default_lookback_days() -> u32 {
    30
}

/// Upper bound for `synthetic.lookback_days` (about ten years).
pub const MAX_LOOKBACK_DAYS: u32 = 3660;

/// Export import settings
#[derive(Debug, Deserialize, Default)]
pub struct ImportConfig {
    /// Export loaded when no file is given on the command line
    pub default_path: Option<PathBuf>,

    /// Fall back to demo data when the export reports no generated lines
    #[serde(default)]
    pub require_activity: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.synthetic.lookback_days == 0 {
            return Err(Error::Config(
                "synthetic.lookback_days must be at least 1".to_string(),
            ));
        }
        if self.synthetic.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(Error::Config(format!(
                "synthetic.lookback_days must be at most {}",
                MAX_LOOKBACK_DAYS
            )));
        }
        if self.logging.max_files == 0 {
            return Err(Error::Config(
                "logging.max_files must be at least 1".to_string(),
            ));
        }
        self.dashboard.range_preset()?;
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/codepulse/config.toml` (~/.config/codepulse/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("codepulse").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/codepulse/` (~/.local/state/codepulse/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("codepulse")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/codepulse/codepulse.log` (~/.local/state/codepulse/codepulse.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("codepulse.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dashboard.default_range, "30d");
        assert_eq!(config.synthetic.lookback_days, 30);
        assert!(config.synthetic.seed.is_none());
        assert!(!config.import.require_activity);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[dashboard]
default_range = "7d"

[synthetic]
lookback_days = 14
seed = 42

[import]
default_path = "/tmp/cursor-usage-data.json"
require_activity = true

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.dashboard.range_preset().unwrap(), RangePreset::Last7Days);
        assert_eq!(config.synthetic.lookback_days, 14);
        assert_eq!(config.synthetic.seed, Some(42));
        assert_eq!(
            config.import.default_path.as_deref(),
            Some(Path::new("/tmp/cursor-usage-data.json"))
        );
        assert!(config.import.require_activity);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.max_files, 5);
    }

    #[test]
    fn test_config_validation() {
        let config: Config = toml::from_str("[synthetic]\nlookback_days = 0\n").unwrap();
        assert!(config.validate().is_err());

        let config: Config = toml::from_str("[synthetic]\nlookback_days = 3660\n").unwrap();
        assert!(config.validate().is_ok());

        let config: Config =
            toml::from_str("[synthetic]\nlookback_days = 4000000000\n").unwrap();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config: Config = toml::from_str("[dashboard]\ndefault_range = \"fortnight\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "[dashboard]\ndefault_range = \"all\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.dashboard.range_preset().unwrap(), RangePreset::AllTime);

        std::fs::write(&path, "[dashboard\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_log_path() {
        assert!(Config::log_path().ends_with("codepulse/codepulse.log"));
    }
}
