//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults (this file)                                                │
//! │  2. Config file                                                         │
//! │     ~/.config/tally-pos/config.toml (Linux)                             │
//! │     ~/Library/Application Support/com.tally.pos/config.toml (macOS)     │
//! │  3. Environment variables (TALLY_*)                                     │
//! │  4. Command line flags (--db, --store-name, ...)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Config File
//! ```toml
//! database_path = "/srv/tally/tally.db"
//! store_name = "Lanka Wholesale"
//! currency_symbol = "Rs "
//! currency_decimals = 2
//! utc_offset_minutes = 330
//! invoice_dir = "/home/cashier/Invoices"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Local, Offset};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use tally_core::money::CurrencyFormat;
use tally_core::Money;
use tally_invoice::InvoiceStyle;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Largest UTC offset accepted, in minutes (UTC+14:00).
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the application data directory")]
    NoDataDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// SQLite database file. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Store name printed on invoices
    pub store_name: String,

    /// Currency symbol including any spacing, e.g. `"Rs "` or `"$"`
    pub currency_symbol: String,

    /// Number of decimal places shown (0-2)
    pub currency_decimals: u8,

    /// Offset used for calendar days. `None` uses the system's local offset.
    pub utc_offset_minutes: Option<i32>,

    /// Where invoices are written. `None` uses the Downloads folder.
    pub invoice_dir: Option<PathBuf>,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            database_path: None,
            store_name: "Tally POS".to_string(),
            currency_symbol: "Rs ".to_string(),
            currency_decimals: 2,
            utc_offset_minutes: None,
            invoice_dir: None,
        }
    }
}

impl ConfigState {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = ConfigState::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.currency_decimals > 2 {
            return Err(ConfigError::Invalid(format!(
                "currency_decimals must be between 0 and 2, got {}",
                self.currency_decimals
            )));
        }

        if let Some(minutes) = self.utc_offset_minutes {
            if minutes.abs() > MAX_OFFSET_MINUTES {
                return Err(ConfigError::Invalid(format!(
                    "utc_offset_minutes must be within ±{}, got {}",
                    MAX_OFFSET_MINUTES, minutes
                )));
            }
        }

        Ok(())
    }

    /// Applies `TALLY_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = var("TALLY_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(name) = var("TALLY_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(symbol) = var("TALLY_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(decimals) = var("TALLY_CURRENCY_DECIMALS") {
            match decimals.parse::<u8>() {
                Ok(d) => self.currency_decimals = d,
                Err(_) => warn!(value = %decimals, "Ignoring invalid TALLY_CURRENCY_DECIMALS"),
            }
        }

        if let Some(offset) = var("TALLY_UTC_OFFSET_MINUTES") {
            match offset.parse::<i32>() {
                Ok(m) => self.utc_offset_minutes = Some(m),
                Err(_) => warn!(value = %offset, "Ignoring invalid TALLY_UTC_OFFSET_MINUTES"),
            }
        }

        if let Some(dir) = var("TALLY_INVOICE_DIR") {
            self.invoice_dir = Some(PathBuf::from(dir));
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Derived Settings
    // =========================================================================

    /// Database file, creating the platform data directory when needed.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.tally.pos/tally.db`
    /// - **Windows**: `%APPDATA%\tally\pos\data\tally.db`
    /// - **Linux**: `~/.local/share/tally-pos/tally.db`
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join("tally.db"))
    }

    /// Directory invoices are exported to.
    pub fn invoice_dir(&self) -> PathBuf {
        if let Some(dir) = &self.invoice_dir {
            return dir.clone();
        }

        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Offset that defines calendar days for filters and reports.
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .and_then(|m| FixedOffset::east_opt(m * 60))
            .unwrap_or_else(|| Local::now().offset().fix())
    }

    /// Currency format built from the symbol and decimals.
    pub fn currency(&self) -> CurrencyFormat {
        CurrencyFormat::new(self.currency_symbol.clone(), self.currency_decimals)
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "Rs 12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        self.currency().format(amount)
    }

    /// Presentation settings for invoice rendering.
    pub fn invoice_style(&self) -> InvoiceStyle {
        InvoiceStyle {
            store_name: Some(self.store_name.clone()).filter(|s| !s.trim().is_empty()),
            currency: self.currency(),
            utc_offset: self.utc_offset(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "tally", "pos")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "Rs 12.34");
        assert_eq!(config.format_currency(Money::from_cents(0)), "Rs 0.00");
        assert_eq!(config.format_currency(Money::from_cents(-550)), "-Rs 5.50");
    }

    #[test]
    fn test_format_currency_custom() {
        let config = ConfigState {
            currency_symbol: "$".to_string(),
            currency_decimals: 0,
            ..ConfigState::default()
        };
        assert_eq!(config.format_currency(Money::from_cents(1250)), "$13");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: ConfigState = toml::from_str(
            r#"
            store_name = "Lanka Wholesale"
            utc_offset_minutes = 330
            "#,
        )
        .unwrap();

        assert_eq!(config.store_name, "Lanka Wholesale");
        assert_eq!(config.utc_offset().local_minus_utc(), 330 * 60);
        assert_eq!(config.currency_symbol, "Rs ");
        assert_eq!(config.database_path, None);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TALLY_DB_PATH", "/tmp/t.db"),
            ("TALLY_CURRENCY_SYMBOL", "$"),
            ("TALLY_CURRENCY_DECIMALS", "abc"),
            ("TALLY_UTC_OFFSET_MINUTES", "-300"),
        ]);

        let mut config = ConfigState::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/t.db")));
        assert_eq!(config.currency_symbol, "$");
        // Unparseable values are ignored
        assert_eq!(config.currency_decimals, 2);
        assert_eq!(config.utc_offset_minutes, Some(-300));
    }

    #[test]
    fn test_validate() {
        assert!(ConfigState::default().validate().is_ok());

        let config = ConfigState {
            currency_decimals: 3,
            ..ConfigState::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = ConfigState {
            utc_offset_minutes: Some(15 * 60),
            ..ConfigState::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("tally-config-{}.toml", std::process::id()));
        std::fs::write(&path, "currency_decimals = 1\nstore_name = \"Corner\"\n").unwrap();

        let config = ConfigState::load(Some(path.clone())).unwrap();
        assert_eq!(config.store_name, "Corner");
        assert_eq!(config.currency_decimals, 1);

        std::fs::write(&path, "currency_decimals = \"two\"\n").unwrap();
        assert!(matches!(
            ConfigState::load(Some(path.clone())),
            Err(ConfigError::Parse(_))
        ));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invoice_style_uses_settings() {
        let config = ConfigState {
            store_name: "  ".to_string(),
            utc_offset_minutes: Some(60),
            ..ConfigState::default()
        };
        let style = config.invoice_style();
        assert_eq!(style.store_name, None);
        assert_eq!(style.utc_offset.local_minus_utc(), 3600);
    }
}
