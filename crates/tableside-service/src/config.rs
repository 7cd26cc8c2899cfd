//! # Service Configuration
//!
//! Settings read once at startup.
//!
//! ## Example tableside.toml
//! ```toml
//! [floor]
//! table_count = 8
//!
//! [pricing]
//! tax_rate_bps = 825
//!
//! [currency]
//! symbol = "€"
//! decimals = 2
//!
//! [catalog]
//! path = "/etc/tableside/menu.json"
//! ```
//!
//! ## Load Order (later overrides earlier)
//! 1. Default values
//! 2. Config file (`--config`, `TABLESIDE_CONFIG`, or the platform config dir)
//! 3. Environment variables (`TABLESIDE_*`)

use std::path::{Path, PathBuf};

use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};
use tableside_core::validation::{validate_table_count, validate_tax_rate_bps};
use tableside_core::{Catalog, Money, PricingEngine, Product, TaxRate};
use tableside_core::{DEFAULT_TABLE_COUNT, DEFAULT_TAX_RATE_BPS};
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::seed;

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "tableside.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "TABLESIDE_CONFIG";

// =============================================================================
// Configuration Sections
// =============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub floor: FloorSettings,

    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub currency: CurrencySettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

/// Dining room layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorSettings {
    /// Tables are created as `table-1` .. `table-{table_count}`.
    #[serde(default = "default_table_count")]
    pub table_count: u32,
}

fn default_table_count() -> u32 {
    DEFAULT_TABLE_COUNT
}

impl Default for FloorSettings {
    fn default() -> Self {
        FloorSettings {
            table_count: default_table_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Tax rate in basis points, e.g. 1000 = 10%
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE_BPS
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            tax_rate_bps: default_tax_rate_bps(),
        }
    }
}

impl PricingSettings {
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

/// Display settings for amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    #[serde(default = "default_currency_symbol")]
    pub symbol: String,

    #[serde(default = "default_currency_decimals")]
    pub decimals: u32,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency_decimals() -> u32 {
    2
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            symbol: default_currency_symbol(),
            decimals: default_currency_decimals(),
        }
    }
}

/// Where the menu comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// JSON file holding an array of products. Unset: built-in sample menu.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Loading
// =============================================================================

impl ServiceConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path);
        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML config file without overrides or validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_table_count(self.floor.table_count)
            .map_err(|e| ConfigError::Invalid(format!("floor: {}", e)))?;
        validate_tax_rate_bps(self.pricing.tax_rate_bps)
            .map_err(|e| ConfigError::Invalid(format!("pricing: {}", e)))?;

        if self.currency.symbol.is_empty() {
            return Err(ConfigError::Invalid(
                "currency.symbol must not be empty".into(),
            ));
        }
        if self.currency.decimals > 4 {
            return Err(ConfigError::Invalid(
                "currency.decimals must be between 0 and 4".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `TABLESIDE_*` overrides from `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Percentage, e.g. "8.25"
        if let Some(rate) = lookup("TABLESIDE_TAX_RATE") {
            match rate.parse::<f64>() {
                Ok(pct) if pct >= 0.0 => {
                    let bps = TaxRate::from_percentage(pct).bps();
                    debug!(tax_rate_bps = bps, "Overriding tax rate from environment");
                    self.pricing.tax_rate_bps = bps;
                }
                _ => warn!(rate = %rate, "Ignoring invalid TABLESIDE_TAX_RATE"),
            }
        }

        if let Some(count) = lookup("TABLESIDE_TABLE_COUNT") {
            match count.parse::<u32>() {
                Ok(n) => {
                    debug!(table_count = n, "Overriding table count from environment");
                    self.floor.table_count = n;
                }
                Err(_) => warn!(count = %count, "Ignoring invalid TABLESIDE_TABLE_COUNT"),
            }
        }

        if let Some(path) = lookup("TABLESIDE_CATALOG_PATH") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.catalog.path = Some(PathBuf::from(path));
        }

        if let Some(symbol) = lookup("TABLESIDE_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tableside", "tableside")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn pricing_engine(&self) -> PricingEngine {
        PricingEngine::new(self.pricing.tax_rate())
    }

    /// Loads the menu from `catalog.path`, or the sample menu when unset.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog.path {
            Some(path) => {
                info!(?path, "Loading catalog from file");
                let contents = std::fs::read_to_string(path)?;
                let products: Vec<Product> = serde_json::from_str(&contents)?;
                Ok(Catalog::new(products)?)
            }
            None => {
                debug!("No catalog path configured, using sample menu");
                Ok(seed::sample_catalog()?)
            }
        }
    }

    /// Formats an amount for display, rounding half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use tableside_core::Money;
    /// use tableside_service::ServiceConfig;
    ///
    /// let config = ServiceConfig::default();
    /// assert_eq!(config.format_money(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_money(&self, money: Money) -> String {
        let decimals = self.currency.decimals;
        let amount = money
            .amount()
            .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);

        format!(
            "{}{}{:.prec$}",
            if amount.is_sign_negative() && !amount.is_zero() {
                "-"
            } else {
                ""
            },
            self.currency.symbol,
            amount.abs(),
            prec = decimals as usize
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
