//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::entities::stock_lot::LowStockThreshold;

/// Hourly rate used when neither config nor flags provide one
pub const DEFAULT_HOURLY_RATE: f64 = 15.0;

/// Margin (%) used when neither config nor flags provide one
pub const DEFAULT_MARGIN_PCT: f64 = 20.0;

/// Ficelle configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Hourly rate for the price calculator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,

    /// Default margin (%) for the price calculator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_pct: Option<f64>,

    /// Currency symbol shown next to prices
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Low-stock absolute floor, meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock_absolute: Option<f64>,

    /// Low-stock fraction of initial length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock_ratio: Option<f64>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(project_root: Option<&Path>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (accessors below)

        // 2. Global user config
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Inventory config (.ficelle/config.yaml)
        if let Some(root) = project_root {
            if let Some(local) = Self::read_file(&Self::project_config_path(root)) {
                config.merge(local);
            }
        }

        // 4. Environment variables
        if let Some(rate) = std::env::var("FICELLE_HOURLY_RATE")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.hourly_rate = Some(rate);
        }
        if let Ok(currency) = std::env::var("FICELLE_CURRENCY") {
            config.currency = Some(currency);
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        let has_settings = contents
            .lines()
            .any(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'));
        if !has_settings {
            return None;
        }
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ficelle")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Get the path to an inventory's config file
    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(crate::core::project::INVENTORY_DIR)
            .join("config.yaml")
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.hourly_rate.is_some() {
            self.hourly_rate = other.hourly_rate;
        }
        if other.margin_pct.is_some() {
            self.margin_pct = other.margin_pct;
        }
        if other.currency.is_some() {
            self.currency = other.currency;
        }
        if other.low_stock_absolute.is_some() {
            self.low_stock_absolute = other.low_stock_absolute;
        }
        if other.low_stock_ratio.is_some() {
            self.low_stock_ratio = other.low_stock_ratio;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    pub fn hourly_rate(&self) -> f64 {
        self.hourly_rate.unwrap_or(DEFAULT_HOURLY_RATE)
    }

    pub fn margin_pct(&self) -> f64 {
        self.margin_pct.unwrap_or(DEFAULT_MARGIN_PCT)
    }

    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or("€")
    }

    /// Low-stock thresholds with config overrides applied
    pub fn low_stock_threshold(&self) -> LowStockThreshold {
        let defaults = LowStockThreshold::default();
        LowStockThreshold {
            absolute_m: self.low_stock_absolute.unwrap_or(defaults.absolute_m),
            ratio: self.low_stock_ratio.unwrap_or(defaults.ratio),
        }
    }
}
