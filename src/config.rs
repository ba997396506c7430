// 🔧 Configuration - Rate schedule, page sizes and default period
// Loaded from an optional JSON file; missing keys keep their defaults.
// REWARDS_FIXTURE and REWARDS_ADDR override the file.

use crate::calculator::RateSchedule;
use crate::calendar::month_index_from_name;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const FIXTURE_ENV: &str = "REWARDS_FIXTURE";
pub const ADDR_ENV: &str = "REWARDS_ADDR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardsConfig {
    pub schedule: RateSchedule,

    /// Customers per page in listings
    pub customers_per_page: usize,

    /// Transactions per page in listings
    pub transactions_per_page: usize,

    /// Period shown when none is requested
    pub default_month: String,
    pub default_year: i32,

    pub fixture_path: PathBuf,
    pub server_addr: String,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        RewardsConfig {
            schedule: RateSchedule::default(),
            customers_per_page: 5,
            transactions_per_page: 10,
            default_month: "October".to_string(),
            default_year: 2024,
            fixture_path: PathBuf::from("data/transactions.json"),
            server_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl RewardsConfig {
    /// Load config from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: RewardsConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally `std::env::var`)
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(FIXTURE_ENV) {
            self.fixture_path = PathBuf::from(path);
        }
        if let Some(addr) = lookup(ADDR_ENV) {
            self.server_addr = addr;
        }
        self
    }

    /// Apply overrides from the process environment
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn validate(&self) -> Result<()> {
        self.schedule.validate().context("Invalid rate schedule")?;

        if self.customers_per_page == 0 || self.transactions_per_page == 0 {
            bail!("Page sizes must be at least 1");
        }
        if month_index_from_name(&self.default_month).is_none() {
            bail!("Unknown default month: {:?}", self.default_month);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = RewardsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.customers_per_page, 5);
        assert_eq!(config.transactions_per_page, 10);
        assert_eq!(config.schedule.minimum, dec!(50));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(r#"{ "customers_per_page": 20, "schedule": { "tier2_rate": 3 } }"#);
        let config = RewardsConfig::from_file(file.path()).unwrap();

        assert_eq!(config.customers_per_page, 20);
        assert_eq!(config.transactions_per_page, 10);
        assert_eq!(config.schedule.tier2_rate, dec!(3));
        assert_eq!(config.schedule.tier1_end, dec!(100));
    }

    #[test]
    fn test_invalid_file_rejected() {
        let file = write_config(r#"{ "schedule": { "minimum": 500 } }"#);
        let err = RewardsConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid rate schedule"));

        let file = write_config(r#"{ "default_month": "Brumaire" }"#);
        assert!(RewardsConfig::from_file(file.path()).is_err());

        let file = write_config(r#"{ "transactions_per_page": 0 }"#);
        assert!(RewardsConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> =
            [(FIXTURE_ENV, "/tmp/other.json"), (ADDR_ENV, "127.0.0.1:8080")].into();

        let config = RewardsConfig::default()
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.fixture_path, PathBuf::from("/tmp/other.json"));
        assert_eq!(config.server_addr, "127.0.0.1:8080");
    }
}
