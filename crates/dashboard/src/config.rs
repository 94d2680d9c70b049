//! Dashboard configuration

use agri_gateway_ethereum::EthereumGatewayConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::snapshot::DEFAULT_LOAD_CONCURRENCY;

fn default_load_concurrency() -> usize {
    DEFAULT_LOAD_CONCURRENCY
}

fn default_account_poll_interval_ms() -> u64 {
    2_000
}

fn default_role_hint_path() -> PathBuf {
    PathBuf::from(".agri-dashboard/role-hint.json")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Contract connection
    #[serde(default)]
    pub gateway: EthereumGatewayConfig,

    /// Crop reads in flight during a reload
    #[serde(default = "default_load_concurrency")]
    pub load_concurrency: usize,

    /// How often node-managed accounts are polled for changes
    #[serde(default = "default_account_poll_interval_ms")]
    pub account_poll_interval_ms: u64,

    /// Where the one-shot role hint is stashed
    #[serde(default = "default_role_hint_path")]
    pub role_hint_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            gateway: EthereumGatewayConfig::default(),
            load_concurrency: default_load_concurrency(),
            account_poll_interval_ms: default_account_poll_interval_ms(),
            role_hint_path: default_role_hint_path(),
        }
    }
}

impl DashboardConfig {
    /// Load from a TOML file without validating
    ///
    /// Validation waits until CLI and environment overrides are applied.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded dashboard config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    /// Load `path` if given, otherwise start from defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply connection settings passed on the command line or environment
    pub fn with_overrides(
        mut self,
        rpc_url: Option<String>,
        contract_address: Option<String>,
        private_key: Option<String>,
    ) -> Self {
        if let Some(rpc_url) = rpc_url {
            self.gateway.rpc_url = rpc_url;
        }
        if let Some(contract_address) = contract_address {
            self.gateway.contract_address = contract_address;
        }
        if private_key.is_some() {
            self.gateway.private_key = private_key;
        }
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        self.gateway.validate()?;

        if self.load_concurrency == 0 || self.load_concurrency > 64 {
            return Err("load_concurrency must be between 1 and 64".to_string());
        }
        if self.account_poll_interval_ms < 100 {
            return Err("account_poll_interval_ms must be at least 100".to_string());
        }
        if self.role_hint_path.as_os_str().is_empty() {
            return Err("role_hint_path must not be empty".to_string());
        }
        Ok(())
    }

    pub fn account_poll_interval(&self) -> Duration {
        Duration::from_millis(self.account_poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = DashboardConfig::from_toml_str(&format!(
            r#"
            load_concurrency = 4

            [gateway]
            rpc_url = "http://localhost:8545"
            chain_id = 31337
            contract_address = "{}"
            "#,
            CONTRACT
        ))
        .unwrap();

        assert_eq!(config.load_concurrency, 4);
        assert_eq!(config.account_poll_interval(), Duration::from_secs(2));
        assert_eq!(config.gateway.confirmation_blocks, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_and_validation() {
        let config = DashboardConfig::default();
        // No contract address yet
        assert!(config.validate().is_err());

        let config = config.with_overrides(Some("http://127.0.0.1:8545".to_string()), Some(CONTRACT.to_string()), None);
        assert_eq!(config.gateway.rpc_url, "http://127.0.0.1:8545");
        assert!(config.validate().is_ok());

        let mut bad = config.clone();
        bad.load_concurrency = 0;
        assert!(bad.validate().is_err());
    }
}
