//! Configuration types for the Ethereum gateway

use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_confirmation_blocks() -> u64 {
    1
}

/// Configuration for the Ethereum gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthereumGatewayConfig {
    /// RPC URL for the Ethereum node
    /// Example: "http://localhost:8545"
    pub rpc_url: String,

    /// Chain ID (1=mainnet, 11155111=Sepolia, 31337=Anvil, etc.)
    pub chain_id: u64,

    /// Deployed AgriSupplyChain contract address
    /// Must be a valid Ethereum address (0x-prefixed, 42 characters)
    pub contract_address: String,

    /// Private key for signing transactions locally (optional)
    /// Format: 0x-prefixed hex string (64 hex chars + 0x prefix = 66 chars)
    /// Without it, transactions are signed by the node's unlocked accounts
    #[serde(default)]
    pub private_key: Option<String>,

    /// Number of confirmations a mutation waits for (default 1)
    #[serde(default = "default_confirmation_blocks")]
    pub confirmation_blocks: u64,

    /// Give up waiting for a receipt after this many seconds
    /// Unset means wait as long as it takes
    #[serde(default)]
    pub tx_timeout_secs: Option<u64>,
}

impl Default for EthereumGatewayConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337, // Local anvil
            contract_address: String::new(),
            private_key: None,
            confirmation_blocks: default_confirmation_blocks(),
            tx_timeout_secs: None,
        }
    }
}

impl EthereumGatewayConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    ///
    /// ```no_run
    /// use agri_gateway_ethereum::EthereumGatewayConfig;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = EthereumGatewayConfig::from_file("gateway.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml_str(toml: &str) -> Result<Self, anyhow::Error> {
        let config: Self = toml::from_str(toml)?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// Returns `Ok(())` if valid, otherwise returns error message
    pub fn validate(&self) -> Result<(), String> {
        if self.rpc_url.is_empty() {
            return Err("rpc_url cannot be empty".to_string());
        }

        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err("rpc_url must start with http:// or https://".to_string());
        }

        if self.contract_address.is_empty() {
            return Err("contract_address cannot be empty".to_string());
        }

        if !self.contract_address.starts_with("0x") {
            return Err("contract_address must start with 0x".to_string());
        }

        if self.contract_address.len() != 42 {
            return Err(format!(
                "contract_address must be 42 characters (0x + 40 hex), got {}",
                self.contract_address.len()
            ));
        }

        if hex::decode(&self.contract_address[2..]).is_err() {
            return Err("contract_address must contain only hex characters after 0x".to_string());
        }

        if let Some(ref pk) = self.private_key {
            if !pk.is_empty() {
                if !pk.starts_with("0x") {
                    return Err("private_key must start with 0x".to_string());
                }

                if pk.len() != 66 {
                    return Err(format!(
                        "private_key must be 66 characters (0x + 64 hex), got {}",
                        pk.len()
                    ));
                }

                if hex::decode(&pk[2..]).is_err() {
                    return Err("private_key must contain only hex characters after 0x".to_string());
                }
            }
        }

        if self.confirmation_blocks == 0 {
            return Err("confirmation_blocks must be > 0".to_string());
        }

        if self.confirmation_blocks > 100 {
            return Err("confirmation_blocks too large (max 100)".to_string());
        }

        if let Some(timeout) = self.tx_timeout_secs {
            if timeout == 0 {
                return Err("tx_timeout_secs must be > 0 when set".to_string());
            }
        }

        Ok(())
    }

    /// Check if configuration signs transactions locally (has private key)
    pub fn can_write(&self) -> bool {
        self.private_key.as_deref().is_some_and(|pk| !pk.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn valid_config() -> EthereumGatewayConfig {
        EthereumGatewayConfig {
            contract_address: ADDRESS.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_empty_rpc_url() {
        let mut config = valid_config();
        config.rpc_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_rpc_url_scheme() {
        let mut config = valid_config();
        config.rpc_url = "ws://localhost:8545".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_contract_address() {
        let mut config = valid_config();
        config.contract_address = String::new();
        assert!(config.validate().is_err());

        config.contract_address = "5FbDB2315678afecb367f032d93F642f64180aa3".to_string();
        assert!(config.validate().is_err());

        config.contract_address = "0x12345".to_string();
        assert!(config.validate().is_err());

        config.contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aXY".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_private_key_validation() {
        let mut config = valid_config();
        config.private_key = Some(ANVIL_KEY.to_string());
        assert!(config.validate().is_ok());
        assert!(config.can_write());

        config.private_key = Some("0x1234".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_confirmation_blocks_validation() {
        let mut config = valid_config();
        config.confirmation_blocks = 0;
        assert!(config.validate().is_err());

        config.confirmation_blocks = 12;
        assert!(config.validate().is_ok());

        config.confirmation_blocks = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tx_timeout_validation() {
        let mut config = valid_config();
        config.tx_timeout_secs = Some(0);
        assert!(config.validate().is_err());

        config.tx_timeout_secs = Some(120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_can_write() {
        let mut config = valid_config();
        assert!(!config.can_write());

        config.private_key = Some(String::new());
        assert!(!config.can_write());

        config.private_key = Some(ANVIL_KEY.to_string());
        assert!(config.can_write());
    }

    #[test]
    fn test_from_toml_str() {
        let toml = r#"
rpc_url = "https://rpc.sepolia.org"
chain_id = 11155111
contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
"#;

        let config = EthereumGatewayConfig::from_toml_str(toml).unwrap();

        assert_eq!(config.rpc_url, "https://rpc.sepolia.org");
        assert_eq!(config.chain_id, 11155111);
        assert_eq!(config.contract_address, ADDRESS);
        assert_eq!(config.confirmation_blocks, 1);
        assert_eq!(config.tx_timeout_secs, None);
        assert!(!config.can_write());
    }

    #[test]
    fn test_from_toml_str_rejects_invalid() {
        let toml = r#"
rpc_url = "https://rpc.sepolia.org"
chain_id = 11155111
contract_address = "0x1234"
"#;
        assert!(EthereumGatewayConfig::from_toml_str(toml).is_err());
    }
}
