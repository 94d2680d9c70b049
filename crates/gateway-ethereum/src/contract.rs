//! Contract client holding connection details for the AgriSupplyChain contract
//!
//! Providers are not cached: each call builds a fresh one, so a restarted node
//! or a changed signer is picked up on the next operation.

use crate::config::EthereumGatewayConfig;
use crate::error::{EthereumGatewayError, Result};
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use std::str::FromStr;

/// Contract client that manages contract connection details
pub struct ContractClient {
    /// Contract address
    pub contract_address: Address,
    /// RPC URL
    pub rpc_url: String,
    /// Local signer, if a private key is configured
    signer: Option<PrivateKeySigner>,
    /// Configuration
    pub config: EthereumGatewayConfig,
}

impl ContractClient {
    /// Creates a new contract client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Contract address is invalid
    /// - Private key is invalid (if provided)
    pub fn new(config: EthereumGatewayConfig) -> Result<Self> {
        let contract_address = Address::from_str(&config.contract_address).map_err(|e| {
            EthereumGatewayError::Configuration(format!(
                "Invalid contract address '{}': {}",
                config.contract_address, e
            ))
        })?;

        let signer = match config.private_key.as_deref() {
            Some(pk) if !pk.is_empty() => Some(pk.parse::<PrivateKeySigner>().map_err(|e| {
                EthereumGatewayError::Configuration(format!("Invalid private key: {}", e))
            })?),
            _ => None,
        };

        Ok(Self {
            contract_address,
            rpc_url: config.rpc_url.clone(),
            signer,
            config,
        })
    }

    /// Returns the contract address
    pub fn contract_address(&self) -> &Address {
        &self.contract_address
    }

    /// Returns the chain ID from configuration
    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    /// Checks if the client signs transactions locally
    pub fn has_wallet(&self) -> bool {
        self.signer.is_some()
    }

    /// Address of the local signer, if any
    pub fn signer_address(&self) -> Option<Address> {
        self.signer.as_ref().map(|s| s.address())
    }

    /// Returns the RPC URL
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Create a read-only provider for contract calls
    pub fn create_provider(&self) -> Result<DynProvider> {
        let rpc_url = self
            .rpc_url
            .parse()
            .map_err(|e| EthereumGatewayError::ProviderError(format!("Invalid RPC URL: {}", e)))?;

        Ok(ProviderBuilder::new().connect_http(rpc_url).erased())
    }

    /// Create a provider able to send transactions on behalf of `from`
    ///
    /// With a local signer, `from` must be the signer's address. Without one
    /// the node signs, which only works for accounts it has unlocked.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The local signer's address differs from `from`
    /// - The RPC URL is invalid
    pub fn create_provider_for_sender(&self, from: Address) -> Result<DynProvider> {
        let rpc_url = self
            .rpc_url
            .parse()
            .map_err(|e| EthereumGatewayError::ProviderError(format!("Invalid RPC URL: {}", e)))?;

        match &self.signer {
            Some(signer) => {
                if signer.address() != from {
                    return Err(EthereumGatewayError::WalletError(format!(
                        "Configured signer is {} but the active account is {}",
                        signer.address(),
                        from
                    )));
                }
                let wallet = EthereumWallet::from(signer.clone());
                Ok(ProviderBuilder::new().wallet(wallet).connect_http(rpc_url).erased())
            }
            None => Ok(ProviderBuilder::new().connect_http(rpc_url).erased()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const ANVIL_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn test_config() -> EthereumGatewayConfig {
        EthereumGatewayConfig {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            private_key: None,
            confirmation_blocks: 1,
            tx_timeout_secs: None,
        }
    }

    #[test]
    fn test_contract_client_creation() {
        assert!(ContractClient::new(test_config()).is_ok());
    }

    #[test]
    fn test_invalid_contract_address() {
        let mut config = test_config();
        config.contract_address = "invalid".to_string();
        assert!(ContractClient::new(config).is_err());
    }

    #[test]
    fn test_contract_client_methods() {
        let client = ContractClient::new(test_config()).unwrap();
        assert_eq!(client.chain_id(), 31337);
        assert!(!client.has_wallet());
        assert_eq!(client.signer_address(), None);
        assert_eq!(client.rpc_url(), "http://localhost:8545");
    }

    #[test]
    fn test_signer_address() {
        let mut config = test_config();
        config.private_key = Some(ANVIL_KEY.to_string());
        let client = ContractClient::new(config).unwrap();
        assert!(client.has_wallet());
        assert_eq!(
            client.signer_address(),
            Some(Address::from_str(ANVIL_ADDRESS).unwrap())
        );
    }

    #[test]
    fn test_sender_must_match_signer() {
        let mut config = test_config();
        config.private_key = Some(ANVIL_KEY.to_string());
        let client = ContractClient::new(config).unwrap();

        let other = Address::from_str("0x70997970C51812dc3A010C7d01b50e0d17dc79C8").unwrap();
        assert!(matches!(
            client.create_provider_for_sender(other),
            Err(EthereumGatewayError::WalletError(_))
        ));

        let own = Address::from_str(ANVIL_ADDRESS).unwrap();
        assert!(client.create_provider_for_sender(own).is_ok());
    }
}
