//! Ethereum Crop Gateway
//!
//! Implements `CropGateway` for the AgriSupplyChain contract on Ethereum and
//! EVM-compatible chains. Each operation is a separate call or transaction;
//! there is no batching and no background task.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{
    abi::AgriSupplyChain,
    config::EthereumGatewayConfig,
    contract::ContractClient,
    conversions::*,
    error::{EthereumGatewayError, Result},
};
use agri_gateway_trait::{Account, Crop, CropDetails, CropGateway, CropId, GatewayKind, TxReceipt};

use alloy::network::Ethereum;
use alloy::primitives::{TxHash, U256};
use alloy::providers::PendingTransactionBuilder;

/// Ethereum gateway implementation
///
/// # Example
///
/// ```ignore
/// use agri_gateway_ethereum::{EthereumGateway, EthereumGatewayConfig};
///
/// let config = EthereumGatewayConfig {
///     contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
///     ..Default::default()
/// };
///
/// let gateway = EthereumGateway::new(config)?;
/// let owner = gateway.owner().await?;
/// ```
pub struct EthereumGateway {
    /// Contract client with connection details
    contract: Arc<ContractClient>,

    /// Configuration
    config: EthereumGatewayConfig,
}

impl EthereumGateway {
    /// Create a new Ethereum gateway
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - Contract address is invalid
    /// - Private key is invalid (if provided)
    pub fn new(config: EthereumGatewayConfig) -> Result<Self> {
        info!(
            "Initializing Ethereum gateway for chain {} at {}",
            config.chain_id, config.contract_address
        );

        config.validate().map_err(EthereumGatewayError::Configuration)?;

        let contract = Arc::new(ContractClient::new(config.clone())?);

        Ok(Self { contract, config })
    }

    /// Shared contract client, used by wallets built on the same connection
    pub fn contract_client(&self) -> Arc<ContractClient> {
        Arc::clone(&self.contract)
    }

    /// Format transaction hash for return as String
    fn format_tx_hash(&self, hash: TxHash) -> String {
        format!("0x{:x}", hash)
    }

    /// Wait for a submitted transaction and turn its receipt into a `TxReceipt`
    ///
    /// Resolves only after the configured number of confirmations; a receipt
    /// with a failed status is reported as a revert.
    async fn confirm(&self, pending: PendingTransactionBuilder<Ethereum>) -> Result<TxReceipt> {
        let tx_hash = self.format_tx_hash(*pending.tx_hash());
        debug!("Waiting for {} confirmation(s) of {}", self.config.confirmation_blocks, tx_hash);

        let receipt_future = pending
            .with_required_confirmations(self.config.confirmation_blocks)
            .get_receipt();

        let receipt = match self.config.tx_timeout_secs {
            Some(seconds) => tokio::time::timeout(Duration::from_secs(seconds), receipt_future)
                .await
                .map_err(|_| EthereumGatewayError::TransactionTimeout {
                    tx_hash: tx_hash.clone(),
                    seconds,
                })?,
            None => receipt_future.await,
        }
        .map_err(|e| EthereumGatewayError::Transaction(e.to_string()))?;

        if !receipt.status() {
            warn!("Transaction {} reverted", tx_hash);
            return Err(EthereumGatewayError::Reverted { tx_hash });
        }

        Ok(TxReceipt {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}

#[async_trait]
impl CropGateway for EthereumGateway {
    type Error = EthereumGatewayError;

    fn gateway_kind(&self) -> GatewayKind {
        GatewayKind::from_chain_id(self.config.chain_id)
    }

    fn chain_id(&self) -> u64 {
        self.contract.chain_id()
    }

    // ===== Read Operations =====

    async fn owner(&self) -> Result<Account> {
        debug!("Fetching contract owner");

        let provider = self.contract.create_provider()?;
        let contract = AgriSupplyChain::new(*self.contract.contract_address(), &provider);

        let owner = contract
            .owner()
            .call()
            .await
            .map_err(|e| EthereumGatewayError::ContractCall(e.to_string()))?;

        address_to_account(owner)
    }

    async fn crop_count(&self) -> Result<u64> {
        debug!("Fetching crop count");

        let provider = self.contract.create_provider()?;
        let contract = AgriSupplyChain::new(*self.contract.contract_address(), &provider);

        let count = contract
            .cropCount()
            .call()
            .await
            .map_err(|e| EthereumGatewayError::ContractCall(e.to_string()))?;

        u256_to_u64(count, "crop count")
    }

    async fn crop(&self, id: CropId) -> Result<Crop> {
        debug!("Fetching crop {}", id);

        let provider = self.contract.create_provider()?;
        let contract = AgriSupplyChain::new(*self.contract.contract_address(), &provider);

        let result = contract
            .crops(U256::from(id))
            .call()
            .await
            .map_err(|e| EthereumGatewayError::ContractCall(e.to_string()))?;

        convert_crop(result.id, result.farmer, result.details, result.status, result.buyer)
    }

    async fn is_inspector(&self, account: &Account) -> Result<bool> {
        debug!("Checking inspector role for {}", account);

        let provider = self.contract.create_provider()?;
        let contract = AgriSupplyChain::new(*self.contract.contract_address(), &provider);

        contract
            .inspectors(account_to_address(account)?)
            .call()
            .await
            .map_err(|e| EthereumGatewayError::ContractCall(e.to_string()))
    }

    // ===== Write Operations =====

    async fn add_inspector(&self, from: &Account, inspector: &Account) -> Result<TxReceipt> {
        debug!("Adding inspector {} from {}", inspector, from);

        let sender = account_to_address(from)?;
        let provider = self.contract.create_provider_for_sender(sender)?;
        let contract = AgriSupplyChain::new(*self.contract.contract_address(), &provider);

        let pending_tx = contract
            .addInspector(account_to_address(inspector)?)
            .from(sender)
            .send()
            .await
            .map_err(|e| EthereumGatewayError::from_send_error(e.to_string()))?;

        let receipt = self.confirm(pending_tx).await?;
        info!("Inspector {} added in tx {}", inspector, receipt.tx_hash);
        Ok(receipt)
    }

    async fn upload_crop(&self, from: &Account, details: &CropDetails) -> Result<TxReceipt> {
        debug!("Uploading crop '{}' from {}", details.name, from);

        let sender = account_to_address(from)?;
        let provider = self.contract.create_provider_for_sender(sender)?;
        let contract = AgriSupplyChain::new(*self.contract.contract_address(), &provider);

        let pending_tx = contract
            .uploadCrop(
                details.name.clone(),
                details.crop_type.clone(),
                U256::from(details.quantity),
                U256::from(details.unit_price),
                details.harvest_date.clone(),
                details.fertilizer_used.clone(),
                details.pesticide_used.clone(),
                details.quality_grade.clone(),
                details.image_hash.clone(),
                details.geo_location.clone(),
            )
            .from(sender)
            .send()
            .await
            .map_err(|e| EthereumGatewayError::from_send_error(e.to_string()))?;

        let receipt = self.confirm(pending_tx).await?;
        info!("Crop '{}' uploaded in tx {}", details.name, receipt.tx_hash);
        Ok(receipt)
    }

    async fn approve_crop(&self, from: &Account, id: CropId) -> Result<TxReceipt> {
        debug!("Approving crop {} from {}", id, from);

        let sender = account_to_address(from)?;
        let provider = self.contract.create_provider_for_sender(sender)?;
        let contract = AgriSupplyChain::new(*self.contract.contract_address(), &provider);

        let pending_tx = contract
            .approveCrop(U256::from(id))
            .from(sender)
            .send()
            .await
            .map_err(|e| EthereumGatewayError::from_send_error(e.to_string()))?;

        let receipt = self.confirm(pending_tx).await?;
        info!("Crop {} approved in tx {}", id, receipt.tx_hash);
        Ok(receipt)
    }

    async fn buy_crop(&self, from: &Account, id: CropId, payment: u128) -> Result<TxReceipt> {
        debug!("Buying crop {} from {} for {} wei", id, from, payment);

        let sender = account_to_address(from)?;
        let provider = self.contract.create_provider_for_sender(sender)?;
        let contract = AgriSupplyChain::new(*self.contract.contract_address(), &provider);

        let pending_tx = contract
            .buyCrop(U256::from(id))
            .value(U256::from(payment))
            .from(sender)
            .send()
            .await
            .map_err(|e| EthereumGatewayError::from_send_error(e.to_string()))?;

        let receipt = self.confirm(pending_tx).await?;
        info!("Crop {} bought by {} in tx {}", id, from, receipt.tx_hash);
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_gateway_creation() {
        assert!(EthereumGateway::new(test_config()).is_ok());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = test_config();
        config.confirmation_blocks = 0;
        assert!(matches!(
            EthereumGateway::new(config),
            Err(EthereumGatewayError::Configuration(_))
        ));
    }

    #[test]
    fn test_gateway_kind() {
        let mut config = test_config();
        config.chain_id = 1;
        let gateway = EthereumGateway::new(config).unwrap();
        assert_eq!(gateway.gateway_kind(), GatewayKind::Ethereum);

        let mut config = test_config();
        config.chain_id = 11155111;
        let gateway = EthereumGateway::new(config).unwrap();
        assert_eq!(gateway.gateway_kind(), GatewayKind::Testnet);

        let gateway = EthereumGateway::new(test_config()).unwrap();
        assert_eq!(gateway.gateway_kind(), GatewayKind::Local);
        assert_eq!(gateway.chain_id(), 31337);
    }

    #[test]
    fn test_format_tx_hash() {
        let gateway = EthereumGateway::new(test_config()).unwrap();
        let hash = TxHash::from([0u8; 32]);
        assert_eq!(
            gateway.format_tx_hash(hash),
            "0x0000000000000000000000000000000000000000000000000000000000000000"
        );
    }
}
