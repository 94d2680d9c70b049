use agri_dashboard::{ControllerOptions, DashboardConfig, DashboardController, RoleHintStore};
use agri_gateway_ethereum::{EthereumGateway, RpcWallet, SignerWallet};
use agri_gateway_trait::{Account, AccountStream, CropGateway, GatewayError, Wallet};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::cli::Cli;

/// Either a local signer or the node's own accounts
pub enum NodeWallet {
    Signer(SignerWallet),
    Rpc(RpcWallet),
}

#[async_trait]
impl Wallet for NodeWallet {
    type Error = GatewayError;

    async fn request_accounts(&self) -> Result<Vec<Account>, GatewayError> {
        match self {
            Self::Signer(wallet) => wallet.request_accounts().await.map_err(Into::into),
            Self::Rpc(wallet) => wallet.request_accounts().await.map_err(Into::into),
        }
    }

    async fn accounts(&self) -> Result<Vec<Account>, GatewayError> {
        match self {
            Self::Signer(wallet) => wallet.accounts().await.map_err(Into::into),
            Self::Rpc(wallet) => wallet.accounts().await.map_err(Into::into),
        }
    }

    async fn account_changes(&self) -> Result<AccountStream, GatewayError> {
        match self {
            Self::Signer(wallet) => wallet.account_changes().await.map_err(Into::into),
            Self::Rpc(wallet) => wallet.account_changes().await.map_err(Into::into),
        }
    }
}

pub type NodeController = DashboardController<EthereumGateway, NodeWallet>;

/// Merge the config file with command-line and environment overrides
pub fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    Ok(DashboardConfig::load(cli.config.as_deref())?.with_overrides(
        cli.rpc_url.clone(),
        cli.contract_address.clone(),
        cli.private_key.clone(),
    ))
}

pub fn role_hints(config: &DashboardConfig) -> RoleHintStore {
    RoleHintStore::new(&config.role_hint_path)
}

/// Build a controller against the configured contract
pub fn build_controller(config: &DashboardConfig, options: ControllerOptions) -> Result<NodeController> {
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    let gateway = EthereumGateway::new(config.gateway.clone())?;

    let wallet = match config.gateway.private_key.as_deref() {
        Some(key) if !key.is_empty() => NodeWallet::Signer(SignerWallet::from_private_key(key)?),
        _ => NodeWallet::Rpc(RpcWallet::new(
            gateway.contract_client(),
            config.account_poll_interval(),
        )),
    };

    info!(
        "Using {} gateway on chain {} at {}",
        gateway.gateway_kind(),
        gateway.chain_id(),
        config.gateway.contract_address
    );

    Ok(DashboardController::new(Arc::new(gateway), Arc::new(wallet), options))
}
