//! Wallet implementations backed by Ethereum signers and nodes

use crate::contract::ContractClient;
use crate::conversions::address_to_account;
use crate::error::{EthereumGatewayError, Result};
use agri_gateway_trait::{Account, AccountStream, Wallet};
use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy::signers::local::PrivateKeySigner;
use async_stream::stream;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Wallet holding a single local private key
///
/// The account list never changes, so the change stream yields nothing and
/// stays open for as long as the caller polls it.
pub struct SignerWallet {
    account: Account,
}

impl SignerWallet {
    /// Build a wallet from a 0x-prefixed private key
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let signer = private_key
            .parse::<PrivateKeySigner>()
            .map_err(|e| EthereumGatewayError::WalletError(format!("Invalid private key: {}", e)))?;
        Ok(Self {
            account: address_to_account(signer.address())?,
        })
    }

    pub fn account(&self) -> &Account {
        &self.account
    }
}

#[async_trait]
impl Wallet for SignerWallet {
    type Error = EthereumGatewayError;

    async fn request_accounts(&self) -> Result<Vec<Account>> {
        Ok(vec![self.account.clone()])
    }

    async fn accounts(&self) -> Result<Vec<Account>> {
        Ok(vec![self.account.clone()])
    }

    async fn account_changes(&self) -> Result<AccountStream> {
        Ok(Box::pin(futures::stream::pending::<Vec<Account>>()))
    }
}

/// Wallet over the accounts a node manages (`eth_accounts`)
///
/// Nodes have no push notification for account changes over HTTP, so changes
/// are detected by polling and only emitted when the list actually differs.
pub struct RpcWallet {
    contract: Arc<ContractClient>,
    poll_interval: Duration,
}

impl RpcWallet {
    pub fn new(contract: Arc<ContractClient>, poll_interval: Duration) -> Self {
        Self {
            contract,
            poll_interval,
        }
    }

    fn to_accounts(addresses: Vec<Address>) -> Result<Vec<Account>> {
        addresses.into_iter().map(address_to_account).collect()
    }
}

#[async_trait]
impl Wallet for RpcWallet {
    type Error = EthereumGatewayError;

    async fn request_accounts(&self) -> Result<Vec<Account>> {
        let provider = self.contract.create_provider()?;

        match provider
            .raw_request::<_, Vec<Address>>("eth_requestAccounts".into(), ())
            .await
        {
            Ok(addresses) => Self::to_accounts(addresses),
            Err(e) => {
                // Plain nodes often do not implement the EIP-1102 prompt
                debug!("eth_requestAccounts unavailable ({}), falling back to eth_accounts", e);
                self.accounts().await
            }
        }
    }

    async fn accounts(&self) -> Result<Vec<Account>> {
        let provider = self.contract.create_provider()?;
        let addresses = provider
            .get_accounts()
            .await
            .map_err(|e| EthereumGatewayError::Rpc(e.to_string()))?;
        Self::to_accounts(addresses)
    }

    async fn account_changes(&self) -> Result<AccountStream> {
        let contract = Arc::clone(&self.contract);
        let poll_interval = self.poll_interval;
        let mut last = self.accounts().await?;

        info!("👁️  Watching node accounts every {:?}", poll_interval);

        let stream = stream! {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;

                let provider = match contract.create_provider() {
                    Ok(provider) => provider,
                    Err(e) => {
                        warn!("Account watcher could not build provider: {}", e);
                        continue;
                    }
                };

                let current = match provider.get_accounts().await {
                    Ok(addresses) => match RpcWallet::to_accounts(addresses) {
                        Ok(accounts) => accounts,
                        Err(e) => {
                            warn!("Account watcher got malformed accounts: {}", e);
                            continue;
                        }
                    },
                    Err(e) => {
                        // An unreachable node exposes no accounts
                        warn!("Account watcher failed to fetch accounts: {}", e);
                        Vec::new()
                    }
                };

                if current != last {
                    debug!("Node accounts changed: {} -> {}", last.len(), current.len());
                    last = current.clone();
                    yield current;
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
