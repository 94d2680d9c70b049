//! Wallet abstraction
//!
//! A wallet supplies the active account list and notifies the client whenever
//! that list changes (account switch or disconnect). An empty list means the
//! wallet is disconnected.

use crate::error::GatewayError;
use crate::types::Account;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Stream of account lists, one item per wallet-side change
pub type AccountStream = Pin<Box<dyn Stream<Item = Vec<Account>> + Send>>;

#[async_trait]
pub trait Wallet: Send + Sync {
    /// Error type for this wallet
    type Error: std::error::Error + Into<GatewayError> + Send + Sync + 'static;

    /// Ask the wallet for access to its accounts (`eth_requestAccounts`)
    async fn request_accounts(&self) -> Result<Vec<Account>, Self::Error>;

    /// Accounts currently exposed without prompting (`eth_accounts`)
    async fn accounts(&self) -> Result<Vec<Account>, Self::Error>;

    /// Subscribe to account list changes
    async fn account_changes(&self) -> Result<AccountStream, Self::Error>;
}
