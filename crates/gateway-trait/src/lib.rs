//! Crop Gateway Trait - Core abstraction over the supply-chain contract
//!
//! This crate defines the `CropGateway` trait, the client's only way to read or
//! mutate crop state, and the `Wallet` trait that supplies the active account.
//! The remote contract is the single source of truth: nothing in this crate
//! holds state of its own.

use async_trait::async_trait;

pub mod error;
pub mod kind;
pub mod types;
pub mod wallet;

pub use error::{GatewayError, GatewayResult};
pub use kind::GatewayKind;
pub use types::*;
pub use wallet::{AccountStream, Wallet};

/// Main gateway trait that every contract backend must implement
///
/// Read operations are plain calls. Mutating operations resolve only once the
/// transaction is confirmed; a returned `Ok` means the state change happened,
/// an `Err` means nothing changed.
#[async_trait]
pub trait CropGateway: Send + Sync {
    /// Error type for this gateway
    type Error: std::error::Error + Into<GatewayError> + Send + Sync + 'static;

    // ===== Gateway Identification =====

    /// Get the kind of backend behind this gateway
    fn gateway_kind(&self) -> GatewayKind;

    /// Get the chain ID the contract is deployed on
    fn chain_id(&self) -> u64;

    // ===== Read Operations =====

    /// Contract owner (`getOwner`)
    async fn owner(&self) -> Result<Account, Self::Error>;

    /// Number of crops ever uploaded (`getCropCount`)
    async fn crop_count(&self) -> Result<u64, Self::Error>;

    /// Fetch a single crop by id (`getCrop`)
    async fn crop(&self, id: CropId) -> Result<Crop, Self::Error>;

    /// Whether the account is a registered inspector
    async fn is_inspector(&self, account: &Account) -> Result<bool, Self::Error>;

    // ===== Write Operations =====

    /// Register a new inspector. Owner only.
    async fn add_inspector(&self, from: &Account, inspector: &Account) -> Result<TxReceipt, Self::Error>;

    /// Upload a new crop on behalf of `from`
    async fn upload_crop(&self, from: &Account, details: &CropDetails) -> Result<TxReceipt, Self::Error>;

    /// Move an uploaded crop to Approved. Inspector only.
    async fn approve_crop(&self, from: &Account, id: CropId) -> Result<TxReceipt, Self::Error>;

    /// Buy an approved crop, attaching `payment` wei
    async fn buy_crop(&self, from: &Account, id: CropId, payment: u128) -> Result<TxReceipt, Self::Error>;
}
