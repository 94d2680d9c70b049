//! Ethereum Crop Gateway Implementation
//!
//! This crate implements the `CropGateway` trait from `agri-gateway-trait`
//! against the deployed AgriSupplyChain contract, plus two `Wallet`
//! implementations: a local private-key signer and node-managed accounts.
//!
//! # Example
//!
//! ```no_run
//! use agri_gateway_ethereum::{EthereumGateway, EthereumGatewayConfig};
//! use agri_gateway_trait::CropGateway;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EthereumGatewayConfig {
//!     rpc_url: "http://localhost:8545".to_string(),
//!     chain_id: 31337,
//!     contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
//!     ..Default::default()
//! };
//!
//! let gateway = EthereumGateway::new(config)?;
//! let count = gateway.crop_count().await?;
//! # Ok(())
//! # }
//! ```

pub mod abi;
pub mod config;
pub mod contract;
pub mod conversions;
pub mod error;
pub mod gateway;
pub mod wallet;

pub use config::EthereumGatewayConfig;
pub use contract::ContractClient;
pub use error::{EthereumGatewayError, Result};
pub use gateway::EthereumGateway;
pub use wallet::{RpcWallet, SignerWallet};

/// Re-export the gateway trait for convenience
pub use agri_gateway_trait::CropGateway;
