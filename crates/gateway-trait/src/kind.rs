//! Gateway backend kinds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend a gateway talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GatewayKind {
    /// Ethereum mainnet
    Ethereum,
    /// Sepolia or Holesky testnets
    Testnet,
    /// Local development node (Anvil, Hardhat)
    Local,
    /// In-process simulation, no chain at all
    Memory,
}

impl fmt::Display for GatewayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ethereum => write!(f, "Ethereum"),
            Self::Testnet => write!(f, "Testnet"),
            Self::Local => write!(f, "Local"),
            Self::Memory => write!(f, "Memory"),
        }
    }
}

impl GatewayKind {
    /// Map a chain ID onto a backend kind
    pub fn from_chain_id(chain_id: u64) -> Self {
        match chain_id {
            1 => Self::Ethereum,
            11155111 | 17000 => Self::Testnet,
            _ => Self::Local,
        }
    }
}
