use agri_gateway_trait::GatewayError;
use thiserror::Error;

use crate::views::ViewKind;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("No wallet account available - connect a wallet first")]
    NoWallet,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Access denied: the active account cannot use the {view} view")]
    AccessDenied { view: ViewKind },

    #[error("A {view} mutation for {target} is already in flight")]
    MutationInFlight { view: ViewKind, target: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DashboardError {
    /// Check if the error came back from a state-changing gateway call
    pub fn is_mutation_failure(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_mutation_failure())
    }

    /// Check if the error means the backend or wallet is unreachable
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Gateway(e) => e.is_connectivity(),
            Self::NoWallet => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
