//! Error types for the Ethereum gateway

use agri_gateway_trait::GatewayError;
use thiserror::Error;

/// Result type alias for Ethereum gateway operations
pub type Result<T> = std::result::Result<T, EthereumGatewayError>;

/// Errors that can occur in the Ethereum gateway
#[derive(Debug, Error)]
pub enum EthereumGatewayError {
    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Contract call (read operation) failed
    #[error("Contract call failed: {0}")]
    ContractCall(String),

    /// Transaction could not be submitted or its receipt could not be fetched
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Transaction was mined but reverted
    #[error("Transaction reverted: {tx_hash}")]
    Reverted {
        /// Hash of the reverted transaction
        tx_hash: String,
    },

    /// Signer or node refused to sign
    #[error("User rejected the transaction: {0}")]
    UserRejected(String),

    /// Sender cannot pay for value plus gas
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// RPC connection or network error
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Gave up waiting for confirmation
    #[error("Transaction {tx_hash} not confirmed after {seconds} seconds")]
    TransactionTimeout {
        /// Hash of the pending transaction
        tx_hash: String,
        /// Configured timeout
        seconds: u64,
    },

    /// Invalid Ethereum address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Type conversion error
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Wallet/signer error
    #[error("Wallet error: {0}")]
    WalletError(String),

    /// Provider creation or connection error
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Generic error from anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EthereumGatewayError {
    /// Classify an error raised while submitting a transaction
    ///
    /// Nodes and signers report rejections, balance problems and reverts as
    /// free-text RPC errors, so the message is the only signal available.
    pub fn from_send_error(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("user rejected") || lower.contains("user denied") || lower.contains("rejected by user") {
            Self::UserRejected(message)
        } else if lower.contains("insufficient funds") {
            Self::InsufficientFunds(message)
        } else {
            Self::Transaction(message)
        }
    }

    /// Check if this error indicates a configuration problem
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::InvalidAddress(_)
        )
    }

    /// Check if this error indicates a network problem
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::Rpc(_) | Self::ProviderError(_)
        )
    }

    /// Check if this error is a failed mutation (nothing changed on chain)
    ///
    /// A confirmation timeout is not one: the transaction was sent and may
    /// still be mined.
    pub fn is_mutation_failure(&self) -> bool {
        matches!(
            self,
            Self::Transaction(_) | Self::Reverted { .. } | Self::UserRejected(_) | Self::InsufficientFunds(_)
        )
    }
}

impl From<EthereumGatewayError> for GatewayError {
    fn from(error: EthereumGatewayError) -> Self {
        let message = error.to_string();
        match error {
            EthereumGatewayError::Reverted { tx_hash } => GatewayError::mutation_failed(message, Some(tx_hash)),
            EthereumGatewayError::TransactionTimeout { tx_hash, .. } => GatewayError::unconfirmed(tx_hash, message),
            EthereumGatewayError::Transaction(_)
            | EthereumGatewayError::UserRejected(_)
            | EthereumGatewayError::InsufficientFunds(_) => GatewayError::mutation_failed(message, None),
            EthereumGatewayError::ContractCall(_)
            | EthereumGatewayError::Rpc(_)
            | EthereumGatewayError::ProviderError(_)
            | EthereumGatewayError::WalletError(_) => GatewayError::connection(message),
            EthereumGatewayError::InvalidAddress(_) => GatewayError::invalid_parameter("address", message),
            EthereumGatewayError::Conversion(_) => GatewayError::conversion(message),
            EthereumGatewayError::Other(e) => GatewayError::Other(e),
            EthereumGatewayError::Configuration(_) => GatewayError::Other(anyhow::anyhow!(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_send_error() {
        assert!(matches!(
            EthereumGatewayError::from_send_error("MetaMask Tx Signature: User denied transaction signature."),
            EthereumGatewayError::UserRejected(_)
        ));
        assert!(matches!(
            EthereumGatewayError::from_send_error("insufficient funds for gas * price + value"),
            EthereumGatewayError::InsufficientFunds(_)
        ));
        assert!(matches!(
            EthereumGatewayError::from_send_error("execution reverted: Crop not approved"),
            EthereumGatewayError::Transaction(_)
        ));
    }

    #[test]
    fn test_mutation_failures_collapse_into_one_outcome() {
        let errors = vec![
            EthereumGatewayError::UserRejected("denied".to_string()),
            EthereumGatewayError::InsufficientFunds("broke".to_string()),
            EthereumGatewayError::Reverted {
                tx_hash: "0xabc".to_string(),
            },
            EthereumGatewayError::Transaction("execution reverted".to_string()),
        ];
        for error in errors {
            assert!(error.is_mutation_failure());
            let converted: GatewayError = error.into();
            assert!(converted.is_mutation_failure(), "{converted}");
        }
    }

    #[test]
    fn test_reverted_keeps_tx_hash() {
        let converted: GatewayError = EthereumGatewayError::Reverted {
            tx_hash: "0xdead".to_string(),
        }
        .into();
        match converted {
            GatewayError::MutationFailed { tx_hash, .. } => assert_eq!(tx_hash.as_deref(), Some("0xdead")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_network_errors_are_connectivity() {
        let converted: GatewayError = EthereumGatewayError::Rpc("connection refused".to_string()).into();
        assert!(converted.is_connectivity());
        assert!(EthereumGatewayError::Rpc("x".to_string()).is_network_error());
        assert!(!EthereumGatewayError::Rpc("x".to_string()).is_configuration_error());
        assert!(EthereumGatewayError::Configuration("bad url".to_string()).is_configuration_error());
    }

    #[test]
    fn test_timeout_is_unconfirmed_not_failed() {
        let timeout = EthereumGatewayError::TransactionTimeout {
            tx_hash: "0xbeef".to_string(),
            seconds: 30,
        };
        assert!(!timeout.is_mutation_failure());

        let converted: GatewayError = timeout.into();
        assert!(!converted.is_mutation_failure());
        match converted {
            GatewayError::Unconfirmed { tx_hash, .. } => assert_eq!(tx_hash, "0xbeef"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
