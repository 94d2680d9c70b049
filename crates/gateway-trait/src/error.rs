//! Error types for gateway operations

use thiserror::Error;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Backend-independent gateway error
///
/// Backends keep their own richer error types and convert into this one so the
/// dashboard can classify failures without knowing which backend is in use.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No wallet, unreachable node, or broken provider
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// Requested record does not exist
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Remote data could not be mapped onto client types
    #[error("Conversion error: {message}")]
    Conversion { message: String },

    /// A mutation did not take effect: user rejection, insufficient funds, or
    /// a remote revert. State is unchanged.
    #[error("Mutation failed: {reason}")]
    MutationFailed {
        reason: String,
        tx_hash: Option<String>,
    },

    /// A mutation was submitted but its confirmation was not observed. It may
    /// still take effect, so state must be re-read rather than assumed unchanged.
    #[error("Transaction {tx_hash} unconfirmed: {reason}")]
    Unconfirmed { tx_hash: String, reason: String },

    /// Caller lacks the role the remote method requires
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Invalid input parameters
    #[error("Invalid {parameter}: {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Wrapper for other error types
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GatewayError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    /// Create a conversion error
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }

    /// Create a mutation failure
    pub fn mutation_failed(reason: impl Into<String>, tx_hash: Option<String>) -> Self {
        Self::MutationFailed {
            reason: reason.into(),
            tx_hash,
        }
    }

    /// Create an unconfirmed-mutation error
    pub fn unconfirmed(tx_hash: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unconfirmed {
            tx_hash: tx_hash.into(),
            reason: reason.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Check if this error means the backend could not be reached at all
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Check if this error is a failed state-changing call
    ///
    /// Authorization failures reported by the remote side are treated the same
    /// way as reverts.
    pub fn is_mutation_failure(&self) -> bool {
        matches!(self, Self::MutationFailed { .. } | Self::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(GatewayError::connection("no wallet").is_connectivity());
        assert!(!GatewayError::connection("no wallet").is_mutation_failure());

        let reverted = GatewayError::mutation_failed("execution reverted", Some("0xabc".into()));
        assert!(reverted.is_mutation_failure());
        assert!(!reverted.is_connectivity());

        assert!(GatewayError::unauthorized("not owner").is_mutation_failure());
        assert!(!GatewayError::not_found("crop", 7).is_mutation_failure());

        let pending = GatewayError::unconfirmed("0xabc", "timed out");
        assert!(!pending.is_mutation_failure());
        assert!(!pending.is_connectivity());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(GatewayError::not_found("crop", 7).to_string(), "crop not found: 7");
        assert_eq!(
            GatewayError::invalid_parameter("payment", "too low").to_string(),
            "Invalid payment: too low"
        );
        assert_eq!(
            GatewayError::mutation_failed("user rejected", None).to_string(),
            "Mutation failed: user rejected"
        );
    }
}
