//! Transaction receipts

use serde::{Deserialize, Serialize};

/// Confirmed transaction, returned by every successful mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash, 0x-prefixed hex
    pub tx_hash: String,

    /// Block the transaction was included in
    pub block_number: Option<u64>,

    /// Gas used by the transaction
    pub gas_used: u64,
}
