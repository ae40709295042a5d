//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

// Re-export LedgerConfig from config module to avoid duplication
pub use crate::config::schema::LedgerConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The submission deadline passed while waiting on the ledger.
    #[error("Submission deadline exceeded")]
    DeadlineExceeded,

    /// Transaction was not mined before the deadline.
    #[error("Transaction {0} not mined before deadline")]
    ConfirmationTimeout(TxHash),

    /// Transaction was mined but reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(TxHash),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Transaction options cannot be scoped to this chain.
    #[error("Cannot build transaction options for chain ID {0}")]
    InvalidChainId(u64),

    /// Registry contract could not be bound.
    #[error("Contract binding error: {0}")]
    Binding(String),

    /// Registry contract call was rejected before broadcast.
    #[error("Contract call to {address} failed: {reason}")]
    Contract { address: Address, reason: String },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// A broadcast transaction that has not been resolved yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingProof {
    /// Hash of the broadcast transaction.
    pub tx_hash: TxHash,
}

/// The part of a transaction receipt the agent cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinedReceipt {
    /// Hash of the mined transaction.
    pub tx_hash: TxHash,
    /// Block the transaction was included in, when the node reports it.
    pub block_number: Option<u64>,
    /// `true` when execution succeeded.
    pub status: bool,
}

impl From<alloy::rpc::types::TransactionReceipt> for MinedReceipt {
    fn from(receipt: alloy::rpc::types::TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            status: receipt.status(),
        }
    }
}
