//! Submission requests and errors.

use thiserror::Error;
use tokio::time::Instant;

use crate::blockchain::BlockchainError;
use crate::replica::{BlockReplica, ResultSegment};

/// Everything one proof submission needs besides the shared submitter state.
#[derive(Debug, Clone)]
pub struct ProofRequest {
    /// Replica the proof is about.
    pub replica: BlockReplica,
    /// Chain height the proof is filed at.
    pub chain_height: u64,
    /// Length of the processed chain segment. Logged, not submitted.
    pub chain_length: u64,
    /// Result computed for the replica.
    pub result_segment: ResultSegment,
    /// Where the replica can be retrieved.
    pub replica_url: String,
    /// Caller deadline. The submitter never waits past its own timeout.
    pub deadline: Option<Instant>,
}

impl ProofRequest {
    pub fn new(
        replica: BlockReplica,
        chain_height: u64,
        result_segment: ResultSegment,
        replica_url: impl Into<String>,
    ) -> Self {
        Self {
            replica,
            chain_height,
            chain_length: 1,
            result_segment,
            replica_url: replica_url.into(),
            deadline: None,
        }
    }

    pub fn with_chain_length(mut self, chain_length: u64) -> Self {
        self.chain_length = chain_length;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Why a submission produced no mined transaction.
///
/// Each message embeds its cause, so the cause is not also exposed as
/// the error source.
#[derive(Debug, Error)]
pub enum ProofError {
    /// Options could not be derived; nothing was broadcast.
    #[error("Transaction authorization failed: {0}")]
    Authorization(BlockchainError),

    /// Registry could not be bound; nothing was broadcast.
    #[error("Binding to proof contract failed: {0}")]
    Binding(BlockchainError),

    /// Result segment could not be encoded; nothing was broadcast.
    #[error("Result segment serialization failed: {0}")]
    Serialization(serde_json::Error),

    /// Registry call did not return a transaction hash. A timeout during the
    /// call leaves open whether the node already accepted it.
    #[error("Proof contract call failed: {0}")]
    Submission(BlockchainError),

    /// Broadcast, but not mined successfully before the deadline.
    #[error("Proof transaction not confirmed: {0}")]
    Confirmation(BlockchainError),
}

impl ProofError {
    /// Stable stage label for logs and metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            ProofError::Authorization(_) => "authorization",
            ProofError::Binding(_) => "binding",
            ProofError::Serialization(_) => "serialization",
            ProofError::Submission(_) => "submission",
            ProofError::Confirmation(_) => "confirmation",
        }
    }

    /// Whether a transaction may have reached the network.
    ///
    /// True once broadcast, and for a registry call cut short by a timeout.
    pub fn may_have_broadcast(&self) -> bool {
        match self {
            ProofError::Confirmation(_) => true,
            ProofError::Submission(e) => matches!(
                e,
                BlockchainError::DeadlineExceeded | BlockchainError::Timeout(_)
            ),
            _ => false,
        }
    }
}
