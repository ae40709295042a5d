//! Block replica proof agent library.
//!
//! Attests on a ledger that a block replica was processed: a digest of the
//! result and the replica's retrieval URL are submitted to a registry
//! contract, and the caller gets back the mined transaction hash or the
//! empty outcome.

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod proof;
pub mod replica;

pub use blockchain::{Credential, LedgerClient, RpcLedgerClient};
pub use config::AgentConfig;
pub use proof::{ProofRequest, ProofSubmitter, TransactionOutcome};
pub use replica::{BlockReplica, ResultSegment};
