//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variable (private key)
//!     → wallet.rs (credential, chain-scoped transaction options)
//! Config (RPC URLs, timeouts)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → contract.rs (proof registry binding, sign + broadcast)
//!     → transaction.rs (wait for mining, check receipt status)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contract;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{LedgerClient, RpcLedgerClient};
pub use contract::{ProofArgs, ProofRegistry, RpcProofChain};
pub use transaction::{wait_mined, PollSchedule};
pub use types::{BlockchainError, BlockchainResult, ChainId, MinedReceipt, PendingProof};
pub use wallet::{authorize, Credential, TransactOpts};
