//! Block replica proof subsystem.
//!
//! # Data Flow
//! ```text
//! ProofRequest (replica, heights, result segment, replica URL)
//!     → submit.rs (orchestration under one deadline)
//!         → blockchain::wallet (transaction options)
//!         → blockchain::contract (registry binding + broadcast)
//!         → digest.rs (SHA-256 over the canonical encoding)
//!         → blockchain::transaction (wait mined, check status)
//!     → outcome.rs (exactly one outcome per submission)
//! ```

pub mod digest;
pub mod outcome;
pub mod submit;
pub mod types;

pub use digest::{digest, ProofDigest};
pub use outcome::{outcome_channel, OutcomeReceiver, OutcomeReporter, TransactionOutcome};
pub use submit::ProofSubmitter;
pub use types::{ProofError, ProofRequest};
