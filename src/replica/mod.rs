//! Block replicas and the result payloads proven about them.

pub mod encoding;
pub mod types;

pub use types::{BlockReplica, BlockResult, Header, Log, Receipt, ResultSegment, Transaction};
