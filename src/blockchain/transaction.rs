//! Confirmation monitoring for broadcast proof transactions.
//!
//! # Responsibilities
//! - Poll for the receipt of a pending transaction
//! - Enforce the submission deadline
//! - Reject mined-but-reverted transactions

use rand::Rng;
use std::time::Duration;
use tokio::time::{sleep, timeout_at, Instant};

use crate::blockchain::client::LedgerClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, MinedReceipt, PendingProof};

/// Receipt polling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    /// First delay between polls.
    pub base: Duration,
    /// Upper bound on the delay between polls.
    pub max: Duration,
}

impl PollSchedule {
    /// Delay before poll number `attempt` (1-based).
    ///
    /// `base` doubles with every poll up to `max`, plus up to a tenth of
    /// that as jitter so concurrent waiters spread out.
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let growth = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        let step = self.base.saturating_mul(growth).min(self.max);

        let spread = step / 10;
        if spread.is_zero() {
            return step;
        }
        step + spread.mul_f64(rand::thread_rng().gen::<f64>())
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            max: Duration::from_secs(8),
        }
    }
}

/// Wait until `pending` is mined or `deadline` passes.
///
/// RPC errors while polling are logged and polling continues. A receipt
/// with a failed status is reported as [`BlockchainError::Reverted`].
pub async fn wait_mined(
    client: &dyn LedgerClient,
    pending: &PendingProof,
    deadline: Instant,
    schedule: PollSchedule,
) -> BlockchainResult<MinedReceipt> {
    let tx_hash = pending.tx_hash;

    let result = timeout_at(deadline, async {
        let mut attempt = 0u32;

        loop {
            match client.transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => return receipt,
                Ok(None) => {
                    tracing::trace!(tx_hash = %tx_hash, "Transaction not yet mined");
                }
                Err(e) => {
                    tracing::debug!(tx_hash = %tx_hash, error = %e, "Receipt retrieval failed");
                }
            }

            attempt = attempt.saturating_add(1);
            sleep(schedule.delay(attempt)).await;
        }
    })
    .await;

    let receipt = result.map_err(|_| BlockchainError::ConfirmationTimeout(tx_hash))?;

    if !receipt.status {
        return Err(BlockchainError::Reverted(tx_hash));
    }

    tracing::debug!(
        tx_hash = %tx_hash,
        block_number = ?receipt.block_number,
        "Transaction mined"
    );

    Ok(receipt)
}
