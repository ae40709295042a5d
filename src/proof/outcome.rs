//! One-shot delivery of submission outcomes.
//!
//! Each submission gets its own reporter/receiver pair. The reporter is
//! consumed by [`OutcomeReporter::report`], so a submission can report at
//! most once; a reporter dropped without reporting delivers the empty
//! outcome, so the receiver always gets exactly one value.

use alloy::primitives::TxHash;
use tokio::sync::oneshot;

/// Result of one submission as seen by its caller.
///
/// Either the hash of the mined transaction or the empty sentinel. The
/// cause of a failure has already been logged by the time it is reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TransactionOutcome(String);

impl TransactionOutcome {
    /// The failure sentinel.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn mined(tx_hash: TxHash) -> Self {
        Self(tx_hash.to_string())
    }

    pub fn is_success(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TransactionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Create a reporter/receiver pair for one submission.
pub fn outcome_channel() -> (OutcomeReporter, OutcomeReceiver) {
    let (tx, rx) = oneshot::channel();
    (OutcomeReporter { tx: Some(tx) }, OutcomeReceiver { rx })
}

/// Producer half. Delivers exactly one outcome.
#[derive(Debug)]
pub struct OutcomeReporter {
    tx: Option<oneshot::Sender<TransactionOutcome>>,
}

impl OutcomeReporter {
    /// Deliver the outcome.
    pub fn report(mut self, outcome: TransactionOutcome) {
        self.deliver(outcome);
    }

    fn deliver(&mut self, outcome: TransactionOutcome) {
        if let Some(tx) = self.tx.take() {
            if tx.send(outcome).is_err() {
                tracing::debug!("Outcome receiver dropped before delivery");
            }
        }
    }
}

impl Drop for OutcomeReporter {
    fn drop(&mut self) {
        if self.tx.is_some() {
            tracing::warn!("Outcome reporter dropped without reporting");
            self.deliver(TransactionOutcome::empty());
        }
    }
}

/// Consumer half. Read once.
#[derive(Debug)]
pub struct OutcomeReceiver {
    rx: oneshot::Receiver<TransactionOutcome>,
}

impl OutcomeReceiver {
    /// Wait for the outcome.
    pub async fn recv(self) -> TransactionOutcome {
        // The reporter always sends before its sender is released.
        self.rx.await.unwrap_or_default()
    }
}
