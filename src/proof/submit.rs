//! Proof submission orchestration.
//!
//! ```text
//! authorize → bind registry → digest result → submit proof → wait mined → report
//! ```
//!
//! Each step short-circuits on failure; the failure is logged with its
//! stage and the caller receives the empty outcome. Nothing is retried.

use alloy::primitives::TxHash;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{timeout_at, Instant};
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::{
    authorize, wait_mined, BlockchainError, BlockchainResult, Credential, LedgerClient, ProofArgs,
};
use crate::config::ProofConfig;
use crate::observability::metrics;
use crate::proof::digest::digest;
use crate::proof::outcome::{outcome_channel, OutcomeReceiver, OutcomeReporter, TransactionOutcome};
use crate::proof::types::{ProofError, ProofRequest};

/// Submits block replica proofs to the registry.
///
/// Cheap to clone; clones share the ledger client and credential. Every
/// submission derives its own transaction options.
#[derive(Clone)]
pub struct ProofSubmitter {
    client: Arc<dyn LedgerClient>,
    credential: Credential,
    config: ProofConfig,
}

impl ProofSubmitter {
    /// Create a submitter for the registry at `config.contract_address`.
    pub fn new(client: Arc<dyn LedgerClient>, credential: Credential, config: ProofConfig) -> Self {
        Self {
            client,
            credential,
            config,
        }
    }

    /// Deadline for a submission: the earlier of the caller's and our own.
    ///
    /// If our own deadline is not representable, the caller's deadline is
    /// used alone; with neither, the submission is already due.
    pub fn deadline_for(&self, requested: Option<Instant>) -> Instant {
        let now = Instant::now();
        match (now.checked_add(self.config.tx_timeout()), requested) {
            (Some(own), Some(requested)) => requested.min(own),
            (Some(own), None) => own,
            (None, Some(requested)) => requested,
            (None, None) => now,
        }
    }

    /// Submit a proof and wait for it to be mined.
    ///
    /// Returns the hash of the mined transaction.
    pub async fn submit(&self, request: &ProofRequest) -> Result<TxHash, ProofError> {
        let deadline = self.deadline_for(request.deadline);

        let opts = within(deadline, authorize(&self.credential, self.client.as_ref()))
            .await
            .map_err(ProofError::Authorization)?;

        let registry = self
            .client
            .bind_proof_chain(&self.config.contract_address)
            .map_err(ProofError::Binding)?;

        let digest = digest(&request.result_segment).map_err(ProofError::Serialization)?;

        let args = ProofArgs {
            network_id: request.replica.network_id,
            chain_height: request.chain_height,
            block_hash: request.replica.hash,
            result_hash: digest.into(),
            replica_url: request.replica_url.clone(),
        };
        let pending = within(deadline, registry.submit_proof(&opts, &args))
            .await
            .map_err(ProofError::Submission)?;

        tracing::info!(
            tx_hash = %pending.tx_hash,
            digest = %digest,
            contract = %registry.address(),
            "Proof transaction broadcast"
        );

        let broadcast_at = Instant::now();
        let receipt = wait_mined(
            self.client.as_ref(),
            &pending,
            deadline,
            self.config.poll_schedule(),
        )
        .await
        .map_err(ProofError::Confirmation)?;
        metrics::record_confirmation(broadcast_at.elapsed());

        Ok(receipt.tx_hash)
    }

    /// Run a submission and deliver its outcome to `reporter`.
    pub async fn send_block_replica_proof(&self, request: ProofRequest, reporter: OutcomeReporter) {
        let span = tracing::info_span!(
            "proof_submission",
            submission_id = %Uuid::new_v4(),
            network_id = request.replica.network_id,
            block_hash = %request.replica.hash,
            chain_height = request.chain_height,
            chain_length = request.chain_length,
        );

        async move {
            let outcome = match self.submit(&request).await {
                Ok(tx_hash) => {
                    tracing::info!(tx_hash = %tx_hash, "Block replica proof mined");
                    metrics::record_submission("mined");
                    TransactionOutcome::mined(tx_hash)
                }
                Err(e) => {
                    tracing::error!(
                        stage = e.stage(),
                        may_have_broadcast = e.may_have_broadcast(),
                        error = %e,
                        "Block replica proof failed"
                    );
                    metrics::record_submission(e.stage());
                    TransactionOutcome::empty()
                }
            };
            reporter.report(outcome);
        }
        .instrument(span)
        .await
    }

    /// Run a submission on its own task.
    pub fn spawn(&self, request: ProofRequest) -> OutcomeReceiver {
        let (reporter, receiver) = outcome_channel();
        let submitter = self.clone();
        tokio::spawn(async move {
            submitter.send_block_replica_proof(request, reporter).await;
        });
        receiver
    }
}

impl std::fmt::Debug for ProofSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofSubmitter")
            .field("contract_address", &self.config.contract_address)
            .field("tx_timeout_secs", &self.config.tx_timeout_secs)
            .finish()
    }
}

async fn within<T>(
    deadline: Instant,
    fut: impl Future<Output = BlockchainResult<T>>,
) -> BlockchainResult<T> {
    timeout_at(deadline, fut)
        .await
        .unwrap_or(Err(BlockchainError::DeadlineExceeded))
}
