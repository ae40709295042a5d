//! Shared stubs for integration tests.

use alloy::primitives::{keccak256, TxHash, B256};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use replica_proof_agent::blockchain::{
    BlockchainError, BlockchainResult, ChainId, LedgerClient, MinedReceipt, PendingProof,
    ProofArgs, ProofRegistry, TransactOpts,
};
use replica_proof_agent::config::ProofConfig;
use replica_proof_agent::{Credential, ProofSubmitter};

// Well-known test private key (Anvil's first account)
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub const REGISTRY_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// How the stub ledger answers chain ID queries.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum ChainIdBehavior {
    Returns(u64),
    Fails,
    Hangs,
}

/// How the stub ledger answers receipt queries.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum ReceiptBehavior {
    Mined { status: bool },
    Never,
}

/// One accepted registry call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub chain_id: ChainId,
    pub args: ProofArgs,
}

/// Registry stub. Accepts every call unless `fail_with` or `hangs` is set.
///
/// Without a fixed hash, the transaction hash is derived from the block
/// hash so concurrent submissions can be told apart.
#[derive(Default)]
pub struct StubRegistry {
    pub fail_with: Option<String>,
    /// Never answer, like a node that stops responding mid-send.
    pub hangs: bool,
    pub fixed_tx_hash: Option<TxHash>,
    pub calls: Mutex<Vec<RecordedCall>>,
}

#[allow(dead_code)]
impl StubRegistry {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn tx_hash_for(block_hash: B256) -> TxHash {
        keccak256(block_hash)
    }
}

#[async_trait]
impl ProofRegistry for StubRegistry {
    fn address(&self) -> alloy::primitives::Address {
        REGISTRY_ADDRESS.parse().unwrap()
    }

    async fn submit_proof(
        &self,
        opts: &TransactOpts,
        args: &ProofArgs,
    ) -> BlockchainResult<PendingProof> {
        if self.hangs {
            return std::future::pending().await;
        }
        if let Some(reason) = &self.fail_with {
            return Err(BlockchainError::Contract {
                address: self.address(),
                reason: reason.clone(),
            });
        }

        self.calls.lock().unwrap().push(RecordedCall {
            chain_id: opts.chain_id(),
            args: args.clone(),
        });

        let tx_hash = self
            .fixed_tx_hash
            .unwrap_or_else(|| Self::tx_hash_for(args.block_hash));
        Ok(PendingProof { tx_hash })
    }
}

/// Ledger stub with scripted behaviour.
pub struct StubLedger {
    pub chain_id: ChainIdBehavior,
    pub receipts: ReceiptBehavior,
    pub bind_fails: bool,
    pub registry: Arc<StubRegistry>,
    pub bind_calls: AtomicU32,
}

#[allow(dead_code)]
impl StubLedger {
    pub fn well_behaved() -> Self {
        Self {
            chain_id: ChainIdBehavior::Returns(1),
            receipts: ReceiptBehavior::Mined { status: true },
            bind_fails: false,
            registry: Arc::new(StubRegistry::default()),
            bind_calls: AtomicU32::new(0),
        }
    }

    pub fn with_registry(mut self, registry: StubRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn bind_count(&self) -> u32 {
        self.bind_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerClient for StubLedger {
    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        match self.chain_id {
            ChainIdBehavior::Returns(id) => Ok(ChainId(id)),
            ChainIdBehavior::Fails => Err(BlockchainError::Rpc("All RPC providers failed".into())),
            ChainIdBehavior::Hangs => std::future::pending().await,
        }
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<MinedReceipt>> {
        match self.receipts {
            ReceiptBehavior::Mined { status } => Ok(Some(MinedReceipt {
                tx_hash,
                block_number: Some(100),
                status,
            })),
            ReceiptBehavior::Never => Ok(None),
        }
    }

    fn bind_proof_chain(&self, contract_address: &str) -> BlockchainResult<Arc<dyn ProofRegistry>> {
        self.bind_calls.fetch_add(1, Ordering::SeqCst);
        if self.bind_fails {
            return Err(BlockchainError::Binding(format!(
                "No registry at '{}'",
                contract_address
            )));
        }
        Ok(self.registry.clone())
    }
}

/// Submitter over `ledger` with default timeouts.
pub fn submitter(ledger: Arc<StubLedger>) -> ProofSubmitter {
    submitter_with_key(ledger, TEST_PRIVATE_KEY)
}

pub fn submitter_with_key(ledger: Arc<StubLedger>, key: &str) -> ProofSubmitter {
    submitter_with_config(ledger, key, proof_config())
}

#[allow(dead_code)]
pub fn submitter_with_config(
    ledger: Arc<StubLedger>,
    key: &str,
    config: ProofConfig,
) -> ProofSubmitter {
    ProofSubmitter::new(ledger, Credential::from_hex(key), config)
}

/// Proof settings pointing at the stub registry.
pub fn proof_config() -> ProofConfig {
    ProofConfig {
        contract_address: REGISTRY_ADDRESS.to_string(),
        ..ProofConfig::default()
    }
}
