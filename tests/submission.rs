//! End-to-end tests of the proof submission flow against stub ledgers.

use alloy::primitives::{B256, U256};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use replica_proof_agent::proof::{digest, ProofError};
use replica_proof_agent::blockchain::{BlockchainError, ChainId};
use replica_proof_agent::{BlockReplica, ProofRequest, ResultSegment};

mod common;

use common::{ChainIdBehavior, ReceiptBehavior, StubLedger, StubRegistry, TEST_PRIVATE_KEY};
use replica_proof_agent::config::ProofConfig;

fn block_hash(n: u64) -> B256 {
    B256::from(U256::from(n))
}

fn request(network_id: u64, hash: B256) -> ProofRequest {
    ProofRequest::new(
        BlockReplica::new(network_id, hash),
        1_000,
        ResultSegment::from(&b"result"[..]),
        "https://replicas.example/block.bin",
    )
}

#[tokio::test]
async fn test_mined_proof_reports_tx_hash() {
    let tx_hash = B256::from(U256::from(0xABCu64));
    let ledger = Arc::new(StubLedger::well_behaved().with_registry(StubRegistry {
        fixed_tx_hash: Some(tx_hash),
        ..StubRegistry::default()
    }));
    let submitter = common::submitter(ledger.clone());

    let outcome = submitter.spawn(request(1, block_hash(0xDEAD))).recv().await;

    assert!(outcome.is_success());
    assert_eq!(outcome.as_str(), tx_hash.to_string());

    let calls = ledger.registry.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.chain_id, ChainId(1));
    assert_eq!(call.args.network_id, 1);
    assert_eq!(call.args.chain_height, 1_000);
    assert_eq!(call.args.block_hash, block_hash(0xDEAD));
    assert_eq!(
        call.args.result_hash,
        B256::from(digest(&ResultSegment::from(&b"result"[..])).unwrap())
    );
    assert_eq!(call.args.replica_url, "https://replicas.example/block.bin");
}

#[tokio::test]
async fn test_contract_error_reports_empty() {
    let ledger = Arc::new(StubLedger::well_behaved().with_registry(StubRegistry {
        fail_with: Some("insufficient funds for gas".into()),
        ..StubRegistry::default()
    }));
    let submitter = common::submitter(ledger.clone());

    let outcome = submitter.spawn(request(1, block_hash(0xDEAD))).recv().await;
    assert_eq!(outcome.as_str(), "");

    let err = submitter.submit(&request(1, block_hash(0xDEAD))).await.unwrap_err();
    assert_eq!(err.stage(), "submission");
    assert!(err.to_string().contains("insufficient funds"));
}

#[tokio::test]
async fn test_chain_id_failure_skips_contract() {
    let mut ledger = StubLedger::well_behaved();
    ledger.chain_id = ChainIdBehavior::Fails;
    let ledger = Arc::new(ledger);
    let submitter = common::submitter(ledger.clone());

    let outcome = submitter.spawn(request(1, block_hash(1))).recv().await;

    assert_eq!(outcome.as_str(), "");
    assert_eq!(ledger.bind_count(), 0);
    assert_eq!(ledger.registry.call_count(), 0);
}

#[tokio::test]
async fn test_zero_chain_id_is_recoverable() {
    let mut ledger = StubLedger::well_behaved();
    ledger.chain_id = ChainIdBehavior::Returns(0);
    let ledger = Arc::new(ledger);
    let submitter = common::submitter(ledger.clone());

    let err = submitter.submit(&request(1, block_hash(1))).await.unwrap_err();
    assert!(matches!(
        err,
        ProofError::Authorization(BlockchainError::InvalidChainId(0))
    ));
    assert_eq!(ledger.registry.call_count(), 0);

    let outcome = submitter.spawn(request(1, block_hash(1))).recv().await;
    assert_eq!(outcome.as_str(), "");
}

#[tokio::test]
async fn test_malformed_credential_reports_empty() {
    let ledger = Arc::new(StubLedger::well_behaved());
    let submitter = common::submitter_with_key(ledger.clone(), "not-a-key");

    let err = submitter.submit(&request(1, block_hash(1))).await.unwrap_err();
    assert_eq!(err.stage(), "authorization");
    assert_eq!(ledger.registry.call_count(), 0);
}

#[tokio::test]
async fn test_binding_failure_reports_empty() {
    let mut ledger = StubLedger::well_behaved();
    ledger.bind_fails = true;
    let ledger = Arc::new(ledger);
    let submitter = common::submitter(ledger.clone());

    let err = submitter.submit(&request(1, block_hash(1))).await.unwrap_err();
    assert_eq!(err.stage(), "binding");
    assert!(!err.may_have_broadcast());

    let outcome = submitter.spawn(request(1, block_hash(1))).recv().await;
    assert_eq!(outcome.as_str(), "");
    assert_eq!(ledger.registry.call_count(), 0);
}

#[tokio::test]
async fn test_reverted_receipt_reports_empty() {
    let mut ledger = StubLedger::well_behaved();
    ledger.receipts = ReceiptBehavior::Mined { status: false };
    let ledger = Arc::new(ledger);
    let submitter = common::submitter(ledger.clone());

    let outcome = submitter.spawn(request(1, block_hash(7))).recv().await;

    assert_eq!(outcome.as_str(), "");
    // Broadcast did happen.
    assert_eq!(ledger.registry.call_count(), 1);

    let err = submitter.submit(&request(1, block_hash(7))).await.unwrap_err();
    assert!(matches!(
        err,
        ProofError::Confirmation(BlockchainError::Reverted(_))
    ));
    assert!(err.may_have_broadcast());
}

#[tokio::test(start_paused = true)]
async fn test_unmined_proof_times_out_at_default_deadline() {
    let mut ledger = StubLedger::well_behaved();
    ledger.receipts = ReceiptBehavior::Never;
    let submitter = common::submitter(Arc::new(ledger));

    let start = Instant::now();
    let outcome = submitter.spawn(request(1, block_hash(9))).recv().await;
    let elapsed = start.elapsed();

    assert_eq!(outcome.as_str(), "");
    assert!(elapsed >= Duration::from_secs(60));
    assert!(elapsed <= Duration::from_secs(61), "took {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_caller_deadline_is_honoured() {
    let mut ledger = StubLedger::well_behaved();
    ledger.receipts = ReceiptBehavior::Never;
    let submitter = common::submitter(Arc::new(ledger));

    let start = Instant::now();
    let req = request(1, block_hash(9)).with_deadline(start + Duration::from_secs(5));
    let err = submitter.submit(&req).await.unwrap_err();

    assert!(matches!(
        err,
        ProofError::Confirmation(BlockchainError::ConfirmationTimeout(_))
    ));
    assert!(start.elapsed() <= Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_hanging_chain_id_is_bounded_by_deadline() {
    let mut ledger = StubLedger::well_behaved();
    ledger.chain_id = ChainIdBehavior::Hangs;
    let ledger = Arc::new(ledger);
    let submitter = common::submitter(ledger.clone());

    let start = Instant::now();
    let err = submitter.submit(&request(1, block_hash(3))).await.unwrap_err();

    assert!(matches!(
        err,
        ProofError::Authorization(BlockchainError::DeadlineExceeded)
    ));
    assert!(start.elapsed() <= Duration::from_secs(61));
    assert_eq!(ledger.bind_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_hanging_broadcast_is_bounded_by_deadline() {
    let ledger = Arc::new(StubLedger::well_behaved().with_registry(StubRegistry {
        hangs: true,
        ..StubRegistry::default()
    }));
    let submitter = common::submitter(ledger.clone());

    let start = Instant::now();
    let err = submitter.submit(&request(1, block_hash(4))).await.unwrap_err();
    assert!(matches!(
        err,
        ProofError::Submission(BlockchainError::DeadlineExceeded)
    ));
    assert!(err.may_have_broadcast());
    assert!(start.elapsed() >= Duration::from_secs(60));
    assert!(start.elapsed() <= Duration::from_secs(61), "took {:?}", start.elapsed());

    let start = Instant::now();
    let outcome = submitter.spawn(request(1, block_hash(4))).recv().await;
    assert_eq!(outcome.as_str(), "");
    assert!(start.elapsed() <= Duration::from_secs(61), "took {:?}", start.elapsed());
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_timeout_setting_still_submits() {
    let ledger = Arc::new(StubLedger::well_behaved());
    let config = ProofConfig {
        tx_timeout_secs: u64::MAX,
        ..common::proof_config()
    };
    let submitter = common::submitter_with_config(ledger.clone(), TEST_PRIVATE_KEY, config);

    let tx_hash = submitter.submit(&request(1, block_hash(5))).await.unwrap();
    assert_eq!(tx_hash, StubRegistry::tx_hash_for(block_hash(5)));

    let outcome = submitter.spawn(request(1, block_hash(6))).recv().await;
    assert_eq!(outcome.as_str(), StubRegistry::tx_hash_for(block_hash(6)).to_string());
}

#[tokio::test]
async fn test_concurrent_submissions_do_not_cross_talk() {
    let ledger = Arc::new(StubLedger::well_behaved());
    let submitter = common::submitter(ledger.clone());

    let hashes: Vec<B256> = (0..16u64).map(|n| block_hash(0x1000 + n)).collect();
    let receivers: Vec<_> = hashes
        .iter()
        .map(|hash| submitter.spawn(request(1, *hash)))
        .collect();

    let outcomes = futures_util::future::join_all(receivers.into_iter().map(|r| r.recv())).await;

    assert_eq!(outcomes.len(), hashes.len());
    for (hash, outcome) in hashes.iter().zip(&outcomes) {
        assert_eq!(
            outcome.as_str(),
            StubRegistry::tx_hash_for(*hash).to_string()
        );
    }
    assert_eq!(ledger.registry.call_count(), 16);
}

#[tokio::test]
async fn test_each_submission_derives_its_own_options() {
    let ledger = Arc::new(StubLedger::well_behaved());
    let submitter = common::submitter(ledger.clone());

    submitter.submit(&request(1, block_hash(1))).await.unwrap();
    submitter.submit(&request(2, block_hash(2))).await.unwrap();

    assert_eq!(ledger.bind_count(), 2);
    let calls = ledger.registry.calls.lock().unwrap();
    assert_eq!(calls[0].args.network_id, 1);
    assert_eq!(calls[1].args.network_id, 2);
}
