//! Proof registry contract binding.
//!
//! The registry records, per block replica, the digest of the processed
//! result and the URL the replica can be fetched from.

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, B256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::sol;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId, PendingProof};
use crate::blockchain::wallet::TransactOpts;

sol! {
    /// On-chain proof registry.
    #[sol(rpc)]
    interface IProofChain {
        function submitBlockSpecimenProof(
            uint64 chainId,
            uint64 blockHeight,
            bytes32 specimenHash,
            bytes32 resultHash,
            string storageURL
        ) external;
    }
}

/// Arguments of one registry submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofArgs {
    /// Network the replica was taken from.
    pub network_id: u64,
    /// Chain height the proof is filed at.
    pub chain_height: u64,
    /// Hash of the replicated block.
    pub block_hash: B256,
    /// Digest of the processed result.
    pub result_hash: B256,
    /// Where the replica can be retrieved.
    pub replica_url: String,
}

/// A bound proof registry.
#[async_trait]
pub trait ProofRegistry: Send + Sync {
    /// Address the registry is bound to.
    fn address(&self) -> Address;

    /// Sign and broadcast a proof submission.
    ///
    /// Returns once the transaction is accepted by the node; mining is
    /// not awaited.
    async fn submit_proof(&self, opts: &TransactOpts, args: &ProofArgs)
        -> BlockchainResult<PendingProof>;
}

/// Registry reached over JSON-RPC.
///
/// Endpoints are tried in order until one answers with the signer's chain
/// ID; the transaction is then sent through that endpoint only.
#[derive(Debug, Clone)]
pub struct RpcProofChain {
    address: Address,
    endpoints: Vec<url::Url>,
    timeout_duration: Duration,
}

impl RpcProofChain {
    /// Bind to the registry at `address` through `endpoints` (primary first).
    pub fn new(address: Address, endpoints: Vec<url::Url>, timeout_duration: Duration) -> Self {
        Self {
            address,
            endpoints,
            timeout_duration,
        }
    }

    pub fn endpoints(&self) -> &[url::Url] {
        &self.endpoints
    }

    /// First endpoint that is reachable and serves `chain_id`.
    pub async fn broadcast_endpoint(&self, chain_id: ChainId) -> BlockchainResult<url::Url> {
        for (i, url) in self.endpoints.iter().enumerate() {
            let provider = ProviderBuilder::new().connect_http(url.clone());
            match timeout(self.timeout_duration, provider.get_chain_id()).await {
                Ok(Ok(id)) if id == chain_id.0 => return Ok(url.clone()),
                Ok(Ok(id)) => tracing::warn!(
                    endpoint_idx = i,
                    chain_id = id,
                    expected = chain_id.0,
                    "Endpoint serves another chain, trying next"
                ),
                Ok(Err(e)) => {
                    tracing::warn!(endpoint_idx = i, error = %e, "RPC error, trying next endpoint");
                }
                Err(_) => tracing::warn!(endpoint_idx = i, "RPC timeout, trying next endpoint"),
            }
        }
        Err(BlockchainError::Rpc(format!(
            "No endpoint available to broadcast on chain {}",
            chain_id
        )))
    }
}

#[async_trait]
impl ProofRegistry for RpcProofChain {
    fn address(&self) -> Address {
        self.address
    }

    async fn submit_proof(
        &self,
        opts: &TransactOpts,
        args: &ProofArgs,
    ) -> BlockchainResult<PendingProof> {
        let rpc_url = self.broadcast_endpoint(opts.chain_id()).await?;

        // Fresh signing provider per submission; nonce, gas and chain ID are filled
        // from chain state. The signer refuses transactions for any other chain.
        let wallet = EthereumWallet::from(opts.signer().clone());
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(rpc_url);
        let contract = IProofChain::new(self.address, provider);

        let call = contract
            .submitBlockSpecimenProof(
                args.network_id,
                args.chain_height,
                args.block_hash,
                args.result_hash,
                args.replica_url.clone(),
            )
            .from(opts.address());

        let pending = timeout(self.timeout_duration, call.send())
            .await
            .map_err(|_| BlockchainError::Timeout(self.timeout_duration.as_secs()))?
            .map_err(|e| BlockchainError::Contract {
                address: self.address,
                reason: e.to_string(),
            })?;

        let tx_hash = *pending.tx_hash();
        tracing::debug!(
            tx_hash = %tx_hash,
            contract = %self.address,
            "Proof transaction broadcast"
        );

        Ok(PendingProof { tx_hash })
    }
}
