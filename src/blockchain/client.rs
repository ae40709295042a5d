//! Ledger RPC client with timeout and failover handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoints (primary + failovers)
//! - Query chain ID and transaction receipts
//! - Bind the proof registry contract
//! - Handle timeouts and network errors gracefully

use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::contract::{ProofRegistry, RpcProofChain};
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ChainId, LedgerConfig, MinedReceipt,
};
use crate::observability::metrics;

/// Capabilities the proof flow needs from the ledger.
///
/// Implementations must be safe to share between concurrent submissions.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Chain ID of the connected network.
    async fn chain_id(&self) -> BlockchainResult<ChainId>;

    /// Receipt of a transaction, `None` while it is not mined.
    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<MinedReceipt>>;

    /// Bind the proof registry deployed at `contract_address`.
    fn bind_proof_chain(&self, contract_address: &str) -> BlockchainResult<Arc<dyn ProofRegistry>>;
}

/// Ledger RPC client wrapper with failover support.
#[derive(Clone)]
pub struct RpcLedgerClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Endpoint URLs in provider order, handed to bound registries.
    endpoints: Vec<url::Url>,
    /// Configuration.
    config: LedgerConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl RpcLedgerClient {
    /// Create a new ledger client.
    ///
    /// Creation succeeds even when the endpoint is unreachable; a chain ID
    /// mismatch is only logged.
    pub async fn new(config: LedgerConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();
        let mut endpoints = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url.clone()))
            as Arc<dyn Provider + Send + Sync>);
        endpoints.push(primary_url);

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse::<url::Url>() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url.clone()))
                    as Arc<dyn Provider + Send + Sync>);
                endpoints.push(url);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            endpoints,
            config: config.clone(),
            timeout_duration,
        };

        if config.expected_chain_id.is_some() {
            if let Err(e) = client.verify_chain_id().await {
                tracing::warn!(
                    error = %e,
                    "Ledger client initialized but chain verification failed"
                );
            }
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            failovers = config.failover_urls.len(),
            "Ledger client initialized"
        );

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration, if one is configured.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let Some(expected) = self.config.expected_chain_id else {
            return Ok(());
        };
        let chain_id = self.chain_id().await?;
        if chain_id.0 != expected {
            return Err(BlockchainError::ChainMismatch {
                expected,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Registry at `contract_address`, reachable through every endpoint.
    pub fn proof_chain(&self, contract_address: &str) -> BlockchainResult<RpcProofChain> {
        let address: Address = contract_address.trim().parse().map_err(|e| {
            BlockchainError::Binding(format!(
                "Invalid contract address '{}': {}",
                contract_address, e
            ))
        })?;

        Ok(RpcProofChain::new(
            address,
            self.endpoints.clone(),
            self.timeout_duration,
        ))
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => {
                    metrics::record_rpc_health(true);
                    return Ok(ChainId(result));
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        metrics::record_rpc_health(false);
        Err(BlockchainError::Rpc("All RPC providers failed".to_string()))
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<MinedReceipt>> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_receipt(tx_hash);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => {
                    metrics::record_rpc_health(true);
                    return Ok(result.map(MinedReceipt::from));
                }
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        metrics::record_rpc_health(false);
        Err(BlockchainError::Rpc("All providers failed to get receipt".to_string()))
    }

    fn bind_proof_chain(&self, contract_address: &str) -> BlockchainResult<Arc<dyn ProofRegistry>> {
        Ok(Arc::new(self.proof_chain(contract_address)?))
    }
}

impl std::fmt::Debug for RpcLedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcLedgerClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("failover_urls", &self.config.failover_urls)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
