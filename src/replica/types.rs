//! Block replica identity, result payloads and the block result schema.

use alloy::primitives::{Address, Bytes, B256, U256};
use base64::prelude::{Engine, BASE64_STANDARD};
use serde::{Deserialize, Serialize, Serializer};

use crate::replica::encoding::{base64_bytes, big_int, option_big_int};

/// Identity of one processed block snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockReplica {
    /// Network the block belongs to.
    pub network_id: u64,
    /// Hash of the block.
    pub hash: B256,
}

impl BlockReplica {
    pub fn new(network_id: u64, hash: B256) -> Self {
        Self { network_id, hash }
    }

    /// Replica identity of a processed block result.
    pub fn from_block_result(network_id: u64, result: &BlockResult) -> Self {
        Self::new(network_id, result.hash)
    }
}

/// Opaque result payload computed for a replica.
///
/// Serializes as a JSON string holding the standard base64 encoding of
/// its bytes.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ResultSegment(Bytes);

impl ResultSegment {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Encode a block result as a segment.
    pub fn from_block_result(result: &BlockResult) -> serde_json::Result<Self> {
        serde_json::to_vec(result).map(Self::new)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for ResultSegment {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&'static [u8]> for ResultSegment {
    fn from(bytes: &'static [u8]) -> Self {
        Self::new(Bytes::from_static(bytes))
    }
}

impl std::fmt::Debug for ResultSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultSegment").field("len", &self.0.len()).finish()
    }
}

impl Serialize for ResultSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(&self.0))
    }
}

/// Block header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub parent_hash: B256,
    #[serde(rename = "sha3Uncles")]
    pub uncle_hash: B256,
    #[serde(rename = "miner")]
    pub coinbase: Address,
    #[serde(rename = "stateRoot")]
    pub root: B256,
    #[serde(rename = "transactionsRoot")]
    pub tx_hash: B256,
    #[serde(rename = "receiptsRoot")]
    pub receipt_hash: B256,
    /// 256-byte bloom filter.
    #[serde(rename = "logsBloom")]
    pub bloom: Vec<u8>,
    #[serde(with = "big_int")]
    pub difficulty: U256,
    #[serde(with = "big_int")]
    pub number: U256,
    pub gas_limit: u64,
    pub gas_used: u64,
    #[serde(rename = "timestamp")]
    pub time: u64,
    #[serde(rename = "extraData", with = "base64_bytes")]
    pub extra: Bytes,
    #[serde(rename = "mixHash", default)]
    pub mix_digest: B256,
    #[serde(default)]
    pub nonce: [u8; 8],
    #[serde(rename = "baseFeePerGas", default, with = "option_big_int")]
    pub base_fee: Option<U256>,
}

/// Transaction included in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "nonce")]
    pub account_nonce: u64,
    #[serde(rename = "gasPrice", with = "big_int")]
    pub price: U256,
    #[serde(rename = "gas")]
    pub gas_limit: u64,
    #[serde(rename = "from")]
    pub sender: Address,
    /// `None` for contract creation.
    #[serde(rename = "to", default)]
    pub recipient: Option<Address>,
    #[serde(rename = "value", with = "big_int")]
    pub amount: U256,
    #[serde(rename = "input", with = "base64_bytes")]
    pub payload: Bytes,
}

/// Log emitted during execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub address: Address,
    pub topics: Vec<B256>,
    #[serde(with = "base64_bytes")]
    pub data: Bytes,
    #[serde(default)]
    pub block_number: u64,
    #[serde(rename = "transactionHash")]
    pub tx_hash: B256,
    #[serde(rename = "transactionIndex", default)]
    pub tx_index: u64,
    #[serde(default)]
    pub block_hash: B256,
    #[serde(rename = "logIndex", default)]
    pub index: u64,
    #[serde(default)]
    pub removed: bool,
}

/// Execution receipt of a block transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Receipt {
    #[serde(with = "base64_bytes")]
    pub post_state_or_status: Bytes,
    pub cumulative_gas_used: u64,
    pub tx_hash: B256,
    pub contract_address: Address,
    #[serde(default)]
    pub logs: Vec<Log>,
    pub gas_used: u64,
}

/// Everything the agent extracts from one processed block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlockResult {
    pub hash: B256,
    #[serde(default, with = "option_big_int")]
    pub total_difficulty: Option<U256>,
    pub header: Option<Header>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub uncles: Vec<Header>,
    #[serde(default)]
    pub receipts: Vec<Receipt>,
    #[serde(default)]
    pub senders: Vec<serde_json::Value>,
}

impl BlockResult {
    /// Decode a block result document.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
