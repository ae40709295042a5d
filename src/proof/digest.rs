//! Proof digests over result segments.

use alloy::primitives::B256;
use sha2::{Digest, Sha256};

use crate::replica::ResultSegment;

/// SHA-256 of the canonical encoding of a result segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProofDigest([u8; 32]);

impl ProofDigest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<ProofDigest> for B256 {
    fn from(digest: ProofDigest) -> Self {
        B256::from(digest.0)
    }
}

impl std::fmt::Display for ProofDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", B256::from(self.0))
    }
}

/// Canonical encoding: a JSON string of the standard base64 of the payload.
pub fn canonical_encoding(segment: &ResultSegment) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(segment)
}

/// Digest a result segment. Pure; never cached.
pub fn digest(segment: &ResultSegment) -> serde_json::Result<ProofDigest> {
    let encoded = canonical_encoding(segment)?;
    Ok(ProofDigest(Sha256::digest(&encoded).into()))
}
