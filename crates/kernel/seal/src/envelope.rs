use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SealError;

/// The compact, wire-carried receipt for one sealed response.
///
/// Immutable once returned. These are the only fields required to travel
/// with the response body (embedded or via transport headers); everything
/// else in the [`SealEnvelope`] is local-audit material.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProvenanceReceipt {
    /// Opaque, unique per seal event.
    pub receipt_id: String,
    /// BLAKE3 over content hash and context hash, hex.
    pub artifact_hash: String,
    /// Ed25519 signature over the artifact hash bytes, hex.
    pub signature: String,
    /// Signing public key, hex.
    pub public_key: String,
    /// Monotonically increasing, process-wide.
    pub chain_position: u64,
    pub timestamp: DateTime<Utc>,
    /// Upstream receipt this one descends from, if any.
    pub parent_receipt_id: Option<String>,
    /// 0 = this receipt roots a new cross-service chain.
    pub chain_depth: u32,
    /// Receipt id of the originating receipt in this chain.
    pub chain_root: String,
}

impl ProvenanceReceipt {
    /// Check the receipt's signature against its own public key.
    pub fn verify(&self) -> Result<(), SealError> {
        let artifact = decode_fixed::<32>(&self.artifact_hash)?;
        let public_key = decode_fixed::<32>(&self.public_key)?;
        let signature = decode_fixed::<64>(&self.signature)?;
        kauri_crypto::verify(&public_key, &artifact, &signature)?;
        Ok(())
    }
}

fn decode_fixed<const N: usize>(hex: &str) -> Result<[u8; N], SealError> {
    let bytes = kauri_crypto::from_hex(hex)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| SealError::Serialization(format!("expected {} bytes, found {}", N, len)))
}

/// The full output of one seal operation: the wire receipt plus
/// local-audit-only auxiliary fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SealEnvelope {
    pub receipt: ProvenanceReceipt,
    /// Locally drawn entropy, hex. A stand-in for an external beacon value;
    /// no network entropy source is consulted.
    pub entropy: String,
    /// Short BLAKE3 fingerprint of the request domain.
    pub domain_fingerprint: String,
    /// Chain position before this seal advanced it.
    pub previous_chain_position: u64,
}

/// Current head of the chain, for status reporting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainHead {
    pub genesis_hash: String,
    pub position: u64,
    pub public_key: String,
}
