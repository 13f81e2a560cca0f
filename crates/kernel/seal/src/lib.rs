//! The provenance sealer.
//!
//! Binds every outbound payload to a signed, hash-chained receipt so forged,
//! reordered, or replayed responses are detectable. The chain state is the
//! single piece of mutable shared memory in the kernel and is serialized
//! behind one mutex; the signing key is read-only after load and shared
//! freely.
//!
//! Sealing is non-fatal by design: callers deliver the payload unsealed when
//! a seal attempt fails.

#![deny(unsafe_code)]

pub mod chain;
pub mod envelope;
pub mod error;
pub mod keystore;

use std::sync::{Arc, Mutex};

use chrono::Utc;
use kauri_crypto::Keypair;
use kauri_kernel_custody::ParentReference;
use rand::RngCore;
use serde_json::Value;

pub use chain::ChainState;
pub use envelope::{ChainHead, ProvenanceReceipt, SealEnvelope};
pub use error::SealError;

/// One link of the audit-only chain history kept for self-verification.
#[derive(Clone, Debug)]
pub struct ChainRecord {
    pub position: u64,
    pub artifact_hash: [u8; 32],
    pub state_after: [u8; 32],
}

struct ChainInner {
    state: ChainState,
    history: Vec<ChainRecord>,
}

/// Seals outbound payloads into the provenance chain.
pub struct Sealer {
    keypair: Arc<Keypair>,
    chain: Mutex<ChainInner>,
}

impl Sealer {
    /// Start a sealer (and a fresh chain) from a signing keypair.
    pub fn new(keypair: Arc<Keypair>) -> Self {
        let state = ChainState::from_public_key(&keypair.public_key_bytes());
        Self {
            keypair,
            chain: Mutex::new(ChainInner {
                state,
                history: Vec::new(),
            }),
        }
    }

    /// Seal one outbound payload.
    ///
    /// The artifact binds *what* (canonical payload bytes), *where* (the
    /// request domain), and *when* (the seal timestamp): the identical
    /// payload sealed at a different time or domain yields an unrelated
    /// artifact. The chain advances exactly once per successful seal.
    pub fn seal(
        &self,
        payload: &Value,
        domain: &str,
        parent: Option<&ParentReference>,
    ) -> Result<SealEnvelope, SealError> {
        let sealed_at = Utc::now();

        let canonical = serde_json::to_vec(payload)
            .map_err(|err| SealError::Serialization(err.to_string()))?;
        let content_hash = kauri_crypto::hash(&canonical);
        let context_hash =
            kauri_crypto::hash(format!("{}|{}", domain, sealed_at.to_rfc3339()).as_bytes());

        let mut artifact_input = [0u8; 64];
        artifact_input[..32].copy_from_slice(&content_hash);
        artifact_input[32..].copy_from_slice(&context_hash);
        let artifact_hash = kauri_crypto::hash(&artifact_input);

        let signature = self.keypair.sign(&artifact_hash);

        // The only read-modify-write in the kernel; everything before this
        // point is pure.
        let (position, previous_position) = {
            let mut inner = self.chain.lock().map_err(|_| SealError::LockPoisoned)?;
            let previous_position = inner.state.position_counter;
            let position = inner.state.advance(&artifact_hash);
            let state_after = inner.state.previous_state;
            inner.history.push(ChainRecord {
                position,
                artifact_hash,
                state_after,
            });
            (position, previous_position)
        };

        let receipt_id = uuid::Uuid::new_v4().to_string();
        let custody = kauri_kernel_custody::link(&receipt_id, parent);

        let mut entropy = [0u8; 16];
        rand::rngs::OsRng.fill_bytes(&mut entropy);

        Ok(SealEnvelope {
            receipt: ProvenanceReceipt {
                receipt_id,
                artifact_hash: kauri_crypto::to_hex(&artifact_hash),
                signature: kauri_crypto::to_hex(&signature),
                public_key: self.keypair.public_key_hex(),
                chain_position: position,
                timestamp: sealed_at,
                parent_receipt_id: custody.parent_receipt_id,
                chain_depth: custody.chain_depth,
                chain_root: custody.chain_root,
            },
            entropy: kauri_crypto::to_hex(&entropy),
            domain_fingerprint: kauri_crypto::to_hex(&kauri_crypto::hash(domain.as_bytes()))[..16]
                .to_string(),
            previous_chain_position: previous_position,
        })
    }

    /// Current head of the chain.
    pub fn chain_head(&self) -> Result<ChainHead, SealError> {
        let inner = self.chain.lock().map_err(|_| SealError::LockPoisoned)?;
        Ok(ChainHead {
            genesis_hash: kauri_crypto::to_hex(&inner.state.genesis_hash),
            position: inner.state.position_counter,
            public_key: self.keypair.public_key_hex(),
        })
    }

    /// Replay the chain recurrence from genesis over the retained history.
    ///
    /// Returns the number of verified links, or the first position where the
    /// recorded state diverges from the recomputation.
    pub fn verify_history(&self) -> Result<u64, SealError> {
        let inner = self.chain.lock().map_err(|_| SealError::LockPoisoned)?;

        let mut previous = inner.state.genesis_hash;
        let mut previous_previous = inner.state.genesis_hash;

        for (index, record) in inner.history.iter().enumerate() {
            let expected_position = (index + 1) as u64;
            if record.position != expected_position {
                return Err(SealError::IntegrityViolation {
                    position: record.position,
                    reason: format!("expected position {}", expected_position),
                });
            }

            let expected = chain::next_state(&record.artifact_hash, &previous, &previous_previous);
            if expected != record.state_after {
                return Err(SealError::IntegrityViolation {
                    position: record.position,
                    reason: "chain state does not reproduce from history".into(),
                });
            }

            previous_previous = previous;
            previous = expected;
        }

        if previous != inner.state.previous_state {
            return Err(SealError::IntegrityViolation {
                position: inner.state.position_counter,
                reason: "chain head does not match replayed history".into(),
            });
        }

        Ok(inner.history.len() as u64)
    }

    /// The signing public key carried by every receipt.
    pub fn public_key_hex(&self) -> String {
        self.keypair.public_key_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kauri_kernel_custody::{ParentReceipt, ParentReference};
    use serde_json::json;

    fn sealer() -> Sealer {
        Sealer::new(Arc::new(Keypair::from_seed(&[9u8; 32])))
    }

    #[test]
    fn seal_produces_a_verifiable_receipt() {
        let sealer = sealer();
        let envelope = sealer
            .seal(&json!({"result": "ok"}), "/v1/actions", None)
            .unwrap();

        envelope.receipt.verify().unwrap();
        assert_eq!(envelope.receipt.chain_position, 1);
        assert_eq!(envelope.previous_chain_position, 0);
        assert_eq!(envelope.receipt.chain_depth, 0);
        assert_eq!(envelope.receipt.chain_root, envelope.receipt.receipt_id);
        assert_eq!(envelope.entropy.len(), 32);
        assert_eq!(envelope.domain_fingerprint.len(), 16);
    }

    #[test]
    fn chain_position_advances_by_one_per_seal() {
        let sealer = sealer();
        for expected in 1..=5u64 {
            let envelope = sealer.seal(&json!({"n": expected}), "/v1/actions", None).unwrap();
            assert_eq!(envelope.receipt.chain_position, expected);
        }
        assert_eq!(sealer.chain_head().unwrap().position, 5);
    }

    #[test]
    fn different_domains_yield_unrelated_artifacts() {
        let sealer = sealer();
        let payload = json!({"result": "ok"});
        let a = sealer.seal(&payload, "/v1/actions", None).unwrap();
        let b = sealer.seal(&payload, "/v1/consent/anchors", None).unwrap();
        assert_ne!(a.receipt.artifact_hash, b.receipt.artifact_hash);
    }

    #[test]
    fn parent_reference_threads_into_the_receipt() {
        let sealer = sealer();
        let parent = ParentReference::Record(ParentReceipt {
            receipt_id: "r-up".into(),
            chain_depth: 2,
            chain_root: Some("r-origin".into()),
        });
        let envelope = sealer
            .seal(&json!({"ok": true}), "/v1/actions", Some(&parent))
            .unwrap();
        assert_eq!(envelope.receipt.parent_receipt_id.as_deref(), Some("r-up"));
        assert_eq!(envelope.receipt.chain_depth, 3);
        assert_eq!(envelope.receipt.chain_root, "r-origin");
    }

    #[test]
    fn concurrent_seals_never_skip_or_duplicate_positions() {
        let sealer = Arc::new(sealer());
        let n = 16;

        let handles: Vec<_> = (0..n)
            .map(|i| {
                let sealer = Arc::clone(&sealer);
                std::thread::spawn(move || {
                    sealer
                        .seal(&json!({"worker": i}), "/v1/actions", None)
                        .unwrap()
                        .receipt
                        .chain_position
                })
            })
            .collect();

        let mut positions: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        positions.sort_unstable();

        assert_eq!(positions, (1..=n as u64).collect::<Vec<_>>());
        assert_eq!(sealer.chain_head().unwrap().position, n as u64);
        assert_eq!(sealer.verify_history().unwrap(), n as u64);
    }

    #[test]
    fn verify_history_detects_tampering() {
        let sealer = sealer();
        for i in 0..4 {
            sealer.seal(&json!({"n": i}), "/v1/actions", None).unwrap();
        }
        assert_eq!(sealer.verify_history().unwrap(), 4);

        {
            let mut inner = sealer.chain.lock().unwrap();
            inner.history[2].artifact_hash = [0xee; 32];
        }

        assert!(matches!(
            sealer.verify_history(),
            Err(SealError::IntegrityViolation { position: 3, .. })
        ));
    }

    #[test]
    fn fresh_chain_verifies_trivially() {
        assert_eq!(sealer().verify_history().unwrap(), 0);
    }

    #[test]
    fn different_keys_start_different_chains() {
        let a = Sealer::new(Arc::new(Keypair::from_seed(&[1u8; 32])));
        let b = Sealer::new(Arc::new(Keypair::from_seed(&[2u8; 32])));
        assert_ne!(
            a.chain_head().unwrap().genesis_hash,
            b.chain_head().unwrap().genesis_hash
        );
    }
}
