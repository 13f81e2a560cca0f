//! Cryptographic primitives for Kauri.
//!
//! One place for the three primitives every other crate leans on:
//!
//! - **BLAKE3** for all 256-bit hashing
//! - **Ed25519** (deterministic signatures) for sealing receipts
//! - a small persistent keystore: load a signing seed from disk or mint one
//!
//! Secret material is zeroized when it leaves scope.

#![deny(unsafe_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroize;

/// Errors from key handling and encoding.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("keystore io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("persisted seed is malformed: expected 32 bytes, found {0}")]
    MalformedSeed(usize),

    #[error("invalid hex input: {0}")]
    InvalidHex(String),

    #[error("signature verification failed")]
    BadSignature,
}

/// Compute a BLAKE3 digest.
pub fn hash(bytes: &[u8]) -> [u8; 32] {
    *blake3::hash(bytes).as_bytes()
}

/// Compute a BLAKE3 digest with a domain-separation prefix.
pub fn hash_with_domain(domain: &[u8], bytes: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(domain);
    hasher.update(bytes);
    *hasher.finalize().as_bytes()
}

/// Lowercase hex encoding.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decode lowercase/uppercase hex.
pub fn from_hex(input: &str) -> Result<Vec<u8>, CryptoError> {
    if input.len() % 2 != 0 {
        return Err(CryptoError::InvalidHex(format!(
            "odd length {}",
            input.len()
        )));
    }
    (0..input.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&input[i..i + 2], 16)
                .map_err(|_| CryptoError::InvalidHex(input[i..i + 2].to_string()))
        })
        .collect()
}

/// Whether a keypair was reloaded from disk or freshly generated.
///
/// A freshly generated key is a provenance-chain discontinuity: the genesis
/// hash changes and the chain restarts at position 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyProvenance {
    Loaded,
    Generated,
}

/// An Ed25519 signing keypair.
pub struct Keypair {
    signing: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        let mut seed = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut seed);
        let pair = Self {
            signing: SigningKey::from_bytes(&seed),
        };
        seed.zeroize();
        pair
    }

    /// Rebuild a keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing: SigningKey::from_bytes(seed),
        }
    }

    /// Sign a message. Ed25519 signatures are deterministic: the same key and
    /// message always produce the same signature bytes.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing.sign(message).to_bytes()
    }

    /// The public half, as raw bytes.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing.verifying_key().to_bytes()
    }

    /// The public half, hex-encoded for receipts.
    pub fn public_key_hex(&self) -> String {
        to_hex(&self.public_key_bytes())
    }

    fn seed_bytes(&self) -> [u8; 32] {
        self.signing.to_bytes()
    }
}

/// Verify a detached signature against a public key.
pub fn verify(
    public_key: &[u8; 32],
    message: &[u8],
    signature: &[u8; 64],
) -> Result<(), CryptoError> {
    let key = VerifyingKey::from_bytes(public_key).map_err(|_| CryptoError::BadSignature)?;
    let signature = Signature::from_bytes(signature);
    key.verify(message, &signature)
        .map_err(|_| CryptoError::BadSignature)
}

/// Load a persisted signing seed, or mint and persist a new one.
///
/// The seed file holds exactly 32 raw bytes. A missing or malformed file
/// yields a new key (`KeyProvenance::Generated`); the caller decides how loud
/// to be about the resulting chain restart.
pub fn load_or_create(path: &Path) -> Result<(Arc<Keypair>, KeyProvenance), CryptoError> {
    if path.exists() {
        let mut bytes = fs::read(path)?;
        if bytes.len() == 32 {
            let mut seed = [0u8; 32];
            seed.copy_from_slice(&bytes);
            bytes.zeroize();
            let pair = Keypair::from_seed(&seed);
            seed.zeroize();
            return Ok((Arc::new(pair), KeyProvenance::Loaded));
        }
        let found = bytes.len();
        bytes.zeroize();
        return Err(CryptoError::MalformedSeed(found));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pair = Keypair::generate();
    let mut seed = pair.seed_bytes();
    fs::write(path, seed)?;
    seed.zeroize();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok((Arc::new(pair), KeyProvenance::Generated))
}
