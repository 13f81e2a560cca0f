use thiserror::Error;

/// Errors from sealing and chain maintenance.
///
/// Sealing failures are non-fatal to the surrounding service: the transport
/// layer logs them and delivers the payload unsealed.
#[derive(Debug, Error)]
pub enum SealError {
    #[error("payload serialization failed: {0}")]
    Serialization(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] kauri_crypto::CryptoError),

    #[error("chain lock poisoned")]
    LockPoisoned,

    #[error("chain integrity violation at position {position}: {reason}")]
    IntegrityViolation { position: u64, reason: String },
}
