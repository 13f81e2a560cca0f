//! Signing-key lifecycle.
//!
//! The keypair is created once and persisted; subsequent startups reload it.
//! A lost or regenerated key is a chain discontinuity: the genesis hash
//! changes and the chain restarts at position 0. That break is surfaced
//! loudly here, never silently bridged to the old chain.

use std::path::Path;
use std::sync::Arc;

use kauri_crypto::{KeyProvenance, Keypair};
use tracing::{info, warn};

use crate::error::SealError;

/// Load the persisted signing key, or mint and persist a new one.
pub fn load_or_create(path: &Path) -> Result<(Arc<Keypair>, KeyProvenance), SealError> {
    let (keypair, provenance) = kauri_crypto::load_or_create(path)?;
    match provenance {
        KeyProvenance::Loaded => {
            info!(
                public_key = %keypair.public_key_hex(),
                "signing key reloaded; provenance chain continues"
            );
        }
        KeyProvenance::Generated => {
            warn!(
                public_key = %keypair.public_key_hex(),
                "signing key generated; provenance chain restarts at a new genesis"
            );
        }
    }
    Ok((keypair, provenance))
}
