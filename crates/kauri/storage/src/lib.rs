//! Append-only audit storage for the Kauri gateway.
//!
//! The kernel treats persistence as an external collaborator: it appends a
//! record for every evaluated action and every generated consent anchor, and
//! never reads them back itself (anchors self-validate). This crate defines
//! that contract and ships an in-memory implementation for tests, demos, and
//! embedding; a durable backend implements the same traits.

#![deny(unsafe_code)]

pub mod memory;
pub mod model;
pub mod traits;

pub use memory::MemoryAuditStore;
pub use model::{ActionAudit, AnchorAudit, QueryWindow};
pub use traits::{ActionAuditStore, AnchorAuditStore, GateAuditStore};

use thiserror::Error;

/// Errors from audit storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Convenience alias used across storage traits.
pub type StorageResult<T> = Result<T, StorageError>;
