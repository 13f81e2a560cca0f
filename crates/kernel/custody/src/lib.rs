//! Chain-of-custody links.
//!
//! When a response receipt is minted, the caller may name the upstream
//! receipt that caused this work (a downstream service calling us with the
//! receipt it was handed). The custody link records parentage so a multi-hop
//! provenance chain can be reconstructed end to end.
//!
//! Custody fields are computed once at receipt-creation time and never
//! mutated afterward.

#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body field checked for a parent reference.
pub const PARENT_BODY_FIELD: &str = "parent_receipt";

/// Transport header checked for a parent receipt id.
pub const PARENT_HEADER: &str = "x-kauri-parent-receipt";

/// An upstream receipt reference supplied by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ParentReference {
    /// Only the parent's receipt id is known.
    Id(String),
    /// The full parent receipt record was forwarded.
    Record(ParentReceipt),
}

/// The custody-relevant slice of an upstream receipt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParentReceipt {
    pub receipt_id: String,
    #[serde(default)]
    pub chain_depth: u32,
    #[serde(default)]
    pub chain_root: Option<String>,
}

/// Custody fields attached to a freshly minted local receipt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustodyLink {
    pub parent_receipt_id: Option<String>,
    /// 0 = this receipt starts a new chain.
    pub chain_depth: u32,
    /// Receipt id of the originating receipt in this cross-service chain.
    pub chain_root: String,
}

/// Compute the custody link for a local receipt.
///
/// - no parent: this receipt roots a new chain
/// - full parent record: depth increments, root is inherited (falling back to
///   the parent's own id when the parent recorded no root)
/// - bare id: degraded mode; depth beyond one hop cannot be reconstructed
///   from an id alone, so depth is pinned to 1 and the id roots the chain
pub fn link(local_receipt_id: &str, parent: Option<&ParentReference>) -> CustodyLink {
    match parent {
        None => CustodyLink {
            parent_receipt_id: None,
            chain_depth: 0,
            chain_root: local_receipt_id.to_string(),
        },
        Some(ParentReference::Record(parent)) => CustodyLink {
            parent_receipt_id: Some(parent.receipt_id.clone()),
            chain_depth: parent.chain_depth + 1,
            chain_root: parent
                .chain_root
                .clone()
                .filter(|root| !root.is_empty())
                .unwrap_or_else(|| parent.receipt_id.clone()),
        },
        Some(ParentReference::Id(id)) => CustodyLink {
            parent_receipt_id: Some(id.clone()),
            chain_depth: 1,
            chain_root: id.clone(),
        },
    }
}

/// Pull a parent reference out of an incoming request.
///
/// Checks the `parent_receipt` field of a structured body first (an object is
/// a full record, a string is a bare id), then the transport header. First
/// non-empty match wins; an unusable body value falls through to the header.
pub fn extract_parent_reference(body: &Value, header: Option<&str>) -> Option<ParentReference> {
    if let Some(field) = body.get(PARENT_BODY_FIELD) {
        match field {
            Value::String(id) if !id.trim().is_empty() => {
                return Some(ParentReference::Id(id.trim().to_string()));
            }
            Value::Object(_) => {
                if let Ok(parent) = serde_json::from_value::<ParentReceipt>(field.clone()) {
                    if !parent.receipt_id.trim().is_empty() {
                        return Some(ParentReference::Record(parent));
                    }
                }
            }
            _ => {}
        }
    }

    header
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| ParentReference::Id(id.to_string()))
}
