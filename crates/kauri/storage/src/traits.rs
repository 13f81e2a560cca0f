use async_trait::async_trait;

use crate::model::{ActionAudit, AnchorAudit, QueryWindow};
use crate::StorageResult;

/// Append-only store for evaluated actions.
#[async_trait]
pub trait ActionAuditStore: Send + Sync {
    /// Append one evaluated action. Appends are never updated or deleted.
    async fn record_action(&self, audit: ActionAudit) -> StorageResult<()>;

    /// Read actions newest-first.
    async fn list_actions(&self, window: QueryWindow) -> StorageResult<Vec<ActionAudit>>;
}

/// Append-only store for generated consent anchors.
#[async_trait]
pub trait AnchorAuditStore: Send + Sync {
    /// Append one generated anchor (with the hashed authorizer).
    async fn record_anchor(&self, audit: AnchorAudit) -> StorageResult<()>;

    /// Read anchors newest-first.
    async fn list_anchors(&self, window: QueryWindow) -> StorageResult<Vec<AnchorAudit>>;
}

/// Unified audit bundle the gateway holds one handle to.
pub trait GateAuditStore: ActionAuditStore + AnchorAuditStore + Send + Sync {}

impl<T> GateAuditStore for T where T: ActionAuditStore + AnchorAuditStore + Send + Sync {}
