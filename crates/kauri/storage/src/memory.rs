use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::{ActionAudit, AnchorAudit, QueryWindow};
use crate::traits::{ActionAuditStore, AnchorAuditStore};
use crate::StorageResult;

/// In-memory audit store used for tests, demos, and embedding.
#[derive(Default)]
pub struct MemoryAuditStore {
    actions: RwLock<Vec<ActionAudit>>,
    anchors: RwLock<Vec<AnchorAudit>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn window<T: Clone>(records: &[T], window: QueryWindow) -> Vec<T> {
    let iter = records.iter().rev().skip(window.offset);
    if window.limit == 0 {
        iter.cloned().collect()
    } else {
        iter.take(window.limit).cloned().collect()
    }
}

#[async_trait]
impl ActionAuditStore for MemoryAuditStore {
    async fn record_action(&self, audit: ActionAudit) -> StorageResult<()> {
        self.actions.write().await.push(audit);
        Ok(())
    }

    async fn list_actions(&self, query: QueryWindow) -> StorageResult<Vec<ActionAudit>> {
        Ok(window(&self.actions.read().await, query))
    }
}

#[async_trait]
impl AnchorAuditStore for MemoryAuditStore {
    async fn record_anchor(&self, audit: AnchorAudit) -> StorageResult<()> {
        self.anchors.write().await.push(audit);
        Ok(())
    }

    async fn list_anchors(&self, query: QueryWindow) -> StorageResult<Vec<AnchorAudit>> {
        Ok(window(&self.anchors.read().await, query))
    }
}
