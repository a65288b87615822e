use crate::domain::ports::SettlementStore;
use crate::domain::settlement::SettlementRecord;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for settlement records.
///
/// Uses `Arc<RwLock<HashMap<String, SettlementRecord>>>` to allow shared
/// concurrent access. Ideal for testing or single-run batches where
/// persistence is not required.
#[derive(Default, Clone)]
pub struct InMemorySettlementStore {
    records: Arc<RwLock<HashMap<String, SettlementRecord>>>,
}

impl InMemorySettlementStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettlementStore for InMemorySettlementStore {
    async fn store(&self, record: SettlementRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.order_id.clone(), record);
        Ok(())
    }

    async fn get(&self, order_id: &str) -> Result<Option<SettlementRecord>> {
        let records = self.records.read().await;
        Ok(records.get(order_id).cloned())
    }

    async fn all(&self) -> Result<Vec<SettlementRecord>> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }
}
