use super::settlement::SettlementRecord;
use crate::error::Result;
use async_trait::async_trait;

/// Storage port for settlement records, keyed by order id.
///
/// The engine itself is pure; this is the seam the persistence layer plugs
/// into so results can be stored after calculation and re-read before an
/// order is confirmed as settled.
#[async_trait]
pub trait SettlementStore: Send + Sync {
    async fn store(&self, record: SettlementRecord) -> Result<()>;
    async fn get(&self, order_id: &str) -> Result<Option<SettlementRecord>>;
    async fn all(&self) -> Result<Vec<SettlementRecord>>;
}

pub type SettlementStoreBox = Box<dyn SettlementStore>;
