use crate::domain::ports::SettlementStore;
use crate::domain::settlement::SettlementRecord;
use crate::error::{Result, SettlementError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing settlement records.
pub const CF_SETTLEMENTS: &str = "settlements";

/// A persistent settlement store implementation using RocksDB.
///
/// Records are stored in a dedicated column family, keyed by order id with
/// JSON-serialized values, so a merchant console run can be resumed against
/// the same database.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the `settlements` column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_settlements = ColumnFamilyDescriptor::new(CF_SETTLEMENTS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_settlements])
            .map_err(|e| SettlementError::Internal(Box::new(e)))?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf_handle(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_SETTLEMENTS).ok_or_else(|| {
            SettlementError::Internal(Box::new(std::io::Error::other(
                "settlements column family not found",
            )))
        })
    }
}

#[async_trait]
impl SettlementStore for RocksDBStore {
    async fn store(&self, record: SettlementRecord) -> Result<()> {
        let cf = self.cf_handle()?;
        let value = serde_json::to_vec(&record)?;
        self.db
            .put_cf(cf, record.order_id.as_bytes(), value)
            .map_err(|e| SettlementError::Internal(Box::new(e)))?;
        Ok(())
    }

    async fn get(&self, order_id: &str) -> Result<Option<SettlementRecord>> {
        let cf = self.cf_handle()?;
        let result = self
            .db
            .get_cf(cf, order_id.as_bytes())
            .map_err(|e| SettlementError::Internal(Box::new(e)))?;

        match result {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn all(&self) -> Result<Vec<SettlementRecord>> {
        let cf = self.cf_handle()?;

        let mut records = Vec::new();
        let iter = self.db.iterator_cf(cf, rocksdb::IteratorMode::Start);
        for item in iter {
            let (_key, value) = item.map_err(|e| SettlementError::Internal(Box::new(e)))?;
            records.push(serde_json::from_slice(&value)?);
        }

        Ok(records)
    }
}
