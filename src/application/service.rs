use super::engine::SettlementEngine;
use crate::domain::config::PaymentMethodConfig;
use crate::domain::ports::SettlementStoreBox;
use crate::domain::settlement::{
    SettlementParams, SettlementRecord, SettlementResult, SettlementStatus,
};
use crate::error::Result;

/// Settlement confirmation workflow.
///
/// Wires the pure [`SettlementEngine`] to a storage port: results are
/// persisted as `pending` right after calculation and re-validated on
/// confirmation before an order may be marked `settled`. A result that
/// fails validation is marked `rejected` and never silently settled.
pub struct SettlementService {
    engine: SettlementEngine,
    store: SettlementStoreBox,
}

impl SettlementService {
    pub fn new(engine: SettlementEngine, store: SettlementStoreBox) -> Self {
        Self { engine, store }
    }

    pub fn engine(&self) -> &SettlementEngine {
        &self.engine
    }

    /// Forwarded to the engine; affects subsequent calculations only.
    pub fn update_payment_config(&mut self, config: PaymentMethodConfig) {
        self.engine.update_payment_config(config);
    }

    /// Calculates the settlement for one order and stores it as `pending`.
    pub async fn settle_order(
        &self,
        order_id: &str,
        params: &SettlementParams,
    ) -> Result<SettlementResult> {
        let result = self.engine.calculate_settlement(params)?;
        self.store
            .store(SettlementRecord {
                order_id: order_id.to_string(),
                status: SettlementStatus::Pending,
                result: result.clone(),
            })
            .await?;
        tracing::debug!(order_id, mode = %result.settlement_mode, "settlement calculated");
        Ok(result)
    }

    /// Re-validates a stored result and marks the order `settled` or
    /// `rejected`. Returns whether the order is settled afterwards; an
    /// unknown order id returns `false`.
    pub async fn confirm_order(&self, order_id: &str) -> Result<bool> {
        let Some(mut record) = self.store.get(order_id).await? else {
            return Ok(false);
        };
        if record.status == SettlementStatus::Settled {
            return Ok(true);
        }

        let valid = self.engine.validate_settlement_result(&record.result);
        record.status = if valid {
            SettlementStatus::Settled
        } else {
            SettlementStatus::Rejected
        };
        if !valid {
            tracing::warn!(order_id, "settlement result failed validation, rejecting");
        }
        self.store.store(record).await?;
        Ok(valid)
    }

    /// Consumes the service and returns the final state of all records.
    pub async fn into_results(self) -> Result<Vec<SettlementRecord>> {
        self.store.all().await
    }
}
