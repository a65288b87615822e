use crate::domain::settlement::SettlementRecord;
use crate::error::Result;
use std::io::Write;

/// Writes the final settlement report as CSV, one summary row per order.
///
/// Detail lines are not emitted here; they live in the stored records for
/// auditing. Rows are sorted by order id so the report is deterministic
/// regardless of store iteration order.
pub struct SettlementWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SettlementWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_records(&mut self, mut records: Vec<SettlementRecord>) -> Result<()> {
        records.sort_by(|a, b| a.order_id.cmp(&b.order_id));

        self.writer.write_record([
            "order_id",
            "status",
            "settlement_mode",
            "actual_amount",
            "payment_fee",
            "settlement_amount",
            "merchant_amount",
            "mall_amount",
            "fee_rate",
        ])?;

        for record in records {
            let result = &record.result;
            self.writer.write_record([
                record.order_id.clone(),
                status_str(&record).to_string(),
                result.settlement_mode.to_string(),
                result.actual_amount.to_string(),
                result.payment_fee.to_string(),
                result.settlement_amount.to_string(),
                result.merchant_amount.to_string(),
                result.mall_amount.to_string(),
                result.fee_rate.normalize().to_string(),
            ])?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

fn status_str(record: &SettlementRecord) -> &'static str {
    use crate::domain::settlement::SettlementStatus;
    match record.status {
        SettlementStatus::Pending => "pending",
        SettlementStatus::Settled => "settled",
        SettlementStatus::Rejected => "rejected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::engine::SettlementEngine;
    use crate::domain::settlement::{SettlementParams, SettlementStatus};

    fn settled_record(order_id: &str, total: i64, method: &str) -> SettlementRecord {
        let engine = SettlementEngine::new();
        let result = engine
            .calculate_settlement(&SettlementParams {
                total_amount: total,
                payment_method: method.to_string(),
                ..Default::default()
            })
            .unwrap();
        SettlementRecord {
            order_id: order_id.to_string(),
            status: SettlementStatus::Settled,
            result,
        }
    }

    #[test]
    fn test_writer_output() {
        let mut buffer = Vec::new();
        let mut writer = SettlementWriter::new(&mut buffer);
        writer
            .write_records(vec![settled_record("1001", 100000, "wechat")])
            .unwrap();
        drop(writer);

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with(
            "order_id,status,settlement_mode,actual_amount,payment_fee,settlement_amount,merchant_amount,mall_amount,fee_rate"
        ));
        assert!(output.contains("1001,settled,normal_split,100000,600,99400,79520,19880,0.6"));
    }

    #[test]
    fn test_writer_sorts_by_order_id() {
        let mut buffer = Vec::new();
        let mut writer = SettlementWriter::new(&mut buffer);
        writer
            .write_records(vec![
                settled_record("2", 5000, "cash"),
                settled_record("1", 5000, "cash"),
            ])
            .unwrap();
        drop(writer);

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[1].starts_with("1,"));
        assert!(lines[2].starts_with("2,"));
    }

    #[test]
    fn test_writer_zero_rate_formatting() {
        let mut buffer = Vec::new();
        let mut writer = SettlementWriter::new(&mut buffer);
        writer
            .write_records(vec![settled_record("1002", 5000, "cash")])
            .unwrap();
        drop(writer);

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("1002,settled,normal_split,5000,0,5000,4000,1000,0"));
    }
}
