use crate::domain::settlement::{DEFAULT_SPLIT_RATIO, SettlementMode, SettlementParams};
use crate::error::{Result, SettlementError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One order row as exported by the mall backend. Amounts are integer minor
/// units; the mode is an external string converted in [`OrderRow::into_request`],
/// which is the boundary where an unknown mode becomes
/// [`SettlementError::UnsupportedSettlementMode`].
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct OrderRow {
    pub order_id: String,
    pub total_amount: i64,
    pub payment_method: String,
    pub settlement_mode: String,
    #[serde(default)]
    pub split_ratio: Option<Decimal>,
    #[serde(default)]
    pub subsidy_amount: Option<i64>,
    #[serde(default)]
    pub settlement_price: Option<i64>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl OrderRow {
    /// Converts the row into an order id plus engine params, applying the
    /// defaults for omitted columns (split ratio 0.8, quantity 1).
    pub fn into_request(self) -> Result<(String, SettlementParams)> {
        let settlement_mode: SettlementMode = self.settlement_mode.parse()?;
        let params = SettlementParams {
            total_amount: self.total_amount,
            payment_method: self.payment_method,
            settlement_mode,
            split_ratio: self.split_ratio.unwrap_or(DEFAULT_SPLIT_RATIO),
            subsidy_amount: self.subsidy_amount.unwrap_or(0),
            settlement_price: self.settlement_price.unwrap_or(0),
            quantity: self.quantity.unwrap_or(1),
        };
        Ok((self.order_id, params))
    }
}

/// Reads order rows from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<OrderRow>`. It handles whitespace trimming and flexible record
/// lengths automatically, so trailing mode-specific columns may be omitted.
pub struct OrderReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OrderReader<R> {
    /// Creates a new `OrderReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes order rows,
    /// so large exports stream without being loaded into memory.
    pub fn orders(self) -> impl Iterator<Item = Result<OrderRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(SettlementError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "order_id,total_amount,payment_method,settlement_mode,split_ratio,subsidy_amount,settlement_price,quantity";

    #[test]
    fn test_reader_valid_stream() {
        let data = format!("{HEADER}\n1001, 100000, wechat, normal_split, 0.8,,,\n1002, 5000, cash, normal_split,,,,");
        let reader = OrderReader::new(data.as_bytes());
        let rows: Vec<Result<OrderRow>> = reader.orders().collect();

        assert_eq!(rows.len(), 2);
        let row = rows[0].as_ref().unwrap();
        assert_eq!(row.order_id, "1001");
        assert_eq!(row.total_amount, 100000);
        assert_eq!(row.split_ratio, Some(dec!(0.8)));
        assert_eq!(rows[1].as_ref().unwrap().split_ratio, None);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = format!("{HEADER}\n1001, not_a_number, wechat, normal_split,,,,");
        let reader = OrderReader::new(data.as_bytes());
        let rows: Vec<Result<OrderRow>> = reader.orders().collect();

        assert!(rows[0].is_err());
    }

    #[test]
    fn test_into_request_defaults() {
        let data = format!("{HEADER}\n1003, 10000, wechat, mall_subsidy,, 500,, 2");
        let reader = OrderReader::new(data.as_bytes());
        let row = reader.orders().next().unwrap().unwrap();

        let (order_id, params) = row.into_request().unwrap();
        assert_eq!(order_id, "1003");
        assert_eq!(params.settlement_mode, SettlementMode::MallSubsidy);
        assert_eq!(params.split_ratio, DEFAULT_SPLIT_RATIO);
        assert_eq!(params.subsidy_amount, 500);
        assert_eq!(params.quantity, 2);
    }

    #[test]
    fn test_into_request_unknown_mode() {
        let data = format!("{HEADER}\n1004, 10000, wechat, barter,,,,");
        let reader = OrderReader::new(data.as_bytes());
        let row = reader.orders().next().unwrap().unwrap();

        let err = row.into_request().unwrap_err();
        assert!(matches!(
            err,
            SettlementError::UnsupportedSettlementMode(ref mode) if mode == "barter"
        ));
    }
}
