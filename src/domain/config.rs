use crate::error::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Fee policy for a single payment channel.
///
/// `fee_rate` is a percentage of the gross amount (0-100); `min_fee` and
/// `max_fee` clamp the computed fee and are expressed in minor units, like
/// every amount in this crate. Field ranges are not validated here: the
/// configuration source is trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodConfig {
    /// Unique channel identifier, e.g. "wechat".
    pub code: String,
    /// Percentage applied to the gross amount.
    pub fee_rate: Decimal,
    pub min_fee: Option<i64>,
    pub max_fee: Option<i64>,
    /// Whether the channel may currently be used. Informational: the engine
    /// computes for disabled channels too, callers decide whether to offer them.
    pub enabled: bool,
}

impl PaymentMethodConfig {
    pub fn new(code: impl Into<String>, fee_rate: Decimal) -> Self {
        Self {
            code: code.into(),
            fee_rate,
            min_fee: None,
            max_fee: None,
            enabled: true,
        }
    }
}

/// Channel policies seeded at engine construction: wechat and alipay at 0.6%
/// with a 1 minor-unit floor and a 10000 minor-unit cap, cash free of charge.
pub fn builtin_configs() -> Vec<PaymentMethodConfig> {
    vec![
        PaymentMethodConfig {
            code: "wechat".to_string(),
            fee_rate: dec!(0.6),
            min_fee: Some(1),
            max_fee: Some(10000),
            enabled: true,
        },
        PaymentMethodConfig {
            code: "alipay".to_string(),
            fee_rate: dec!(0.6),
            min_fee: Some(1),
            max_fee: Some(10000),
            enabled: true,
        },
        PaymentMethodConfig {
            code: "cash".to_string(),
            fee_rate: Decimal::ZERO,
            min_fee: None,
            max_fee: None,
            enabled: true,
        },
    ]
}

/// Loads payment method configs from a JSON file (an array of
/// `PaymentMethodConfig` records, as an admin backend would export them).
pub fn load_payment_configs<P: AsRef<Path>>(path: P) -> Result<Vec<PaymentMethodConfig>> {
    let file = File::open(path)?;
    let configs = serde_json::from_reader(file)?;
    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_configs() {
        let configs = builtin_configs();
        assert_eq!(configs.len(), 3);

        let wechat = configs.iter().find(|c| c.code == "wechat").unwrap();
        assert_eq!(wechat.fee_rate, dec!(0.6));
        assert_eq!(wechat.min_fee, Some(1));
        assert_eq!(wechat.max_fee, Some(10000));
        assert!(wechat.enabled);

        let cash = configs.iter().find(|c| c.code == "cash").unwrap();
        assert_eq!(cash.fee_rate, Decimal::ZERO);
        assert_eq!(cash.min_fee, None);
    }

    #[test]
    fn test_load_payment_configs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"code":"wechat","fee_rate":"1.0","min_fee":1,"max_fee":5000,"enabled":true}}]"#
        )
        .unwrap();

        let configs = load_payment_configs(file.path()).unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].code, "wechat");
        assert_eq!(configs[0].fee_rate, dec!(1.0));
        assert_eq!(configs[0].max_fee, Some(5000));
    }

    #[test]
    fn test_load_payment_configs_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(load_payment_configs(file.path()).is_err());
    }
}
