use crate::error::SettlementError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fraction of the post-fee amount the merchant keeps when a split ratio is
/// not supplied explicitly.
pub const DEFAULT_SPLIT_RATIO: Decimal = dec!(0.8);

/// How an order's post-fee money is divided between merchant and mall.
///
/// The set is closed: external strings (requests, CSV rows) are converted at
/// the boundary via [`FromStr`], which is where an unknown mode surfaces as
/// [`SettlementError::UnsupportedSettlementMode`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementMode {
    /// Percentage revenue share of the post-fee amount.
    #[default]
    NormalSplit,
    /// Mall injects a fixed per-unit subsidy on top of the merchant's take.
    MallSubsidy,
    /// Merchant is paid a fixed price per unit; the mall absorbs it as cost.
    PointsExchange,
}

impl SettlementMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementMode::NormalSplit => "normal_split",
            SettlementMode::MallSubsidy => "mall_subsidy",
            SettlementMode::PointsExchange => "points_exchange",
        }
    }
}

impl fmt::Display for SettlementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettlementMode {
    type Err = SettlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal_split" => Ok(SettlementMode::NormalSplit),
            "mall_subsidy" => Ok(SettlementMode::MallSubsidy),
            "points_exchange" => Ok(SettlementMode::PointsExchange),
            other => Err(SettlementError::UnsupportedSettlementMode(
                other.to_string(),
            )),
        }
    }
}

/// Which side of the split a detail line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    Merchant,
    Mall,
}

/// One settlement computation request. All amounts are integer minor units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementParams {
    /// Gross order amount, must be non-negative.
    pub total_amount: i64,
    /// Must resolve to a registered payment method config.
    pub payment_method: String,
    pub settlement_mode: SettlementMode,
    /// Merchant's fraction in [0, 1]; only `normal_split` reads it.
    pub split_ratio: Decimal,
    /// Per-unit mall subsidy; only `mall_subsidy` reads it.
    pub subsidy_amount: i64,
    /// Per-unit merchant payout; only `points_exchange` reads it.
    pub settlement_price: i64,
    /// Unit count, scales the per-unit figures.
    pub quantity: i64,
}

impl Default for SettlementParams {
    fn default() -> Self {
        Self {
            total_amount: 0,
            payment_method: String::new(),
            settlement_mode: SettlementMode::default(),
            split_ratio: DEFAULT_SPLIT_RATIO,
            subsidy_amount: 0,
            settlement_price: 0,
            quantity: 1,
        }
    }
}

/// One line of the human-auditable split ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementDetail {
    pub party: Party,
    pub amount: i64,
    pub ratio: Decimal,
    pub description: String,
}

/// Computation output. Immutable once produced; plain data so the
/// persistence layer can serialize it unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Gross amount echoed from the request, for audit.
    pub actual_amount: i64,
    /// Clamped processor fee.
    pub payment_fee: i64,
    /// `actual_amount - payment_fee`, the amount available to distribute.
    pub settlement_amount: i64,
    pub merchant_amount: i64,
    pub mall_amount: i64,
    /// Rate actually applied, echoed from config.
    pub fee_rate: Decimal,
    /// Carried so validation can be mode-aware.
    pub settlement_mode: SettlementMode,
    pub details: Vec<SettlementDetail>,
}

/// Lifecycle of a stored settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Computed and stored, not yet confirmed.
    Pending,
    /// Re-validated and confirmed.
    Settled,
    /// Failed validation on confirmation.
    Rejected,
}

/// A settlement result keyed by the order it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub order_id: String,
    pub status: SettlementStatus,
    pub result: SettlementResult,
}

/// Formats a minor-unit amount as a major-unit currency string, e.g.
/// `format_major(-1000)` is `"¥-10.00"`. Only used inside detail
/// descriptions; everything else stays in minor units.
pub fn format_major(minor: i64) -> String {
    format!("¥{}", Decimal::new(minor, 2))
}
