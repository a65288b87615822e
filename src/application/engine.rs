use crate::domain::config::{PaymentMethodConfig, builtin_configs};
use crate::domain::settlement::{
    Party, SettlementDetail, SettlementMode, SettlementParams, SettlementResult, format_major,
};
use crate::error::{Result, SettlementError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// Computes payment-processor fees and the merchant/mall revenue split.
///
/// The engine owns an explicit payment-method config registry (no ambient
/// singleton) so tests and callers can build isolated instances. Every
/// calculation is a pure function of its params plus the registry; the only
/// mutation is [`SettlementEngine::update_payment_config`], which takes
/// `&mut self`, leaving shared access to the caller.
///
/// Rounding rule: every fractional division rounds half away from zero
/// (`RoundingStrategy::MidpointAwayFromZero`), matching the behavior the
/// mall backend exhibits for non-negative amounts.
pub struct SettlementEngine {
    configs: HashMap<String, PaymentMethodConfig>,
}

impl Default for SettlementEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SettlementEngine {
    /// Creates an engine seeded with the built-in channel defaults
    /// (wechat 0.6%, alipay 0.6%, cash 0%).
    pub fn new() -> Self {
        Self::with_configs(builtin_configs())
    }

    /// Creates an engine with an explicit set of configs and nothing else.
    pub fn with_configs(configs: impl IntoIterator<Item = PaymentMethodConfig>) -> Self {
        Self {
            configs: configs
                .into_iter()
                .map(|config| (config.code.clone(), config))
                .collect(),
        }
    }

    /// Inserts or replaces the config for `config.code`. Last write wins.
    /// Field ranges are not validated; the configuration source is trusted.
    pub fn update_payment_config(&mut self, config: PaymentMethodConfig) {
        self.configs.insert(config.code.clone(), config);
    }

    /// Pure lookup. Absence is the caller's error to raise.
    pub fn get_payment_config(&self, method: &str) -> Option<&PaymentMethodConfig> {
        self.configs.get(method)
    }

    /// Computes fee and split for one order.
    ///
    /// Fails with [`SettlementError::UnsupportedPaymentMethod`] when the
    /// method has no registered config. The mode set is closed at the type
    /// level, so no unknown-mode path exists here; converting an external
    /// string raises that error at the boundary instead.
    pub fn calculate_settlement(&self, params: &SettlementParams) -> Result<SettlementResult> {
        let config = self.get_payment_config(&params.payment_method).ok_or_else(|| {
            SettlementError::UnsupportedPaymentMethod(params.payment_method.clone())
        })?;

        let payment_fee = compute_fee(params.total_amount, config)?;
        let settlement_amount = params.total_amount - payment_fee;

        let details = match params.settlement_mode {
            SettlementMode::NormalSplit => normal_split_details(settlement_amount, params)?,
            SettlementMode::MallSubsidy => mall_subsidy_details(settlement_amount, params)?,
            SettlementMode::PointsExchange => points_exchange_details(params)?,
        };

        let merchant_amount = sum_party(&details, Party::Merchant);
        let mall_amount = sum_party(&details, Party::Mall);

        Ok(SettlementResult {
            actual_amount: params.total_amount,
            payment_fee,
            settlement_amount,
            merchant_amount,
            mall_amount,
            fee_rate: config.fee_rate,
            settlement_mode: params.settlement_mode,
            details,
        })
    }

    /// Checks the internal consistency of a previously computed result.
    ///
    /// Two checks: `settlement_amount` must equal `actual_amount -
    /// payment_fee` exactly, and the merchant/mall sum must match the
    /// mode's expected total within one minor unit (legacy results carry
    /// independent-rounding artifacts). `points_exchange` splits sum to
    /// zero by business rule, so the sum is compared against zero for that
    /// mode rather than against `settlement_amount`.
    ///
    /// Returns a boolean, never an error: the confirmation workflow decides
    /// how to react.
    pub fn validate_settlement_result(&self, result: &SettlementResult) -> bool {
        if result.settlement_amount != result.actual_amount - result.payment_fee {
            return false;
        }

        let expected_sum = match result.settlement_mode {
            SettlementMode::PointsExchange => 0,
            SettlementMode::NormalSplit | SettlementMode::MallSubsidy => result.settlement_amount,
        };

        (result.merchant_amount + result.mall_amount - expected_sum).abs() <= 1
    }
}

/// Fee for a gross amount under one channel config: zero-rate channels
/// short-circuit to 0 (clamps skipped), otherwise `round(total * rate /
/// 100)` clamped to `min_fee` first, then `max_fee`.
fn compute_fee(total_amount: i64, config: &PaymentMethodConfig) -> Result<i64> {
    if config.fee_rate.is_zero() {
        return Ok(0);
    }

    let raw = Decimal::from(total_amount) * config.fee_rate / Decimal::ONE_HUNDRED;
    let mut fee = round_half_up(raw, "payment fee")?;

    if let Some(min_fee) = config.min_fee
        && fee < min_fee
    {
        fee = min_fee;
    }
    if let Some(max_fee) = config.max_fee
        && fee > max_fee
    {
        fee = max_fee;
    }

    Ok(fee)
}

fn round_half_up(value: Decimal, context: &'static str) -> Result<i64> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(SettlementError::AmountOverflow(context))
}

fn sum_party(details: &[SettlementDetail], party: Party) -> i64 {
    details
        .iter()
        .filter(|detail| detail.party == party)
        .map(|detail| detail.amount)
        .sum()
}

fn percent(ratio: Decimal) -> Decimal {
    (ratio * Decimal::ONE_HUNDRED).normalize()
}

/// Percentage revenue share. The merchant side is rounded; the mall side is
/// the remainder rather than a second rounding, so the two always sum to the
/// settlement amount exactly.
fn normal_split_details(
    settlement_amount: i64,
    params: &SettlementParams,
) -> Result<Vec<SettlementDetail>> {
    let merchant_amount = round_half_up(
        Decimal::from(settlement_amount) * params.split_ratio,
        "merchant share",
    )?;
    let mall_amount = settlement_amount - merchant_amount;
    let mall_ratio = Decimal::ONE - params.split_ratio;

    Ok(vec![
        SettlementDetail {
            party: Party::Merchant,
            amount: merchant_amount,
            ratio: params.split_ratio,
            description: format!("merchant share {}%", percent(params.split_ratio)),
        },
        SettlementDetail {
            party: Party::Mall,
            amount: mall_amount,
            ratio: mall_ratio,
            description: format!("mall share {}%", percent(mall_ratio)),
        },
    ])
}

/// Fixed per-unit subsidy injected by the mall: recorded as a negative mall
/// line and added on top of the merchant's post-fee take. The merchant can
/// receive more than the settlement amount; algebraically the two lines
/// still sum to it.
fn mall_subsidy_details(
    settlement_amount: i64,
    params: &SettlementParams,
) -> Result<Vec<SettlementDetail>> {
    let subsidy_total = params
        .subsidy_amount
        .checked_mul(params.quantity)
        .ok_or(SettlementError::AmountOverflow("mall subsidy"))?;
    let merchant_amount = settlement_amount
        .checked_add(subsidy_total)
        .ok_or(SettlementError::AmountOverflow("merchant payout"))?;

    Ok(vec![
        SettlementDetail {
            party: Party::Merchant,
            amount: merchant_amount,
            ratio: Decimal::ONE,
            description: "settlement amount + mall subsidy".to_string(),
        },
        SettlementDetail {
            party: Party::Mall,
            amount: -subsidy_total,
            ratio: -Decimal::ONE,
            description: format!("mall subsidy {}", format_major(-subsidy_total)),
        },
    ])
}

/// Fixed merchant payout per unit, absorbed by the mall as pure cost. The
/// split intentionally sums to zero, not to the settlement amount: the
/// customer paid in points, so the cash settlement amount is decoupled from
/// the payout.
fn points_exchange_details(params: &SettlementParams) -> Result<Vec<SettlementDetail>> {
    let payout = params
        .settlement_price
        .checked_mul(params.quantity)
        .ok_or(SettlementError::AmountOverflow("points payout"))?;

    Ok(vec![
        SettlementDetail {
            party: Party::Merchant,
            amount: payout,
            ratio: Decimal::ONE,
            description: format!(
                "settlement price {} per unit",
                format_major(params.settlement_price)
            ),
        },
        SettlementDetail {
            party: Party::Mall,
            amount: -payout,
            ratio: -Decimal::ONE,
            description: format!("points exchange cost {}", format_major(-payout)),
        },
    ])
}
