use configuration::{FeeBasis, FeeSchedule};
use rust_decimal::Decimal;

/// Applies the fee schedule to a group's aggregated volumes.
///
/// `rate / period_divisor * base_sum`, where the rule's basis selects the
/// deposit sum in its currency or, for flat transaction-volume rules, the
/// deposit-plus-withdrawal sum in the local currency. An asset type absent
/// from the schedule yields zero, never an error.
pub fn estimated_revenue(
    schedule: &FeeSchedule,
    asset_type: &str,
    deposit_ghs: Decimal,
    deposit_usd: Decimal,
    withdrawal_ghs: Decimal,
) -> Decimal {
    let Some(rule) = schedule.rule(asset_type) else {
        return Decimal::ZERO;
    };
    let base_sum = match rule.basis {
        FeeBasis::DepositGhs => deposit_ghs,
        FeeBasis::DepositUsd => deposit_usd,
        FeeBasis::VolumeGhs => deposit_ghs + withdrawal_ghs,
    };
    if rule.period_divisor.is_zero() {
        // A zero divisor is a misconfigured rule, not a reason to fault.
        return Decimal::ZERO;
    }
    rule.rate / rule.period_divisor * base_sum
}

/// Early-withdrawal penalty revenue: a flat rate over the USD sum of
/// early-withdrawal-classified transactions.
pub fn early_withdrawal_fees(early_withdrawal_usd: Decimal, rate: Decimal) -> Decimal {
    early_withdrawal_usd * rate
}
