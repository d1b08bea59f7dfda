use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The root configuration structure for the metrics engine.
///
/// Every field carries a compiled-in default mirroring the production
/// deployment, so the engine runs without a `config.toml` present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceSettings,
    pub fee_schedule: FeeSchedule,
}

/// Fixed service-level constants the metric definitions depend on.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// The date the service went live; "all time" windows clamp to this.
    pub launch_date: NaiveDate,
    /// Transactions from this provider are never counted.
    pub excluded_provider: String,
    /// Case-insensitive metadata marker that reclassifies a transaction as a
    /// maintenance fee.
    pub maintenance_fee_marker: String,
    /// Fallback metadata marker for KYC completion on historical rows.
    pub kyc_marker: String,
    /// Fee rate applied to the USD sum of early-withdrawal transactions.
    pub early_withdrawal_fee_rate: Decimal,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            // The launch date defines what "All Time" means for every report.
            launch_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or(NaiveDate::MIN),
            excluded_provider: "Flex Dollar".to_string(),
            maintenance_fee_marker: "Monthly maintenance fee deduction".to_string(),
            kyc_marker: "kyc_completed".to_string(),
            early_withdrawal_fee_rate: dec!(0.025),
        }
    }
}

/// Which aggregated sum a fee rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeBasis {
    /// Deposit sum in the local currency.
    DepositGhs,
    /// Deposit sum in USD.
    DepositUsd,
    /// Deposit plus withdrawal sum in the local currency (flat
    /// transaction-volume fee).
    VolumeGhs,
}

/// A single entry of the fee schedule: `rate / period_divisor * base_sum`.
///
/// A divisor of 1 is a one-off rate; 12 expresses an annual-equivalent rate
/// accrued monthly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRule {
    pub rate: Decimal,
    pub basis: FeeBasis,
    pub period_divisor: Decimal,
}

impl FeeRule {
    /// A one-off rate applied directly to the base sum.
    pub fn flat(rate: Decimal, basis: FeeBasis) -> Self {
        Self {
            rate,
            basis,
            period_divisor: Decimal::ONE,
        }
    }

    /// An annual-equivalent rate accrued monthly.
    pub fn monthly(rate: Decimal, basis: FeeBasis) -> Self {
        Self {
            rate,
            basis,
            period_divisor: dec!(12),
        }
    }
}

/// The per-asset-type fee schedule. New products are configuration entries
/// here, not new code paths; asset types absent from the table yield zero
/// estimated revenue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeSchedule {
    rules: HashMap<String, FeeRule>,
}

impl FeeSchedule {
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn rule(&self, asset_type: &str) -> Option<&FeeRule> {
        self.rules.get(asset_type)
    }

    pub fn insert(&mut self, asset_type: impl Into<String>, rule: FeeRule) {
        self.rules.insert(asset_type.into(), rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeeRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for FeeSchedule {
    /// The production fee table.
    fn default() -> Self {
        let mut schedule = Self::empty();
        schedule.insert("Arbitrage", FeeRule::flat(dec!(0.01), FeeBasis::VolumeGhs));
        schedule.insert(
            "flex dollar savings",
            FeeRule::monthly(dec!(0.0475), FeeBasis::DepositUsd),
        );
        schedule.insert(
            "Ladder Lock",
            FeeRule::monthly(dec!(0.06), FeeBasis::DepositUsd),
        );
        schedule.insert(
            "goal savings",
            FeeRule::monthly(dec!(0.06), FeeBasis::DepositUsd),
        );
        schedule.insert(
            "Risevest fixed income",
            FeeRule::monthly(dec!(0.02), FeeBasis::DepositUsd),
        );
        schedule.insert(
            "Risevest real estate",
            FeeRule::monthly(dec!(0.04), FeeBasis::DepositUsd),
        );
        schedule.insert("Equity", FeeRule::flat(dec!(0.02), FeeBasis::DepositGhs));
        schedule.insert(
            "Mutual funds",
            FeeRule::flat(dec!(0.02), FeeBasis::DepositGhs),
        );
        schedule.insert("ETFs", FeeRule::flat(dec!(0.02), FeeBasis::DepositUsd));
        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_covers_the_production_products() {
        let schedule = FeeSchedule::default();
        assert_eq!(schedule.len(), 9);

        let ladder_lock = schedule.rule("Ladder Lock").unwrap();
        assert_eq!(ladder_lock.rate, dec!(0.06));
        assert_eq!(ladder_lock.basis, FeeBasis::DepositUsd);
        assert_eq!(ladder_lock.period_divisor, dec!(12));

        let arbitrage = schedule.rule("Arbitrage").unwrap();
        assert_eq!(arbitrage.basis, FeeBasis::VolumeGhs);
        assert_eq!(arbitrage.period_divisor, Decimal::ONE);
    }

    #[test]
    fn unknown_asset_type_has_no_rule() {
        assert!(FeeSchedule::default().rule("Private credit").is_none());
    }
}
