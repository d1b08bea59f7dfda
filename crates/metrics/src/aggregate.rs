use crate::cohort;
use crate::normalize::NormalizedRecord;
use crate::report::{AssetMetrics, GeneralMetrics};
use crate::revenue;
use crate::window::ReportingWindow;
use configuration::FeeSchedule;
use core_types::TxType;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// A stateless calculator for grouped sums, counts and averages over
/// normalized, classified, qualifying records.
#[derive(Debug, Default)]
pub struct MetricsEngine {}

/// Running totals for one group (the whole window, or one asset type).
#[derive(Debug, Default)]
struct GroupTotals {
    deposit_count: u64,
    deposit_ghs: Decimal,
    deposit_usd: Decimal,
    depositors: HashSet<Uuid>,
    withdrawal_count: u64,
    withdrawal_ghs: Decimal,
    withdrawal_usd: Decimal,
    withdrawers: HashSet<Uuid>,
    maintenance_ghs: Decimal,
    early_withdrawal_usd: Decimal,
}

impl GroupTotals {
    fn accumulate(&mut self, record: &NormalizedRecord) {
        match record.effective_type {
            TxType::Deposit => {
                self.deposit_count += 1;
                self.deposit_ghs += record.ghs_amount;
                self.deposit_usd += record.usd_amount;
                if let Some(customer_id) = record.customer_id {
                    self.depositors.insert(customer_id);
                }
            }
            TxType::Withdrawal => {
                self.withdrawal_count += 1;
                self.withdrawal_ghs += record.ghs_amount;
                self.withdrawal_usd += record.usd_amount;
                if let Some(customer_id) = record.customer_id {
                    self.withdrawers.insert(customer_id);
                }
            }
            TxType::MaintenanceFee => {
                self.maintenance_ghs += record.ghs_amount;
            }
            TxType::EarlyWithdrawal => {
                self.early_withdrawal_usd += record.usd_amount;
            }
            TxType::Other => {}
        }
    }
}

/// Sum / count, defined as zero when the count is zero.
fn safe_avg(sum: Decimal, count: u64) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        sum / Decimal::from(count)
    }
}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the unpartitioned window metrics. Records without an
    /// asset-type label still contribute here; only the distinct-label count
    /// ignores them.
    pub fn general_metrics(
        &self,
        records: &[NormalizedRecord],
        window: &ReportingWindow,
    ) -> GeneralMetrics {
        let in_window: Vec<&NormalizedRecord> = records
            .iter()
            .filter(|r| window.contains(r.timestamp))
            .collect();

        if in_window.is_empty() {
            return GeneralMetrics::new();
        }

        let mut totals = GroupTotals::default();
        for record in &in_window {
            totals.accumulate(record);
        }

        let asset_type_count = in_window
            .iter()
            .filter_map(|r| r.asset_type.as_deref())
            .collect::<HashSet<_>>()
            .len() as u64;

        let summaries = cohort::depositor_summaries(
            in_window
                .iter()
                .copied()
                .filter(|r| r.effective_type == TxType::Deposit),
        );
        let split = cohort::split_depositors(&summaries, window);

        GeneralMetrics {
            asset_type_count,
            deposit_count: totals.deposit_count,
            deposit_value_ghs: totals.deposit_ghs,
            deposit_value_usd: totals.deposit_usd,
            withdrawal_count: totals.withdrawal_count,
            withdrawal_value_ghs: totals.withdrawal_ghs,
            withdrawal_value_usd: totals.withdrawal_usd,
            aum_ghs: totals.deposit_ghs - totals.withdrawal_ghs,
            aum_usd: totals.deposit_usd - totals.withdrawal_usd,
            total_depositors: totals.depositors.len() as u64,
            total_withdrawers: totals.withdrawers.len() as u64,
            recurring_depositors: split.recurring_depositors,
            new_depositors: split.new_depositors,
            avg_deposit_value_ghs: safe_avg(totals.deposit_ghs, totals.deposit_count),
            avg_deposit_value_usd: safe_avg(totals.deposit_usd, totals.deposit_count),
            avg_withdrawal_value_ghs: safe_avg(totals.withdrawal_ghs, totals.withdrawal_count),
            avg_withdrawal_value_usd: safe_avg(totals.withdrawal_usd, totals.withdrawal_count),
        }
    }

    /// Computes one metrics row per asset-type label, with revenue estimates
    /// layered on top of the completed aggregation.
    ///
    /// Rows without a label are excluded from this partitioned view (they
    /// still count in `general_metrics`). Output is sorted descending by USD
    /// deposit sum, groups with no deposits last.
    pub fn asset_metrics(
        &self,
        records: &[NormalizedRecord],
        window: &ReportingWindow,
        schedule: &FeeSchedule,
        early_withdrawal_fee_rate: Decimal,
    ) -> Vec<AssetMetrics> {
        // BTreeMap keeps group iteration deterministic before the final sort.
        let mut groups: BTreeMap<&str, Vec<&NormalizedRecord>> = BTreeMap::new();
        for record in records {
            if !window.contains(record.timestamp) {
                continue;
            }
            if let Some(asset_type) = record.asset_type.as_deref() {
                groups.entry(asset_type).or_default().push(record);
            }
        }

        let mut rows: Vec<AssetMetrics> = groups
            .into_iter()
            .map(|(asset_type, group)| {
                let mut totals = GroupTotals::default();
                for record in &group {
                    totals.accumulate(record);
                }

                let summaries = cohort::depositor_summaries(
                    group
                        .iter()
                        .copied()
                        .filter(|r| r.effective_type == TxType::Deposit),
                );
                let split = cohort::split_depositors(&summaries, window);

                let estimated_revenue = revenue::estimated_revenue(
                    schedule,
                    asset_type,
                    totals.deposit_ghs,
                    totals.deposit_usd,
                    totals.withdrawal_ghs,
                );

                AssetMetrics {
                    asset_type: asset_type.to_string(),
                    deposit_count: totals.deposit_count,
                    deposit_value_ghs: totals.deposit_ghs,
                    deposit_value_usd: totals.deposit_usd,
                    withdrawal_count: totals.withdrawal_count,
                    withdrawal_value_ghs: totals.withdrawal_ghs,
                    withdrawal_value_usd: totals.withdrawal_usd,
                    aum_ghs: totals.deposit_ghs - totals.withdrawal_ghs,
                    aum_usd: totals.deposit_usd - totals.withdrawal_usd,
                    total_depositors: totals.depositors.len() as u64,
                    total_withdrawers: totals.withdrawers.len() as u64,
                    recurring_depositors: split.recurring_depositors,
                    new_depositors: split.new_depositors,
                    avg_deposit_value_ghs: safe_avg(totals.deposit_ghs, totals.deposit_count),
                    avg_deposit_value_usd: safe_avg(totals.deposit_usd, totals.deposit_count),
                    avg_withdrawal_value_ghs: safe_avg(
                        totals.withdrawal_ghs,
                        totals.withdrawal_count,
                    ),
                    avg_withdrawal_value_usd: safe_avg(
                        totals.withdrawal_usd,
                        totals.withdrawal_count,
                    ),
                    estimated_revenue,
                    maintenance_fees_ghs: totals.maintenance_ghs,
                    early_withdrawal_fees_usd: revenue::early_withdrawal_fees(
                        totals.early_withdrawal_usd,
                        early_withdrawal_fee_rate,
                    ),
                }
            })
            .collect();

        // Descending by USD deposit sum; a group with no deposits has no sum
        // and sorts last, ties broken by label for a stable order.
        let sort_key = |m: &AssetMetrics| (m.deposit_count > 0).then_some(m.deposit_value_usd);
        rows.sort_by(|a, b| match (sort_key(a), sort_key(b)) {
            (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.asset_type.cmp(&b.asset_type)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.asset_type.cmp(&b.asset_type),
        });
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::test_support::ts;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn record(
        effective_type: TxType,
        customer: Uuid,
        asset_type: Option<&str>,
        ghs: Decimal,
        usd: Decimal,
        day: u32,
        hour: u32,
    ) -> NormalizedRecord {
        NormalizedRecord {
            transaction_id: Uuid::new_v4(),
            effective_type,
            customer_id: Some(customer),
            asset_type: asset_type.map(str::to_string),
            ghs_amount: ghs,
            usd_amount: usd,
            timestamp: ts(2024, 1, day, hour),
        }
    }

    fn january() -> ReportingWindow {
        ReportingWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn empty_window_yields_all_zeros_without_faulting() {
        let engine = MetricsEngine::new();
        let metrics = engine.general_metrics(&[], &january());
        assert_eq!(metrics, GeneralMetrics::new());
        assert_eq!(metrics.avg_deposit_value_ghs, Decimal::ZERO);
    }

    #[test]
    fn aum_is_deposits_minus_withdrawals_per_currency() {
        let engine = MetricsEngine::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let records = vec![
            record(TxType::Deposit, a, Some("Ladder Lock"), dec!(1000), dec!(80), 5, 9),
            record(TxType::Deposit, b, Some("goal savings"), dec!(500), dec!(40), 6, 9),
            record(TxType::Withdrawal, a, Some("Ladder Lock"), dec!(300), dec!(24), 7, 9),
        ];

        let metrics = engine.general_metrics(&records, &january());
        assert_eq!(metrics.aum_ghs, dec!(1200));
        assert_eq!(metrics.aum_usd, dec!(96));
        assert_eq!(
            metrics.aum_ghs,
            metrics.deposit_value_ghs - metrics.withdrawal_value_ghs
        );
        assert_eq!(metrics.total_depositors, 2);
        assert_eq!(metrics.total_withdrawers, 1);
        assert_eq!(metrics.asset_type_count, 2);
    }

    #[test]
    fn deposits_with_no_withdrawals_treat_withdrawal_sum_as_zero() {
        let engine = MetricsEngine::new();
        let records = vec![record(
            TxType::Deposit,
            Uuid::new_v4(),
            Some("ETFs"),
            dec!(250),
            dec!(20),
            10,
            9,
        )];
        let metrics = engine.general_metrics(&records, &january());
        assert_eq!(metrics.aum_ghs, dec!(250));
        assert_eq!(metrics.withdrawal_count, 0);
        assert_eq!(metrics.avg_withdrawal_value_ghs, Decimal::ZERO);
    }

    #[test]
    fn maintenance_fees_stay_out_of_withdrawal_totals() {
        let engine = MetricsEngine::new();
        let customer = Uuid::new_v4();
        // A reclassified withdrawal: effective type is MaintenanceFee.
        let records = vec![
            record(TxType::Deposit, customer, Some("Ladder Lock"), dec!(1000), dec!(80), 5, 9),
            record(TxType::MaintenanceFee, customer, Some("Ladder Lock"), dec!(5), dec!(0.4), 6, 9),
        ];

        let metrics = engine.general_metrics(&records, &january());
        assert_eq!(metrics.withdrawal_count, 0);
        assert_eq!(metrics.withdrawal_value_ghs, Decimal::ZERO);

        let rows = engine.asset_metrics(&records, &january(), &FeeSchedule::default(), dec!(0.025));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].maintenance_fees_ghs, dec!(5));
    }

    #[test]
    fn averages_divide_sums_by_counts() {
        let engine = MetricsEngine::new();
        let customer = Uuid::new_v4();
        let records = vec![
            record(TxType::Deposit, customer, None, dec!(100), dec!(8), 5, 9),
            record(TxType::Deposit, customer, None, dec!(300), dec!(24), 6, 9),
        ];
        let metrics = engine.general_metrics(&records, &january());
        assert_eq!(metrics.avg_deposit_value_ghs, dec!(200));
        assert_eq!(metrics.avg_deposit_value_usd, dec!(16));
    }

    #[test]
    fn unlabeled_records_count_in_totals_but_not_in_asset_rows() {
        let engine = MetricsEngine::new();
        let customer = Uuid::new_v4();
        let records = vec![
            record(TxType::Deposit, customer, Some("Equity"), dec!(100), dec!(8), 5, 9),
            record(TxType::Deposit, customer, None, dec!(900), dec!(72), 6, 9),
        ];

        let metrics = engine.general_metrics(&records, &january());
        assert_eq!(metrics.deposit_value_ghs, dec!(1000));
        assert_eq!(metrics.asset_type_count, 1);

        let rows = engine.asset_metrics(&records, &january(), &FeeSchedule::default(), dec!(0.025));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].asset_type, "Equity");
        assert_eq!(rows[0].deposit_value_ghs, dec!(100));
    }

    #[test]
    fn asset_rows_sort_descending_by_usd_deposits_with_depositless_last() {
        let engine = MetricsEngine::new();
        let customer = Uuid::new_v4();
        let records = vec![
            record(TxType::Deposit, customer, Some("goal savings"), dec!(100), dec!(8), 5, 9),
            record(TxType::Deposit, customer, Some("Ladder Lock"), dec!(5000), dec!(400), 5, 10),
            // Withdrawal-only group: no deposit sum, sorts last.
            record(TxType::Withdrawal, customer, Some("Arbitrage"), dec!(50), dec!(4), 6, 9),
        ];

        let rows = engine.asset_metrics(&records, &january(), &FeeSchedule::default(), dec!(0.025));
        let order: Vec<&str> = rows.iter().map(|r| r.asset_type.as_str()).collect();
        assert_eq!(order, vec!["Ladder Lock", "goal savings", "Arbitrage"]);
    }

    #[test]
    fn window_filter_excludes_out_of_range_records() {
        let engine = MetricsEngine::new();
        let customer = Uuid::new_v4();
        let mut outside = record(TxType::Deposit, customer, None, dec!(999), dec!(80), 5, 9);
        outside.timestamp = ts(2023, 12, 31, 23);
        let inside = record(TxType::Deposit, customer, None, dec!(100), dec!(8), 1, 0);

        let metrics = engine.general_metrics(&[outside, inside], &january());
        assert_eq!(metrics.deposit_count, 1);
        assert_eq!(metrics.deposit_value_ghs, dec!(100));
    }

    #[test]
    fn identical_queries_over_the_same_records_are_idempotent() {
        let engine = MetricsEngine::new();
        let customer = Uuid::new_v4();
        let records = vec![
            record(TxType::Deposit, customer, Some("ETFs"), dec!(750), dec!(60), 5, 9),
            record(TxType::Withdrawal, customer, Some("ETFs"), dec!(250), dec!(20), 6, 9),
        ];
        let first = engine.general_metrics(&records, &january());
        let second = engine.general_metrics(&records, &january());
        assert_eq!(first, second);
    }
}
