use crate::normalize::NormalizedRecord;
use crate::window::ReportingWindow;
use chrono::{DateTime, Utc};
use core_types::TxType;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Memoized global first-transaction dates.
///
/// Built once from the full qualifying history, irrespective of any reporting
/// window, and reused across windowed queries. This is the only
/// history-unbounded computation in the engine.
#[derive(Debug, Clone, Default)]
pub struct CohortIndex {
    first_tx: HashMap<Uuid, DateTime<Utc>>,
}

impl CohortIndex {
    pub fn build(records: &[NormalizedRecord]) -> Self {
        let mut first_tx: HashMap<Uuid, DateTime<Utc>> = HashMap::new();
        for record in records {
            let Some(customer_id) = record.customer_id else {
                continue;
            };
            first_tx
                .entry(customer_id)
                .and_modify(|earliest| {
                    if record.timestamp < *earliest {
                        *earliest = record.timestamp;
                    }
                })
                .or_insert(record.timestamp);
        }
        tracing::debug!(customers = first_tx.len(), "built cohort index");
        Self { first_tx }
    }

    pub fn first_transaction_date(&self, customer_id: Uuid) -> Option<DateTime<Utc>> {
        self.first_tx.get(&customer_id).copied()
    }

    pub fn len(&self) -> usize {
        self.first_tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_tx.is_empty()
    }
}

/// Per-customer deposit behavior inside one reporting window (and optionally
/// one asset-type partition).
#[derive(Debug, Clone)]
pub struct DepositorSummary {
    pub deposit_count: u64,
    pub first_deposit: DateTime<Utc>,
    /// Count of *distinct timestamps* among the customer's in-window
    /// deposits. Deliberately not calendar days: two same-day deposits at
    /// different times count as 2 and label the customer recurring, matching
    /// the upstream ledger's literal behavior.
    pub tx_days: usize,
}

/// The window-scoped new/recurring depositor counts. Disjoint by
/// construction; their union is a subset of the total depositor set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepositorSplit {
    pub new_depositors: u64,
    pub recurring_depositors: u64,
}

/// Summarizes deposit behavior per customer over the given in-window deposit
/// records. The caller chooses the partition by choosing which records to
/// pass (all deposits, or one asset type's).
pub fn depositor_summaries<'a, I>(deposits: I) -> HashMap<Uuid, DepositorSummary>
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    let mut timestamps: HashMap<Uuid, HashSet<DateTime<Utc>>> = HashMap::new();
    let mut summaries: HashMap<Uuid, DepositorSummary> = HashMap::new();

    for record in deposits {
        debug_assert_eq!(record.effective_type, TxType::Deposit);
        let Some(customer_id) = record.customer_id else {
            continue;
        };
        timestamps
            .entry(customer_id)
            .or_default()
            .insert(record.timestamp);
        summaries
            .entry(customer_id)
            .and_modify(|summary| {
                summary.deposit_count += 1;
                if record.timestamp < summary.first_deposit {
                    summary.first_deposit = record.timestamp;
                }
            })
            .or_insert(DepositorSummary {
                deposit_count: 1,
                first_deposit: record.timestamp,
                tx_days: 0,
            });
    }

    for (customer_id, distinct) in timestamps {
        if let Some(summary) = summaries.get_mut(&customer_id) {
            summary.tx_days = distinct.len();
        }
    }
    summaries
}

/// Labels each summarized depositor new or recurring.
///
/// `new`: exactly one distinct deposit timestamp, first deposit inside the
/// window. `recurring`: more than one. A customer can fall in neither at the
/// window boundary; that gap is preserved, not "fixed".
pub fn split_depositors(
    summaries: &HashMap<Uuid, DepositorSummary>,
    window: &ReportingWindow,
) -> DepositorSplit {
    let mut split = DepositorSplit::default();
    for summary in summaries.values() {
        if summary.tx_days > 1 {
            split.recurring_depositors += 1;
        } else if summary.tx_days == 1 && window.contains(summary.first_deposit) {
            split.new_depositors += 1;
        }
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::test_support::ts;
    use rust_decimal_macros::dec;

    fn deposit(customer_id: Uuid, timestamp: DateTime<Utc>) -> NormalizedRecord {
        NormalizedRecord {
            transaction_id: Uuid::new_v4(),
            effective_type: TxType::Deposit,
            customer_id: Some(customer_id),
            asset_type: Some("Ladder Lock".to_string()),
            ghs_amount: dec!(100),
            usd_amount: dec!(8),
            timestamp,
        }
    }

    fn window(start_day: u32, end_day: u32) -> ReportingWindow {
        ReportingWindow::new(
            chrono::NaiveDate::from_ymd_opt(2024, 1, start_day).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, end_day).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn first_transaction_date_is_the_global_minimum() {
        let customer = Uuid::new_v4();
        let records = vec![
            deposit(customer, ts(2024, 1, 5, 10)),
            deposit(customer, ts(2023, 12, 1, 9)),
            deposit(customer, ts(2024, 1, 20, 8)),
        ];
        let index = CohortIndex::build(&records);
        assert_eq!(
            index.first_transaction_date(customer),
            Some(ts(2023, 12, 1, 9))
        );
    }

    #[test]
    fn two_window_deposits_label_recurring_despite_earlier_history() {
        // Customer C: global first transaction 2023-12-01 (outside window),
        // two deposits inside [2024-01-01, 2024-01-31] -> recurring, not new.
        let customer = Uuid::new_v4();
        let in_window = vec![
            deposit(customer, ts(2024, 1, 5, 10)),
            deposit(customer, ts(2024, 1, 20, 14)),
        ];
        let summaries = depositor_summaries(&in_window);
        assert_eq!(summaries[&customer].tx_days, 2);

        let split = split_depositors(&summaries, &window(1, 31));
        assert_eq!(split.recurring_depositors, 1);
        assert_eq!(split.new_depositors, 0);
    }

    #[test]
    fn same_day_deposits_at_distinct_times_count_as_recurring() {
        let customer = Uuid::new_v4();
        let same_day = vec![
            deposit(customer, ts(2024, 1, 5, 9)),
            deposit(customer, ts(2024, 1, 5, 17)),
        ];
        let summaries = depositor_summaries(&same_day);
        assert_eq!(summaries[&customer].tx_days, 2);

        let split = split_depositors(&summaries, &window(1, 31));
        assert_eq!(split.recurring_depositors, 1);
        assert_eq!(split.new_depositors, 0);
    }

    #[test]
    fn single_deposit_inside_window_is_new() {
        let customer = Uuid::new_v4();
        let summaries = depositor_summaries(&vec![deposit(customer, ts(2024, 1, 5, 9))]);
        let split = split_depositors(&summaries, &window(1, 31));
        assert_eq!(split.new_depositors, 1);
        assert_eq!(split.recurring_depositors, 0);
    }

    #[test]
    fn new_and_recurring_sets_are_disjoint() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let records = vec![
            deposit(a, ts(2024, 1, 5, 9)),
            deposit(b, ts(2024, 1, 6, 9)),
            deposit(b, ts(2024, 1, 7, 9)),
        ];
        let summaries = depositor_summaries(&records);
        let split = split_depositors(&summaries, &window(1, 31));
        let total_depositors = summaries.len() as u64;
        assert_eq!(split.new_depositors + split.recurring_depositors, 2);
        assert!(split.new_depositors + split.recurring_depositors <= total_depositors);
    }
}
