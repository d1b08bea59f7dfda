use crate::normalize::NormalizedRecord;
use crate::report::TrendPoint;
use crate::window::ReportingWindow;
use chrono::{Datelike, Duration, NaiveDate};
use core_types::Granularity;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Buckets in-window transaction volume (local currency) by period and
/// effective type, ascending by period.
pub fn trend_points(
    records: &[NormalizedRecord],
    window: &ReportingWindow,
    granularity: Granularity,
) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<(NaiveDate, &'static str), Decimal> = BTreeMap::new();
    for record in records {
        if !window.contains(record.timestamp) {
            continue;
        }
        let period = bucket_start(record.timestamp.date_naive(), granularity);
        *buckets
            .entry((period, record.effective_type.as_str()))
            .or_insert(Decimal::ZERO) += record.ghs_amount;
    }

    buckets
        .into_iter()
        .map(|((period, type_str), total_amount)| TrendPoint {
            period,
            effective_type: core_types::TxType::from_raw(type_str),
            total_amount,
        })
        .collect()
}

/// Truncates a date to the start of its bucket: the day itself, the ISO week
/// (Monday), or the first of the month.
pub fn bucket_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Day => date,
        Granularity::Week => {
            date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
        }
        Granularity::Month => date.with_day(1).unwrap_or(date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::test_support::ts;
    use core_types::TxType;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn record(effective_type: TxType, ghs: Decimal, month: u32, day: u32) -> NormalizedRecord {
        NormalizedRecord {
            transaction_id: Uuid::new_v4(),
            effective_type,
            customer_id: Some(Uuid::new_v4()),
            asset_type: None,
            ghs_amount: ghs,
            usd_amount: Decimal::ZERO,
            timestamp: ts(2024, month, day, 10),
        }
    }

    fn window() -> ReportingWindow {
        ReportingWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn week_buckets_truncate_to_iso_monday() {
        // 2024-01-10 is a Wednesday; its ISO week starts Monday 2024-01-08.
        assert_eq!(
            bucket_start(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), Granularity::Week),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
        );
        // A Monday is its own bucket start.
        assert_eq!(
            bucket_start(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(), Granularity::Week),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
        );
    }

    #[test]
    fn month_buckets_accumulate_by_type_in_ascending_order() {
        let records = vec![
            record(TxType::Deposit, dec!(100), 2, 10),
            record(TxType::Deposit, dec!(50), 2, 20),
            record(TxType::Withdrawal, dec!(30), 2, 15),
            record(TxType::Deposit, dec!(200), 1, 5),
        ];

        let points = trend_points(&records, &window(), Granularity::Month);
        assert_eq!(points.len(), 3);

        assert_eq!(points[0].period, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(points[0].effective_type, TxType::Deposit);
        assert_eq!(points[0].total_amount, dec!(200));

        assert_eq!(points[1].period, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(points[1].effective_type, TxType::Deposit);
        assert_eq!(points[1].total_amount, dec!(150));

        assert_eq!(points[2].effective_type, TxType::Withdrawal);
        assert_eq!(points[2].total_amount, dec!(30));
    }

    #[test]
    fn day_buckets_keep_each_date_separate() {
        let records = vec![
            record(TxType::Deposit, dec!(10), 1, 5),
            record(TxType::Deposit, dec!(20), 1, 6),
        ];
        let points = trend_points(&records, &window(), Granularity::Day);
        assert_eq!(points.len(), 2);
        assert!(points[0].period < points[1].period);
    }
}
