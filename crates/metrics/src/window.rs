use crate::error::MetricsError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A validated, inclusive reporting window.
///
/// Both bounds are clamped into `[service_launch_date, today]`; the launch
/// date is the fixed "all time" anchor. Window comparison is by calendar date,
/// so a transaction at any time on the end date is inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportingWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportingWindow {
    /// Builds a window from caller-supplied dates, rejecting `end < start`
    /// before any query runs and clamping both bounds to the allowed range.
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        launch_date: NaiveDate,
    ) -> Result<Self, MetricsError> {
        if end < start {
            return Err(MetricsError::InvalidWindow { start, end });
        }
        let today = Utc::now().date_naive();
        let start = start.clamp(launch_date, today);
        let end = end.clamp(launch_date, today);
        Ok(Self { start, end })
    }

    /// The full history window, `[launch_date, today]`.
    pub fn all_time(launch_date: NaiveDate) -> Self {
        Self {
            start: launch_date,
            end: Utc::now().date_naive(),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.contains_date(timestamp.date_naive())
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn launch() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
    }

    #[test]
    fn rejects_inverted_window() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            ReportingWindow::new(start, end, launch()),
            Err(MetricsError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn clamps_to_launch_date() {
        let start = NaiveDate::from_ymd_opt(2019, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let window = ReportingWindow::new(start, end, launch()).unwrap();
        assert_eq!(window.start(), launch());
        assert_eq!(window.end(), end);
    }

    #[test]
    fn clamps_future_end_to_today() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2999, 1, 1).unwrap();
        let window = ReportingWindow::new(start, end, launch()).unwrap();
        assert_eq!(window.end(), Utc::now().date_naive());
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let window = ReportingWindow::new(start, end, launch()).unwrap();

        let late_on_end_date = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        assert!(window.contains(late_on_end_date));

        let day_after = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert!(!window.contains(day_after));
    }
}
