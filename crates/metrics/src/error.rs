use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Invalid reporting window: end date {end} precedes start date {start}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
}
