use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown granularity '{0}', expected day, week or month")]
    UnknownGranularity(String),
}
