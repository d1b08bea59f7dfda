use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] metrics::MetricsError),
}
