//! # Ladder Metrics Engine
//!
//! This crate turns an immutable ledger snapshot into windowed financial KPIs:
//! deposit/withdrawal volumes, net asset position (AUM), customer cohorts,
//! per-product revenue estimates and activity trends.
//!
//! ## Architectural Principles
//!
//! - **Pure logic crate:** no I/O and no knowledge of where the snapshot came
//!   from. It depends only on `core-types` and `configuration`.
//! - **Stateless calculation:** the `MetricsEngine` takes normalized records
//!   and a reporting window and produces report structs. Identical inputs
//!   always produce identical outputs, which makes every query cacheable.
//! - **Defined degenerate cases:** zero-count averages, empty windows and
//!   unknown fee-table entries resolve to zero by contract; they are never
//!   errors and never division faults.
//!
//! ## Public API
//!
//! - `LedgerSnapshot`: the immutable entity snapshot the engine reads.
//! - `NormalizedRecord` / `normalize`: one uniform shape per transaction.
//! - `MetricsEngine`: grouped sums, counts, averages and AUM.
//! - `CohortIndex`: memoized global first-transaction dates.
//! - `ReportingWindow`: validated, launch-clamped date window.
//! - Report structs: `GeneralMetrics`, `AssetMetrics`, `TrendPoint`,
//!   `UserCounts`, `UsersByAssetType`, `UserInsight`.

// Declare the modules that constitute this crate.
pub mod activity;
pub mod aggregate;
pub mod classify;
pub mod cohort;
pub mod error;
pub mod normalize;
pub mod report;
pub mod revenue;
pub mod snapshot;
pub mod trend;
pub mod window;

// Re-export the key components to create a clean, public-facing API.
pub use aggregate::MetricsEngine;
pub use cohort::{CohortIndex, DepositorSplit, DepositorSummary};
pub use error::MetricsError;
pub use normalize::{NormalizedRecord, TransactionSource};
pub use report::{
    AssetMetrics, GeneralMetrics, TrendPoint, UserCounts, UserInsight, UsersByAssetType,
};
pub use snapshot::LedgerSnapshot;
pub use window::ReportingWindow;
