//! # Ladder Core Types
//!
//! The shared vocabulary of the system: the ledger entities and the enums
//! that classify them. Every other crate speaks in these types.
//!
//! ## Architectural Principles
//!
//! - **No behavior, no I/O:** this crate defines data, conversions from the
//!   ledger's raw string representations, and nothing else.
//! - **Enums over strings:** transaction types, statuses, KYC states and
//!   activity sources are parsed once at the database boundary; unrecognized
//!   raw values degrade to a defined variant instead of failing ingestion.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ActivitySource, Granularity, KycStatus, TxStatus, TxType};
pub use error::CoreError;
pub use structs::{ActivityEvent, Asset, Customer, InvestmentPlan, Plan, Transaction};
