use chrono::{DateTime, NaiveDate, Utc};
use core_types::{KycStatus, TxType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform-wide financial metrics for one reporting window.
///
/// This struct is the final output of the aggregation engine for the general
/// query and the data transfer object the presentation layer consumes. All
/// amounts are exact decimals; display rounding is the consumer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralMetrics {
    /// Number of distinct asset-type labels with transactions in the window.
    pub asset_type_count: u64,
    pub deposit_count: u64,
    pub deposit_value_ghs: Decimal,
    pub deposit_value_usd: Decimal,
    pub withdrawal_count: u64,
    pub withdrawal_value_ghs: Decimal,
    pub withdrawal_value_usd: Decimal,
    /// Net position: deposit sum minus withdrawal sum, absent withdrawals
    /// treated as zero.
    pub aum_ghs: Decimal,
    pub aum_usd: Decimal,
    pub total_depositors: u64,
    pub total_withdrawers: u64,
    pub recurring_depositors: u64,
    pub new_depositors: u64,
    pub avg_deposit_value_ghs: Decimal,
    pub avg_deposit_value_usd: Decimal,
    pub avg_withdrawal_value_ghs: Decimal,
    pub avg_withdrawal_value_usd: Decimal,
}

impl GeneralMetrics {
    /// A zeroed report: the defined result for a window with no qualifying
    /// transactions.
    pub fn new() -> Self {
        Self {
            asset_type_count: 0,
            deposit_count: 0,
            deposit_value_ghs: Decimal::ZERO,
            deposit_value_usd: Decimal::ZERO,
            withdrawal_count: 0,
            withdrawal_value_ghs: Decimal::ZERO,
            withdrawal_value_usd: Decimal::ZERO,
            aum_ghs: Decimal::ZERO,
            aum_usd: Decimal::ZERO,
            total_depositors: 0,
            total_withdrawers: 0,
            recurring_depositors: 0,
            new_depositors: 0,
            avg_deposit_value_ghs: Decimal::ZERO,
            avg_deposit_value_usd: Decimal::ZERO,
            avg_withdrawal_value_ghs: Decimal::ZERO,
            avg_withdrawal_value_usd: Decimal::ZERO,
        }
    }
}

impl Default for GeneralMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// One asset-type partition of the window metrics, plus the revenue figures
/// only the per-asset view carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMetrics {
    pub asset_type: String,
    pub deposit_count: u64,
    pub deposit_value_ghs: Decimal,
    pub deposit_value_usd: Decimal,
    pub withdrawal_count: u64,
    pub withdrawal_value_ghs: Decimal,
    pub withdrawal_value_usd: Decimal,
    pub aum_ghs: Decimal,
    pub aum_usd: Decimal,
    pub total_depositors: u64,
    pub total_withdrawers: u64,
    pub recurring_depositors: u64,
    pub new_depositors: u64,
    pub avg_deposit_value_ghs: Decimal,
    pub avg_deposit_value_usd: Decimal,
    pub avg_withdrawal_value_ghs: Decimal,
    pub avg_withdrawal_value_usd: Decimal,
    /// Fee-schedule estimate over the window's aggregated volumes.
    pub estimated_revenue: Decimal,
    pub maintenance_fees_ghs: Decimal,
    pub early_withdrawal_fees_usd: Decimal,
}

/// One bucket of the transaction volume trend, in the local currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Start date of the day/week/month bucket.
    pub period: NaiveDate,
    pub effective_type: TxType,
    pub total_amount: Decimal,
}

/// Window-filtered registration and KYC counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCounts {
    pub registered_users: u64,
    pub kyc_users: u64,
}

/// Distinct qualifying customers per asset-type label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersByAssetType {
    pub asset_type: String,
    pub total_users: u64,
}

/// Per-customer demographics and activity flags for customers registered in
/// the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInsight {
    pub customer_id: Uuid,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub kyc_status: KycStatus,
    pub use_option: Option<String>,
    pub employment_status: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Any qualifying transaction or product interaction in the window.
    pub is_active: bool,
    /// `most_recent_activity` falls inside the window.
    pub is_recent: bool,
}
