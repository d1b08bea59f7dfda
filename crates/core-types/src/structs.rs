use crate::enums::{ActivitySource, KycStatus, TxStatus, TxType};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// A single immutable ledger transaction.
///
/// Carries at most one of the two mutually exclusive product links
/// (`plan_id` / `investment_plan_id`); resolving the link into a customer and
/// asset-type label is the normalizer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    /// The raw recorded type, before the maintenance-fee override.
    pub tx_type: TxType,
    pub status: TxStatus,
    /// Payment provider identifier. Transactions from the excluded provider
    /// never participate in any metric.
    pub provider: String,
    /// Amount in the local currency (GHS).
    pub ghs_amount: Decimal,
    /// Amount in the secondary currency (USD).
    pub usd_amount: Decimal,
    pub exchange_rate: Decimal,
    /// Free-form metadata blob; scanned for the maintenance-fee marker.
    pub metadata: Option<JsonValue>,
    pub timestamp: DateTime<Utc>,
    pub plan_id: Option<Uuid>,
    pub investment_plan_id: Option<Uuid>,
}

/// A customer record, externally owned and immutable from the engine's view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Restricted customers are excluded from every metric.
    pub restricted: bool,
    pub kyc_status: KycStatus,
    /// Historical rows record KYC completion only as a metadata marker.
    pub metadata: Option<JsonValue>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub employment_status: Option<String>,
    /// What the customer signed up to use the product for.
    pub use_option: Option<String>,
    pub created_at: DateTime<Utc>,
    /// When the customer's record last changed; anchors the KYC window filter.
    pub updated_at: DateTime<Utc>,
    pub most_recent_activity: Option<DateTime<Utc>>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A simple savings plan. Its `plan_option` doubles as the asset-type label
/// for transactions linked through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub plan_option: String,
    pub created_at: DateTime<Utc>,
}

/// An investment plan linking a customer to an asset with a maturity date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPlan {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub asset_id: Option<Uuid>,
    pub plan_option: String,
    pub maturity_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// An investable asset. Its `name` is the asset-type label for transactions
/// linked through an investment plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    pub maturity_date: Option<NaiveDate>,
}

/// A non-ledger product interaction (budgeting usage, manually recorded
/// transaction, plan creation). Consumed only by the segmentation query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub customer_id: Uuid,
    pub source: ActivitySource,
    pub occurred_at: DateTime<Utc>,
}
