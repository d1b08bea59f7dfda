use serde::{Deserialize, Serialize};

/// The classification of a ledger transaction.
///
/// The raw recorded type and the effective type share this enum; the
/// maintenance-fee override in the classifier maps a raw type to
/// `MaintenanceFee` when the metadata marker is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxType {
    Deposit,
    Withdrawal,
    MaintenanceFee,
    EarlyWithdrawal,
    Other,
}

impl TxType {
    /// Parses the raw string stored in the ledger. Unrecognized values map to
    /// `Other` so a new upstream type never breaks ingestion.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "deposit" => TxType::Deposit,
            "withdrawal" => TxType::Withdrawal,
            "maintenance_fee" => TxType::MaintenanceFee,
            "early_withdrawal" => TxType::EarlyWithdrawal,
            _ => TxType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Deposit => "deposit",
            TxType::Withdrawal => "withdrawal",
            TxType::MaintenanceFee => "maintenance_fee",
            TxType::EarlyWithdrawal => "early_withdrawal",
            TxType::Other => "other",
        }
    }
}

/// Settlement status of a transaction. Only `Success` rows participate in any
/// metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    Success,
    Pending,
    Failed,
}

impl TxStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "success" => TxStatus::Success,
            "pending" => TxStatus::Pending,
            _ => TxStatus::Failed,
        }
    }
}

/// Structured KYC verification state on a customer record.
///
/// Historical rows predate this column; for those the engine falls back to a
/// metadata marker scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    Unverified,
    Pending,
    Verified,
}

impl KycStatus {
    pub fn from_raw(raw: &str) -> Self {
        // "kyc_verifeid" is a known historical typo in the customer table.
        match raw {
            "kyc_verified" | "kyc_verifeid" | "verified" => KycStatus::Verified,
            "kyc_pending" | "pending" => KycStatus::Pending,
            _ => KycStatus::Unverified,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, KycStatus::Verified)
    }
}

/// Where a non-ledger activity event originated. Feeds the "active customer"
/// union of the segmentation query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySource {
    Budgeting,
    ManualTransaction,
    PlanCreated,
    InvestmentPlanCreated,
}

impl ActivitySource {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "budgeting" => Some(ActivitySource::Budgeting),
            "manual_transaction" => Some(ActivitySource::ManualTransaction),
            "plan_created" => Some(ActivitySource::PlanCreated),
            "investment_plan_created" => Some(ActivitySource::InvestmentPlanCreated),
            _ => None,
        }
    }
}

/// Bucket size for the transaction trend query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            other => Err(crate::error::CoreError::UnknownGranularity(
                other.to_string(),
            )),
        }
    }
}
