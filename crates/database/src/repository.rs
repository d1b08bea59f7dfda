use crate::DbError;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{
    ActivityEvent, ActivitySource, Asset, Customer, InvestmentPlan, KycStatus, Plan, Transaction,
    TxStatus, TxType,
};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use uuid::Uuid;

/// The `LedgerRepository` provides a high-level, application-specific
/// interface to the ledger database. It encapsulates all SQL queries and the
/// raw-row-to-entity mapping; nothing above this layer sees a table name.
///
/// Queries are runtime-checked (`query_as::<_, Row>`), so the crate compiles
/// without a live database.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

/// Every entity table fetched in one pass; the engine assembles a snapshot
/// from this.
#[derive(Debug, Clone, Default)]
pub struct LedgerBundle {
    pub transactions: Vec<Transaction>,
    pub customers: Vec<Customer>,
    pub plans: Vec<Plan>,
    pub investment_plans: Vec<InvestmentPlan>,
    pub assets: Vec<Asset>,
    pub activity_events: Vec<ActivityEvent>,
}

/// A raw row from the `transactions` table. The type and status columns are
/// free text in the ledger; mapping them to enums happens here, once.
#[derive(Debug, Clone, FromRow)]
struct TransactionRow {
    id: Uuid,
    transaction_type: String,
    status: String,
    provider: Option<String>,
    amount: Decimal,
    usd_value: Option<Decimal>,
    exchange_rate: Option<Decimal>,
    metadata: Option<JsonValue>,
    created_at: DateTime<Utc>,
    plan_id: Option<Uuid>,
    investment_plan_id: Option<Uuid>,
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Transaction {
            id: row.id,
            tx_type: TxType::from_raw(&row.transaction_type),
            status: TxStatus::from_raw(&row.status),
            provider: row.provider.unwrap_or_default(),
            ghs_amount: row.amount,
            usd_amount: row.usd_value.unwrap_or(Decimal::ZERO),
            exchange_rate: row.exchange_rate.unwrap_or(Decimal::ZERO),
            metadata: row.metadata,
            timestamp: row.created_at,
            plan_id: row.plan_id,
            investment_plan_id: row.investment_plan_id,
        }
    }
}

/// A raw row from the `users` table.
#[derive(Debug, Clone, FromRow)]
struct CustomerRow {
    id: Uuid,
    first_name: Option<String>,
    last_name: Option<String>,
    restricted: Option<String>,
    kyc_status: Option<String>,
    metadata: Option<JsonValue>,
    gender: Option<String>,
    country: Option<String>,
    date_of_birth: Option<NaiveDate>,
    employment_status: Option<String>,
    use_option: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    most_recent_activity: Option<DateTime<Utc>>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        // The column stores 'true'/'false' text. Only an explicit 'false'
        // admits the customer; NULL and anything else stays restricted, which
        // is what the ledger's own reporting queries do.
        let restricted = !row
            .restricted
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("false"));
        Customer {
            id: row.id,
            first_name: row.first_name.unwrap_or_default(),
            last_name: row.last_name.unwrap_or_default(),
            restricted,
            kyc_status: row
                .kyc_status
                .as_deref()
                .map(KycStatus::from_raw)
                .unwrap_or(KycStatus::Unverified),
            metadata: row.metadata,
            gender: row.gender,
            country: row.country,
            date_of_birth: row.date_of_birth,
            employment_status: row.employment_status,
            use_option: row.use_option,
            created_at: row.created_at,
            updated_at: row.updated_at,
            most_recent_activity: row.most_recent_activity,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct PlanRow {
    id: Uuid,
    user_id: Uuid,
    plan_option: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<PlanRow> for Plan {
    fn from(row: PlanRow) -> Self {
        Plan {
            id: row.id,
            customer_id: row.user_id,
            plan_option: row.plan_option.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct InvestmentPlanRow {
    id: Uuid,
    user_id: Uuid,
    asset_id: Option<Uuid>,
    plan_option: Option<String>,
    maturity_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl From<InvestmentPlanRow> for InvestmentPlan {
    fn from(row: InvestmentPlanRow) -> Self {
        InvestmentPlan {
            id: row.id,
            customer_id: row.user_id,
            asset_id: row.asset_id,
            plan_option: row.plan_option.unwrap_or_default(),
            maturity_date: row.maturity_date,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct AssetRow {
    id: Uuid,
    name: String,
    maturity_date: Option<NaiveDate>,
}

impl From<AssetRow> for Asset {
    fn from(row: AssetRow) -> Self {
        Asset {
            id: row.id,
            name: row.name,
            maturity_date: row.maturity_date,
        }
    }
}

/// One row of the activity union: a product interaction outside the main
/// ledger, labeled with the table it came from.
#[derive(Debug, Clone, FromRow)]
struct ActivityRow {
    user_id: Uuid,
    source: String,
    created_at: DateTime<Utc>,
}

impl LedgerRepository {
    /// Creates a new `LedgerRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches the full transaction ledger, oldest first.
    pub async fn fetch_transactions(&self) -> Result<Vec<Transaction>, DbError> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT
                id, transaction_type, status, provider, amount, usd_value,
                exchange_rate, metadata, created_at, plan_id, investment_plan_id
            FROM transactions
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    pub async fn fetch_customers(&self) -> Result<Vec<Customer>, DbError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT
                id, first_name, last_name, restricted, kyc_status, metadata,
                gender, country, date_of_birth, employment_status, use_option,
                created_at, updated_at, most_recent_activity
            FROM users
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    pub async fn fetch_plans(&self) -> Result<Vec<Plan>, DbError> {
        let rows = sqlx::query_as::<_, PlanRow>(
            "SELECT id, user_id, plan_option, created_at FROM plans",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Plan::from).collect())
    }

    pub async fn fetch_investment_plans(&self) -> Result<Vec<InvestmentPlan>, DbError> {
        let rows = sqlx::query_as::<_, InvestmentPlanRow>(
            r#"
            SELECT id, user_id, asset_id, plan_option, maturity_date, created_at
            FROM investment_plans
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(InvestmentPlan::from).collect())
    }

    pub async fn fetch_assets(&self) -> Result<Vec<Asset>, DbError> {
        let rows =
            sqlx::query_as::<_, AssetRow>("SELECT id, name, maturity_date FROM assets")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Asset::from).collect())
    }

    /// Fetches the activity union: every non-ledger product interaction, from
    /// all four source tables, labeled by origin. Rows with an unrecognized
    /// label are dropped rather than failing the whole fetch.
    pub async fn fetch_activity_events(&self) -> Result<Vec<ActivityEvent>, DbError> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT user_id, 'budgeting' AS source, created_at FROM budgets
            UNION ALL
            SELECT user_id, 'manual_transaction' AS source, created_at
                FROM manual_and_external_transactions
            UNION ALL
            SELECT user_id, 'plan_created' AS source, created_at FROM plans
            UNION ALL
            SELECT user_id, 'investment_plan_created' AS source, created_at
                FROM investment_plans
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let events = rows
            .into_iter()
            .filter_map(|row| {
                let source = ActivitySource::from_raw(&row.source);
                if source.is_none() {
                    tracing::warn!(source = %row.source, "dropping activity row with unknown source");
                }
                Some(ActivityEvent {
                    customer_id: row.user_id,
                    source: source?,
                    occurred_at: row.created_at,
                })
            })
            .collect();
        Ok(events)
    }

    /// Fetches every entity table concurrently over the shared pool.
    pub async fn load_bundle(&self) -> Result<LedgerBundle, DbError> {
        let (transactions, customers, plans, investment_plans, assets, activity_events) = tokio::try_join!(
            self.fetch_transactions(),
            self.fetch_customers(),
            self.fetch_plans(),
            self.fetch_investment_plans(),
            self.fetch_assets(),
            self.fetch_activity_events(),
        )?;

        tracing::info!(
            transactions = transactions.len(),
            customers = customers.len(),
            plans = plans.len(),
            investment_plans = investment_plans.len(),
            assets = assets.len(),
            activity_events = activity_events.len(),
            "loaded ledger bundle"
        );

        Ok(LedgerBundle {
            transactions,
            customers,
            plans,
            investment_plans,
            assets,
            activity_events,
        })
    }
}
