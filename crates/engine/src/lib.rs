//! # Ladder Dashboard Engine
//!
//! The orchestrator: owns the database read path, the loaded snapshot and the
//! query cache, and answers every metrics question the presentation layer can
//! ask.
//!
//! ## Architectural Principles
//!
//! - **Load once, query many:** the ledger entities are fetched in one
//!   concurrent pass and frozen into a `LedgerSnapshot`. Every query after
//!   that is pure computation over the snapshot.
//! - **Cache by window:** identical inputs give identical outputs, so each
//!   report is memoized by its reporting window. `refresh` drops the snapshot
//!   and every cached answer together; the cache can never outlive its data.
//! - **Errors propagate:** the engine never substitutes defaults for a failed
//!   load. Degrading a failed category to a zeroed report is the presentation
//!   layer's call.

use chrono::{NaiveDate, Utc};
use configuration::{Config, FeeSchedule, ServiceSettings};
use core_types::Granularity;
use database::LedgerRepository;
use metrics::{
    activity, trend, AssetMetrics, CohortIndex, GeneralMetrics, LedgerSnapshot, MetricsEngine,
    NormalizedRecord, ReportingWindow, TrendPoint, UserCounts, UserInsight, UsersByAssetType,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub mod error;

pub use error::EngineError;

/// The immutable result of one ledger load: the snapshot, the qualifying
/// record set derived from it, and the per-customer first-transaction index.
struct Prepared {
    snapshot: LedgerSnapshot,
    records: Vec<NormalizedRecord>,
    cohorts: CohortIndex,
}

type WindowKey = (NaiveDate, NaiveDate);

#[derive(Default)]
struct QueryCache {
    general: HashMap<WindowKey, GeneralMetrics>,
    assets: HashMap<WindowKey, Vec<AssetMetrics>>,
    trends: HashMap<(NaiveDate, NaiveDate, &'static str), Vec<TrendPoint>>,
}

/// The central orchestrator for the metrics dashboard.
pub struct DashboardEngine {
    repo: LedgerRepository,
    service: ServiceSettings,
    fee_schedule: FeeSchedule,
    calculator: MetricsEngine,
    prepared: Mutex<Option<Arc<Prepared>>>,
    cache: Mutex<QueryCache>,
}

impl DashboardEngine {
    pub fn new(repo: LedgerRepository, config: &Config) -> Self {
        Self {
            repo,
            service: config.service.clone(),
            fee_schedule: config.fee_schedule.clone(),
            calculator: MetricsEngine::new(),
            prepared: Mutex::new(None),
            cache: Mutex::new(QueryCache::default()),
        }
    }

    /// Builds a validated reporting window, defaulting an absent start to the
    /// service launch date and an absent end to today.
    pub fn window(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<ReportingWindow, EngineError> {
        let launch = self.service.launch_date;
        let window = ReportingWindow::new(
            from.unwrap_or(launch),
            to.unwrap_or_else(|| Utc::now().date_naive()),
            launch,
        )?;
        Ok(window)
    }

    /// Returns the prepared snapshot, loading the ledger on first use. The
    /// lock is held through the load so concurrent callers share one fetch.
    async fn prepared(&self) -> Result<Arc<Prepared>, EngineError> {
        let mut slot = self.prepared.lock().await;
        if let Some(prepared) = slot.as_ref() {
            return Ok(Arc::clone(prepared));
        }

        let bundle = self.repo.load_bundle().await?;
        let snapshot = LedgerSnapshot::new(
            bundle.transactions,
            bundle.customers,
            bundle.plans,
            bundle.investment_plans,
            bundle.assets,
            bundle.activity_events,
        );
        let records = snapshot.qualifying_records(&self.service);
        let cohorts = CohortIndex::build(&records);
        tracing::info!(
            records = records.len(),
            depositors = cohorts.len(),
            "prepared ledger snapshot"
        );

        let prepared = Arc::new(Prepared {
            snapshot,
            records,
            cohorts,
        });
        *slot = Some(Arc::clone(&prepared));
        Ok(prepared)
    }

    /// Replaces the prepared snapshot with an in-memory ledger, bypassing the
    /// database read path. This is the seam for warming the engine from a
    /// known snapshot (and for exercising the query path without a live
    /// database). The cache is left untouched; cached answers survive until
    /// `refresh`.
    pub async fn prime(&self, snapshot: LedgerSnapshot) {
        let records = snapshot.qualifying_records(&self.service);
        let cohorts = CohortIndex::build(&records);
        *self.prepared.lock().await = Some(Arc::new(Prepared {
            snapshot,
            records,
            cohorts,
        }));
    }

    /// Drops the snapshot and every cached report; the next query reloads.
    pub async fn refresh(&self) {
        *self.prepared.lock().await = None;
        *self.cache.lock().await = QueryCache::default();
    }

    /// The date of the earliest qualifying transaction, if any exist.
    pub async fn first_transaction_date(&self) -> Result<Option<NaiveDate>, EngineError> {
        let prepared = self.prepared().await?;
        Ok(prepared
            .records
            .iter()
            .map(|r| r.timestamp.date_naive())
            .min())
    }

    /// A customer's global first qualifying transaction, from the cohort
    /// index.
    pub async fn first_transaction_for(
        &self,
        customer_id: uuid::Uuid,
    ) -> Result<Option<NaiveDate>, EngineError> {
        let prepared = self.prepared().await?;
        Ok(prepared
            .cohorts
            .first_transaction_date(customer_id)
            .map(|ts| ts.date_naive()))
    }

    pub async fn general_metrics(
        &self,
        window: &ReportingWindow,
    ) -> Result<GeneralMetrics, EngineError> {
        let key = (window.start(), window.end());
        if let Some(hit) = self.cache.lock().await.general.get(&key) {
            return Ok(hit.clone());
        }

        let prepared = self.prepared().await?;
        let report = self.calculator.general_metrics(&prepared.records, window);
        self.cache.lock().await.general.insert(key, report.clone());
        Ok(report)
    }

    pub async fn asset_metrics(
        &self,
        window: &ReportingWindow,
    ) -> Result<Vec<AssetMetrics>, EngineError> {
        let key = (window.start(), window.end());
        if let Some(hit) = self.cache.lock().await.assets.get(&key) {
            return Ok(hit.clone());
        }

        let prepared = self.prepared().await?;
        let rows = self.calculator.asset_metrics(
            &prepared.records,
            window,
            &self.fee_schedule,
            self.service.early_withdrawal_fee_rate,
        );
        self.cache.lock().await.assets.insert(key, rows.clone());
        Ok(rows)
    }

    pub async fn trend(
        &self,
        window: &ReportingWindow,
        granularity: Granularity,
    ) -> Result<Vec<TrendPoint>, EngineError> {
        let key = (window.start(), window.end(), granularity.as_str());
        if let Some(hit) = self.cache.lock().await.trends.get(&key) {
            return Ok(hit.clone());
        }

        let prepared = self.prepared().await?;
        let points = trend::trend_points(&prepared.records, window, granularity);
        self.cache.lock().await.trends.insert(key, points.clone());
        Ok(points)
    }

    pub async fn user_counts(&self, window: &ReportingWindow) -> Result<UserCounts, EngineError> {
        let prepared = self.prepared().await?;
        Ok(activity::user_counts(
            &prepared.snapshot,
            window,
            &self.service,
        ))
    }

    pub async fn users_by_asset_type(
        &self,
        window: &ReportingWindow,
    ) -> Result<Vec<UsersByAssetType>, EngineError> {
        let prepared = self.prepared().await?;
        Ok(activity::users_by_asset_type(&prepared.records, window))
    }

    pub async fn asset_types(&self, window: &ReportingWindow) -> Result<Vec<String>, EngineError> {
        let prepared = self.prepared().await?;
        Ok(activity::asset_types(&prepared.records, window))
    }

    pub async fn user_insights(
        &self,
        window: &ReportingWindow,
    ) -> Result<Vec<UserInsight>, EngineError> {
        let prepared = self.prepared().await?;
        Ok(activity::user_insights(
            &prepared.snapshot,
            &prepared.records,
            window,
        ))
    }
}
