use crate::classify;
use crate::normalize::{self, NormalizedRecord};
use configuration::ServiceSettings;
use core_types::{ActivityEvent, Asset, Customer, InvestmentPlan, Plan, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

/// An immutable, point-in-time view of the ledger entities.
///
/// The engine only ever reads from a snapshot; there is no write path and no
/// partial state to roll back when a computation is abandoned.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    transactions: Vec<Transaction>,
    customers: HashMap<Uuid, Customer>,
    plans: HashMap<Uuid, Plan>,
    investment_plans: HashMap<Uuid, InvestmentPlan>,
    assets: HashMap<Uuid, Asset>,
    activity_events: Vec<ActivityEvent>,
}

impl LedgerSnapshot {
    pub fn new(
        transactions: Vec<Transaction>,
        customers: Vec<Customer>,
        plans: Vec<Plan>,
        investment_plans: Vec<InvestmentPlan>,
        assets: Vec<Asset>,
        activity_events: Vec<ActivityEvent>,
    ) -> Self {
        Self {
            transactions,
            customers: customers.into_iter().map(|c| (c.id, c)).collect(),
            plans: plans.into_iter().map(|p| (p.id, p)).collect(),
            investment_plans: investment_plans.into_iter().map(|p| (p.id, p)).collect(),
            assets: assets.into_iter().map(|a| (a.id, a)).collect(),
            activity_events,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    pub fn customer(&self, id: Uuid) -> Option<&Customer> {
        self.customers.get(&id)
    }

    pub fn plan(&self, id: Uuid) -> Option<&Plan> {
        self.plans.get(&id)
    }

    pub fn investment_plan(&self, id: Uuid) -> Option<&InvestmentPlan> {
        self.investment_plans.get(&id)
    }

    pub fn asset(&self, id: Uuid) -> Option<&Asset> {
        self.assets.get(&id)
    }

    pub fn activity_events(&self) -> &[ActivityEvent] {
        &self.activity_events
    }

    /// Applies the inclusion predicate and normalizes every surviving
    /// transaction. This is the record set every metric category consumes;
    /// it spans the full history so the cohort index can anchor global
    /// first-transaction dates.
    pub fn qualifying_records(&self, service: &ServiceSettings) -> Vec<NormalizedRecord> {
        let records: Vec<NormalizedRecord> = self
            .transactions
            .iter()
            .filter(|tx| {
                let owner = normalize::TransactionSource::resolve(tx, self)
                    .customer_id()
                    .and_then(|id| self.customer(id));
                classify::qualifies(tx, owner, service)
            })
            .map(|tx| normalize::normalize(tx, self, service))
            .collect();
        tracing::debug!(
            total = self.transactions.len(),
            qualifying = records.len(),
            "normalized ledger snapshot"
        );
        records
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use core_types::{TxStatus, TxType};

    #[test]
    fn qualifying_records_apply_the_inclusion_predicate() {
        let fixture = Fixture::new();
        let mut snapshot = fixture.snapshot.clone();

        let good = fixture.plan_tx(TxType::Deposit, "100", "8");
        let mut failed = fixture.plan_tx(TxType::Deposit, "200", "16");
        failed.status = TxStatus::Failed;
        let mut flex = fixture.plan_tx(TxType::Deposit, "300", "24");
        flex.provider = fixture.service.excluded_provider.clone();
        let mut unlinked = fixture.plan_tx(TxType::Deposit, "400", "32");
        unlinked.plan_id = None;

        snapshot = super::LedgerSnapshot::new(
            vec![good.clone(), failed, flex, unlinked],
            snapshot.customers().cloned().collect(),
            vec![fixture.snapshot.plan(fixture.plan_id).unwrap().clone()],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );

        let records = snapshot.qualifying_records(&fixture.service);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transaction_id, good.id);
    }
}
