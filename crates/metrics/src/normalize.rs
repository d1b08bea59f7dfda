use crate::classify;
use crate::snapshot::LedgerSnapshot;
use chrono::{DateTime, Utc};
use configuration::ServiceSettings;
use core_types::{InvestmentPlan, Plan, Transaction, TxType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The product link a transaction resolves through, modeled as a tagged union
/// so link presence is branched on exactly once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransactionSource<'a> {
    Plan(&'a Plan),
    InvestmentPlan(&'a InvestmentPlan),
    None,
}

impl<'a> TransactionSource<'a> {
    /// Resolves whichever of the two mutually exclusive links is present.
    /// The data model forbids both; an investment-plan link wins if a corrupt
    /// row ever carries both ids.
    pub fn resolve(tx: &Transaction, snapshot: &'a LedgerSnapshot) -> Self {
        if let Some(id) = tx.investment_plan_id {
            if let Some(plan) = snapshot.investment_plan(id) {
                return TransactionSource::InvestmentPlan(plan);
            }
        }
        if let Some(id) = tx.plan_id {
            if let Some(plan) = snapshot.plan(id) {
                return TransactionSource::Plan(plan);
            }
        }
        TransactionSource::None
    }

    pub fn customer_id(&self) -> Option<Uuid> {
        match self {
            TransactionSource::Plan(plan) => Some(plan.customer_id),
            TransactionSource::InvestmentPlan(plan) => Some(plan.customer_id),
            TransactionSource::None => None,
        }
    }

    /// The asset-type label: the linked asset's name for investment plans,
    /// the plan option for simple plans, absent otherwise.
    pub fn asset_type(&self, snapshot: &LedgerSnapshot) -> Option<String> {
        match self {
            TransactionSource::InvestmentPlan(plan) => plan
                .asset_id
                .and_then(|id| snapshot.asset(id))
                .map(|asset| asset.name.clone()),
            TransactionSource::Plan(plan) => Some(plan.plan_option.clone()),
            TransactionSource::None => None,
        }
    }
}

/// One transaction in the uniform shape every metric consumes: link
/// resolution and effective-type classification already applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub transaction_id: Uuid,
    pub effective_type: TxType,
    /// Absent when the transaction carries no resolvable product link; such
    /// records are excluded from customer- and asset-scoped metrics.
    pub customer_id: Option<Uuid>,
    pub asset_type: Option<String>,
    pub ghs_amount: Decimal,
    pub usd_amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Pure function of its inputs: resolves the product link and classifies the
/// transaction into one normalized record.
pub fn normalize(
    tx: &Transaction,
    snapshot: &LedgerSnapshot,
    service: &ServiceSettings,
) -> NormalizedRecord {
    let source = TransactionSource::resolve(tx, snapshot);
    NormalizedRecord {
        transaction_id: tx.id,
        effective_type: classify::effective_type(tx, &service.maintenance_fee_marker),
        customer_id: source.customer_id(),
        asset_type: source.asset_type(snapshot),
        ghs_amount: tx.ghs_amount,
        usd_amount: tx.usd_amount,
        timestamp: tx.timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::test_support::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn investment_plan_link_resolves_to_asset_name() {
        let fixture = Fixture::new();
        let tx = fixture.invest_tx(TxType::Deposit, "100", "8");
        let record = normalize(&tx, &fixture.snapshot, &fixture.service);

        assert_eq!(record.customer_id, Some(fixture.customer_id));
        assert_eq!(record.asset_type.as_deref(), Some("Ladder Lock"));
        assert_eq!(record.effective_type, TxType::Deposit);
    }

    #[test]
    fn plan_link_resolves_to_plan_option() {
        let fixture = Fixture::new();
        let tx = fixture.plan_tx(TxType::Deposit, "50", "4");
        let record = normalize(&tx, &fixture.snapshot, &fixture.service);

        assert_eq!(record.customer_id, Some(fixture.customer_id));
        assert_eq!(record.asset_type.as_deref(), Some("goal savings"));
    }

    #[test]
    fn unlinked_transaction_has_no_customer_or_label() {
        let fixture = Fixture::new();
        let mut tx = fixture.plan_tx(TxType::Deposit, "50", "4");
        tx.plan_id = None;
        let record = normalize(&tx, &fixture.snapshot, &fixture.service);

        assert_eq!(record.customer_id, None);
        assert_eq!(record.asset_type, None);
    }

    #[test]
    fn investment_plan_without_asset_keeps_customer_but_no_label() {
        let fixture = Fixture::new();
        let mut tx = fixture.invest_tx(TxType::Deposit, "100", "8");
        tx.investment_plan_id = Some(fixture.bare_investment_plan_id);
        let record = normalize(&tx, &fixture.snapshot, &fixture.service);

        assert_eq!(record.customer_id, Some(fixture.customer_id));
        assert_eq!(record.asset_type, None);
    }
}
