use crate::normalize::NormalizedRecord;
use crate::report::{UserCounts, UserInsight, UsersByAssetType};
use crate::snapshot::LedgerSnapshot;
use crate::window::ReportingWindow;
use configuration::ServiceSettings;
use core_types::Customer;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use uuid::Uuid;

/// Customers with any product interaction in the window: a budgeting/manual/
/// plan-creation activity event, or a qualifying ledger transaction.
pub fn active_customer_ids(
    snapshot: &LedgerSnapshot,
    records: &[NormalizedRecord],
    window: &ReportingWindow,
) -> HashSet<Uuid> {
    let mut active: HashSet<Uuid> = snapshot
        .activity_events()
        .iter()
        .filter(|event| window.contains(event.occurred_at))
        .map(|event| event.customer_id)
        .collect();
    active.extend(
        records
            .iter()
            .filter(|r| window.contains(r.timestamp))
            .filter_map(|r| r.customer_id),
    );
    active
}

/// Customers whose most-recent-activity timestamp falls inside the window.
pub fn recently_active_ids(snapshot: &LedgerSnapshot, window: &ReportingWindow) -> HashSet<Uuid> {
    snapshot
        .customers()
        .filter(|c| {
            c.most_recent_activity
                .is_some_and(|ts| window.contains(ts))
        })
        .map(|c| c.id)
        .collect()
}

/// Window-filtered registration and KYC-completion counts over the customer
/// table.
pub fn user_counts(
    snapshot: &LedgerSnapshot,
    window: &ReportingWindow,
    service: &ServiceSettings,
) -> UserCounts {
    let registered_users = snapshot
        .customers()
        .filter(|c| window.contains(c.created_at))
        .count() as u64;
    let kyc_users = snapshot
        .customers()
        .filter(|c| is_kyc_verified(c, &service.kyc_marker) && window.contains(c.updated_at))
        .count() as u64;
    UserCounts {
        registered_users,
        kyc_users,
    }
}

/// KYC completion: the structured status, with a metadata-marker fallback for
/// historical rows that predate the column.
pub fn is_kyc_verified(customer: &Customer, kyc_marker: &str) -> bool {
    if customer.kyc_status.is_verified() {
        return true;
    }
    customer
        .metadata
        .as_ref()
        .is_some_and(|m| m.to_string().to_lowercase().contains(&kyc_marker.to_lowercase()))
}

/// Distinct qualifying customers per asset-type label, descending by count.
pub fn users_by_asset_type(
    records: &[NormalizedRecord],
    window: &ReportingWindow,
) -> Vec<UsersByAssetType> {
    let mut by_type: BTreeMap<&str, HashSet<Uuid>> = BTreeMap::new();
    for record in records {
        if !window.contains(record.timestamp) {
            continue;
        }
        let (Some(asset_type), Some(customer_id)) =
            (record.asset_type.as_deref(), record.customer_id)
        else {
            continue;
        };
        by_type.entry(asset_type).or_default().insert(customer_id);
    }

    let mut rows: Vec<UsersByAssetType> = by_type
        .into_iter()
        .map(|(asset_type, customers)| UsersByAssetType {
            asset_type: asset_type.to_string(),
            total_users: customers.len() as u64,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_users
            .cmp(&a.total_users)
            .then_with(|| a.asset_type.cmp(&b.asset_type))
    });
    rows
}

/// The distinct asset-type labels with qualifying transactions in the window,
/// alphabetically.
pub fn asset_types(records: &[NormalizedRecord], window: &ReportingWindow) -> Vec<String> {
    records
        .iter()
        .filter(|r| window.contains(r.timestamp))
        .filter_map(|r| r.asset_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Per-customer demographics and activity flags for customers registered in
/// the window, with free-text demographic values canonicalized.
pub fn user_insights(
    snapshot: &LedgerSnapshot,
    records: &[NormalizedRecord],
    window: &ReportingWindow,
) -> Vec<UserInsight> {
    let active = active_customer_ids(snapshot, records, window);
    let recent = recently_active_ids(snapshot, window);

    let mut insights: Vec<UserInsight> = snapshot
        .customers()
        .filter(|c| window.contains(c.created_at))
        .map(|c| UserInsight {
            customer_id: c.id,
            gender: c.gender.as_deref().map(canonical_gender),
            country: c.country.as_deref().map(|s| s.trim().to_string()),
            date_of_birth: c.date_of_birth,
            kyc_status: c.kyc_status,
            use_option: c.use_option.as_deref().map(canonical_use_option),
            employment_status: c
                .employment_status
                .as_deref()
                .map(|s| s.trim().to_lowercase()),
            created_at: c.created_at,
            is_active: active.contains(&c.id),
            is_recent: recent.contains(&c.id),
        })
        .collect();
    insights.sort_by_key(|i| (i.created_at, i.customer_id));
    insights
}

/// Collapses the free-text gender variants the signup form accumulated.
pub fn canonical_gender(raw: &str) -> String {
    let g = raw.trim().to_lowercase();
    match g.as_str() {
        "non binary" | "non-binary" => "non-binary".to_string(),
        _ => g,
    }
}

/// Collapses singular/plural variants of the signup use-option.
pub fn canonical_use_option(raw: &str) -> String {
    let option = raw.trim().to_lowercase();
    match option.as_str() {
        "investment" => "investments".to_string(),
        _ => option,
    }
}
