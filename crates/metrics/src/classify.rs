use configuration::ServiceSettings;
use core_types::{Customer, Transaction, TxStatus, TxType};

/// Derives a transaction's effective type from its raw type plus the metadata
/// marker.
///
/// A case-insensitive substring match against the maintenance-fee marker wins
/// over the raw type: historical maintenance deductions were recorded as
/// plain withdrawals with only the metadata text to tell them apart.
pub fn effective_type(tx: &Transaction, maintenance_fee_marker: &str) -> TxType {
    if metadata_contains(tx, maintenance_fee_marker) {
        TxType::MaintenanceFee
    } else {
        tx.tx_type
    }
}

/// The inclusion predicate every metric applies before classification
/// matters: settled, owned by a non-restricted customer, and not from the
/// excluded provider.
pub fn qualifies(tx: &Transaction, owner: Option<&Customer>, service: &ServiceSettings) -> bool {
    if tx.status != TxStatus::Success {
        return false;
    }
    if tx.provider == service.excluded_provider {
        return false;
    }
    match owner {
        Some(customer) => !customer.restricted,
        None => false,
    }
}

fn metadata_contains(tx: &Transaction, marker: &str) -> bool {
    let Some(metadata) = &tx.metadata else {
        return false;
    };
    metadata
        .to_string()
        .to_lowercase()
        .contains(&marker.to_lowercase())
}
