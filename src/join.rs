//! Left join of customers onto their transactions

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::models::{CustomerRecord, JoinedRecord, TransactionFields, TransactionRecord};
use crate::utils::logging::log_warning;

/// Shape of a join result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JoinSummary {
    /// Joined rows produced
    pub rows: usize,
    /// Customers with at least one transaction
    pub matched_customers: usize,
    /// Customers without any transaction, kept with empty transaction fields
    pub unmatched_customers: usize,
    /// Transactions whose card has no customer record; not part of the output
    pub orphan_transactions: usize,
}

/// Left-join `customers` against `transactions` on the loyalty card number
///
/// Every customer appears at least once, in input order. A customer with
/// several transactions yields one row per transaction, in transaction input
/// order; a customer with none yields a single row without transaction fields.
#[must_use]
pub fn left_join(
    customers: &[CustomerRecord],
    transactions: &[TransactionRecord],
) -> (Vec<JoinedRecord>, JoinSummary) {
    let mut by_card: FxHashMap<i64, Vec<TransactionFields>> = FxHashMap::default();
    for tx in transactions {
        by_card
            .entry(tx.loyalty_card_number)
            .or_default()
            .push(TransactionFields::from(tx));
    }

    let mut joined = Vec::with_capacity(transactions.len().max(customers.len()));
    let mut matched_customers = 0;

    for customer in customers {
        match by_card.get(&customer.loyalty_card_number) {
            Some(fields) => {
                matched_customers += 1;
                joined.extend(fields.iter().map(|tx| JoinedRecord {
                    customer: *customer,
                    transaction: Some(*tx),
                }));
            }
            None => joined.push(JoinedRecord {
                customer: *customer,
                transaction: None,
            }),
        }
    }

    let customer_cards: FxHashSet<i64> =
        customers.iter().map(|c| c.loyalty_card_number).collect();
    let orphan_transactions = transactions
        .iter()
        .filter(|tx| !customer_cards.contains(&tx.loyalty_card_number))
        .count();
    if orphan_transactions > 0 {
        log_warning(
            &format!("{orphan_transactions} transactions have no matching customer and were left out of the join"),
            None,
        );
    }

    let summary = JoinSummary {
        rows: joined.len(),
        matched_customers,
        unmatched_customers: customers.len() - matched_customers,
        orphan_transactions,
    };
    log::info!(
        "Merged data shape: {} rows ({} customers matched, {} without transactions)",
        summary.rows,
        summary.matched_customers,
        summary.unmatched_customers
    );

    (joined, summary)
}
