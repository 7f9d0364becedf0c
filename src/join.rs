//! Joins filtered customers with their filtered transactions to produce display rows.

use crate::filter::{AmountFilter, Filter, NameFilter};
use crate::model::{Customer, CustomerId, Snapshot, Transaction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// One line of the transactions table: a customer paired with one of its transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    customer: Customer,
    transaction: Transaction,
}

impl Row {
    pub fn new(customer: Customer, transaction: Transaction) -> Self {
        Self {
            customer,
            transaction,
        }
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }
}

/// Maps each customer id to the positions of its transactions in the snapshot, in snapshot order.
///
/// The index is built once per snapshot. Every filter change re-reads it, so producing the rows
/// costs `O(customers + transactions)` instead of scanning all transactions for every customer.
/// Transactions whose `customer_id` has no customer are indexed but never read.
#[derive(Debug, Clone, Default)]
pub struct JoinIndex {
    snapshot: Arc<Snapshot>,
    by_customer: HashMap<CustomerId, Vec<usize>>,
}

impl JoinIndex {
    pub fn build(snapshot: Arc<Snapshot>) -> Self {
        let mut by_customer: HashMap<CustomerId, Vec<usize>> = HashMap::new();
        for (ix, transaction) in snapshot.transactions().iter().enumerate() {
            by_customer
                .entry(transaction.customer_id())
                .or_default()
                .push(ix);
        }
        debug!(
            "Indexed {} transactions under {} customer ids",
            snapshot.transactions().len(),
            by_customer.len()
        );
        Self {
            snapshot,
            by_customer,
        }
    }

    /// The snapshot this index was built from.
    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    /// All transactions of `customer_id`, in snapshot order.
    pub fn transactions_for(&self, customer_id: CustomerId) -> impl Iterator<Item = &Transaction> {
        let transactions = self.snapshot.transactions();
        self.by_customer
            .get(&customer_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&ix| &transactions[ix])
    }

    /// Produces the display rows for `filter`: customers in snapshot order as the outer loop, each
    /// customer's transactions in snapshot order as the inner loop.
    pub fn rows(&self, filter: &Filter) -> Vec<Row> {
        self.join(&filter.name_filter(), &filter.amount_filter())
    }

    fn join(&self, names: &NameFilter, amounts: &AmountFilter) -> Vec<Row> {
        let mut rows = Vec::new();
        for customer in self.snapshot.customers().iter().filter(|c| names.matches(c)) {
            for transaction in self
                .transactions_for(customer.id())
                .filter(|t| amounts.matches(t))
            {
                rows.push(Row::new(customer.clone(), transaction.clone()));
            }
        }
        rows
    }
}
