//! Shared test data.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Customer, Snapshot, Transaction};

/// A single customer with three transactions over two dates:
/// `50` and `20` on `2024-01-01`, `10` on `2024-01-02`.
pub(crate) fn scenario_a() -> Snapshot {
    Snapshot::new(
        vec![Customer::new(1, "Alice")],
        vec![
            Transaction::new(1, 1, "2024-01-01", 50),
            Transaction::new(2, 1, "2024-01-01", 20),
            Transaction::new(3, 1, "2024-01-02", 10),
        ],
    )
}

/// Alice (1) owns transactions 1, 2 and 4. Bob (2) owns 3 and 5. Transactions interleave.
pub(crate) fn alice_and_bob() -> Snapshot {
    Snapshot::new(
        vec![Customer::new(1, "Alice"), Customer::new(2, "Bob")],
        vec![
            Transaction::new(1, 1, "2024-01-01", 50),
            Transaction::new(2, 1, "2024-01-01", 20),
            Transaction::new(3, 2, "2024-01-02", 35),
            Transaction::new(4, 1, "2024-01-02", 10),
            Transaction::new(5, 2, "2024-01-03", 20),
        ],
    )
}

/// `alice_and_bob` plus one transaction that refers to customer 99, who does not exist.
pub(crate) fn with_dangling() -> Snapshot {
    let base = alice_and_bob();
    let mut transactions = base.transactions().to_vec();
    transactions.push(Transaction::new(6, 99, "2024-01-04", 20));
    Snapshot::new(base.customers().to_vec(), transactions)
}

/// A snapshot in which customer 1 does not exist.
pub(crate) fn without_alice() -> Snapshot {
    Snapshot::new(
        vec![Customer::new(2, "Bob")],
        vec![Transaction::new(3, 2, "2024-01-02", 35)],
    )
}

/// The amounts of `transactions` as display strings, for compact assertions.
pub(crate) fn amounts(transactions: &[&Transaction]) -> Vec<String> {
    transactions.iter().map(|t| t.amount().to_string()).collect()
}
