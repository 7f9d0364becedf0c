//! Types that represent the core data model, such as `Customer`, `Transaction` and the `Snapshot`
//! that holds both.
mod amount;
mod customer;
mod transaction;

pub use amount::{Amount, AmountError};
pub use customer::{Customer, CustomerId};
use serde::{Deserialize, Serialize};
pub use transaction::{Transaction, TransactionId};

/// The full dataset at one point in time. This is exactly the JSON document that both data
/// sources deliver:
///
/// ```json
/// {
///   "customers": [{ "id": 1, "name": "Alice" }],
///   "transactions": [{ "id": 1, "customer_id": 1, "date": "2024-01-01", "amount": 50 }]
/// }
/// ```
///
/// A snapshot is never mutated after it is loaded. The `DataStore` replaces it as a whole.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    customers: Vec<Customer>,
    transactions: Vec<Transaction>,
}

impl Snapshot {
    pub fn new(customers: Vec<Customer>, transactions: Vec<Transaction>) -> Self {
        Self {
            customers,
            transactions,
        }
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty() && self.transactions.is_empty()
    }
}
