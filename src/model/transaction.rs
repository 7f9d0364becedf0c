use crate::model::{Amount, CustomerId};
use serde::{Deserialize, Serialize};

/// Identifies a `Transaction` within a snapshot.
pub type TransactionId = i64;

/// A single purchase made by a customer.
///
/// `date` is an opaque calendar-date label. It is never parsed: the aggregator groups by the label
/// exactly as it was delivered and keeps the order in which labels were first seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    customer_id: CustomerId,
    date: String,
    amount: Amount,
}

impl Transaction {
    pub fn new(
        id: TransactionId,
        customer_id: CustomerId,
        date: impl Into<String>,
        amount: impl Into<Amount>,
    ) -> Self {
        Self {
            id,
            customer_id,
            date: date.into(),
            amount: amount.into(),
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// The customer this transaction belongs to. Not validated against the snapshot's customers.
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_wire_shape() {
        let json = r#"{"id": 7, "customer_id": 3, "date": "2024-01-05", "amount": 12.5}"#;
        let transaction: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(transaction.id(), 7);
        assert_eq!(transaction.customer_id(), 3);
        assert_eq!(transaction.date(), "2024-01-05");
        assert_eq!(transaction.amount(), Amount::from_str("12.5").unwrap());
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let json = r#"{"id": 7, "date": "2024-01-05", "amount": 12.5}"#;
        let result: Result<Transaction, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
