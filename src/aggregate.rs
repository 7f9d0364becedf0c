//! Groups one customer's transactions by date label and sums their amounts.

use crate::model::{Amount, CustomerId, Transaction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// One point of an `AggregatedSeries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePoint {
    label: String,
    sum: Amount,
}

impl DatePoint {
    pub fn new(label: impl Into<String>, sum: impl Into<Amount>) -> Self {
        Self {
            label: label.into(),
            sum: sum.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sum(&self) -> Amount {
        self.sum
    }
}

/// Per-date totals, ordered by the first occurrence of each date label. Labels are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    points: Vec<DatePoint>,
}

impl AggregatedSeries {
    pub fn points(&self) -> &[DatePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The sum of all points, saturating like every per-date sum.
    pub fn total(&self) -> Amount {
        self.points.iter().map(DatePoint::sum).sum()
    }
}

impl FromIterator<DatePoint> for AggregatedSeries {
    fn from_iter<T: IntoIterator<Item = DatePoint>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Sums the amounts of `customer_id`'s transactions per date label.
///
/// Only the customer id is used for selection. The text filters of the table do not apply here.
/// Labels appear in the order they are first seen while walking `transactions`. A customer with no
/// transactions, including an id that is not in the snapshot at all, produces an empty series.
/// A per-date sum that would exceed the range of `Amount` is clamped to `Amount::MAX` (or
/// `Amount::MIN`) and a warning is logged.
pub fn aggregate<'a, I>(transactions: I, customer_id: CustomerId) -> AggregatedSeries
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut sums: HashMap<&str, Amount> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for transaction in transactions
        .into_iter()
        .filter(|t| t.customer_id() == customer_id)
    {
        let date = transaction.date();
        match sums.get_mut(date) {
            Some(sum) => {
                let current = *sum;
                *sum = current
                    .checked_add(transaction.amount())
                    .unwrap_or_else(|| {
                        warn!(
                            "The total of customer {customer_id} on {date} is out of range and is \
                            clamped"
                        );
                        current.saturating_add(transaction.amount())
                    });
            }
            None => {
                sums.insert(date, transaction.amount());
                order.push(date);
            }
        }
    }

    order
        .into_iter()
        .map(|date| DatePoint::new(date, sums[date]))
        .collect()
}
