//! Independent predicates over customers and transactions.
//!
//! The two filters never look at each other: the customer filter only reads names and the
//! transaction filter only reads amounts. Joining the two filtered sets is the job of
//! [`JoinIndex`](crate::join::JoinIndex).

use crate::model::{Amount, Customer, Transaction};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The raw text of both filter inputs, exactly as typed.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    name_pattern: String,
    amount_exact: String,
}

impl Filter {
    pub fn new(name_pattern: impl Into<String>, amount_exact: impl Into<String>) -> Self {
        Self {
            name_pattern: name_pattern.into(),
            amount_exact: amount_exact.into(),
        }
    }

    pub fn name_pattern(&self) -> &str {
        &self.name_pattern
    }

    pub fn amount_exact(&self) -> &str {
        &self.amount_exact
    }

    pub fn set_name_pattern(&mut self, value: impl Into<String>) {
        self.name_pattern = value.into();
    }

    pub fn set_amount_exact(&mut self, value: impl Into<String>) {
        self.amount_exact = value.into();
    }

    pub(crate) fn name_filter(&self) -> NameFilter {
        NameFilter::new(&self.name_pattern)
    }

    pub(crate) fn amount_filter(&self) -> AmountFilter {
        AmountFilter::parse(&self.amount_exact)
    }
}

/// Case-insensitive substring match on a customer's name. The pattern is folded once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NameFilter {
    folded: String,
}

impl NameFilter {
    pub(crate) fn new(pattern: &str) -> Self {
        Self {
            folded: pattern.to_lowercase(),
        }
    }

    pub(crate) fn matches(&self, customer: &Customer) -> bool {
        // An empty needle is contained in every name.
        customer.name().to_lowercase().contains(&self.folded)
    }
}

/// The parsed form of the amount filter text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AmountFilter {
    /// The text was empty.
    Any,
    /// Keep transactions with exactly this amount.
    Exact(Amount),
    /// The text was not a number. Nothing matches.
    Unparseable,
}

impl AmountFilter {
    pub(crate) fn parse(text: &str) -> Self {
        if text.is_empty() {
            return AmountFilter::Any;
        }
        match Amount::from_str(text) {
            Ok(amount) => AmountFilter::Exact(amount),
            Err(_) => AmountFilter::Unparseable,
        }
    }

    pub(crate) fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            AmountFilter::Any => true,
            AmountFilter::Exact(amount) => transaction.amount() == *amount,
            AmountFilter::Unparseable => false,
        }
    }
}

/// Keeps the customers whose name contains `name_pattern`, ignoring case. Input order is preserved
/// and an empty pattern keeps everything.
pub fn filter_customers<'a, I>(customers: I, name_pattern: &str) -> Vec<&'a Customer>
where
    I: IntoIterator<Item = &'a Customer>,
{
    let filter = NameFilter::new(name_pattern);
    customers.into_iter().filter(|c| filter.matches(c)).collect()
}

/// Keeps the transactions whose amount equals `amount_exact` exactly.
///
/// - An empty `amount_exact` keeps everything.
/// - Text that does not parse as a number keeps nothing. This is not an error.
pub fn filter_transactions<'a, I>(transactions: I, amount_exact: &str) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let filter = AmountFilter::parse(amount_exact);
    transactions
        .into_iter()
        .filter(|t| filter.matches(t))
        .collect()
}
