use crate::model::{Customer, CustomerId};
use tracing::trace;

/// Holds at most one selected customer.
///
/// The selection starts empty, changes on every row click and is never cleared. It survives dataset
/// reloads even when the customer is no longer present; the chart then shows its empty state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    selected: Option<Customer>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `customer`, replacing any previous selection. Returns `false` if it was already
    /// selected.
    pub fn select(&mut self, customer: Customer) -> bool {
        if self.selected.as_ref() == Some(&customer) {
            return false;
        }
        trace!("Selecting customer {}", customer.id());
        self.selected = Some(customer);
        true
    }

    pub fn selected(&self) -> Option<&Customer> {
        self.selected.as_ref()
    }

    pub fn customer_id(&self) -> Option<CustomerId> {
        self.selected.as_ref().map(Customer::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_transitions() {
        let mut selector = Selector::new();
        assert_eq!(selector.customer_id(), None);

        assert!(selector.select(Customer::new(1, "Alice")));
        assert_eq!(selector.customer_id(), Some(1));

        assert!(!selector.select(Customer::new(1, "Alice")));
        assert!(selector.select(Customer::new(2, "Bob")));
        assert_eq!(selector.selected().unwrap().name(), "Bob");
    }
}
