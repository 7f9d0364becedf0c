//! The event dispatcher that ties the pipeline together.
//!
//! A `Dashboard` owns the inputs (snapshot, filter text, selection) and the state derived from them
//! (table rows and chart). Each `on_*` method handles one kind of event and recomputes only what
//! depends on it, replacing the previous derived value wholesale:
//!
//! | event                 | rows | chart |
//! |-----------------------|------|-------|
//! | `on_snapshot_change`  | yes  | yes   |
//! | `on_filter_change`    | yes  | no    |
//! | `on_selection_change` | no   | yes   |
//!
//! Everything here is synchronous and total. Loading data is the caller's business; a failed load
//! is handed to `on_load` which keeps the current snapshot.

use crate::aggregate::{aggregate, AggregatedSeries};
use crate::chart::{self, ChartModel, RenderPayload, StyleDescriptor, NO_DATA_MESSAGE};
use crate::filter::Filter;
use crate::join::{JoinIndex, Row};
use crate::model::{Customer, CustomerId, Snapshot};
use crate::select::Selector;
use crate::store::DataStore;
use crate::Result;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

/// What the chart area should show.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    /// Nothing has been selected yet.
    NoSelection,
    /// A customer is selected. The model may be empty, see [`SelectedChart::has_data`].
    Selected(SelectedChart),
}

impl ChartView {
    pub fn selected(&self) -> Option<&SelectedChart> {
        match self {
            ChartView::NoSelection => None,
            ChartView::Selected(selected) => Some(selected),
        }
    }
}

/// The chart of the selected customer.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedChart {
    customer: Customer,
    series: AggregatedSeries,
    model: ChartModel,
}

impl SelectedChart {
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn series(&self) -> &AggregatedSeries {
        &self.series
    }

    pub fn model(&self) -> &ChartModel {
        &self.model
    }

    /// False when the customer has no transactions in the current snapshot, including when the
    /// customer is no longer part of it.
    pub fn has_data(&self) -> bool {
        !self.model.is_empty()
    }

    pub fn heading(&self) -> String {
        format!("Transactions for {}", self.customer.name())
    }

    /// A serializable summary for the rendering collaborator.
    pub fn summary(&self) -> ChartSummary {
        let has_data = self.has_data();
        ChartSummary {
            customer: self.customer.clone(),
            heading: self.heading(),
            no_data: !has_data,
            message: (!has_data).then(|| NO_DATA_MESSAGE.to_string()),
            chart: has_data.then(|| self.model.render_payload()),
        }
    }
}

/// `SelectedChart` in the form written to stdout or handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSummary {
    pub customer: Customer,
    pub heading: String,
    pub no_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<RenderPayload>,
}

impl Display for ChartSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    store: DataStore,
    index: JoinIndex,
    filter: Filter,
    selector: Selector,
    style: StyleDescriptor,
    rows: Vec<Row>,
    chart: ChartView,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(StyleDescriptor::default())
    }
}

impl Dashboard {
    /// An empty dashboard: no data, empty filters, no selection.
    pub fn new(style: StyleDescriptor) -> Self {
        let store = DataStore::new();
        let index = JoinIndex::build(store.snapshot().clone());
        Self {
            store,
            index,
            filter: Filter::default(),
            selector: Selector::new(),
            style,
            rows: Vec::new(),
            chart: ChartView::NoSelection,
        }
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        self.store.snapshot()
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn selected(&self) -> Option<&Customer> {
        self.selector.selected()
    }

    /// The current table rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The current chart state.
    pub fn chart(&self) -> &ChartView {
        &self.chart
    }

    /// Handles a completed load. A successful load replaces the snapshot; a failure is logged and
    /// the current snapshot stays in place. Returns whether the snapshot was replaced.
    pub fn on_load(&mut self, result: Result<Snapshot>) -> bool {
        match result {
            Ok(snapshot) => {
                self.on_snapshot_change(snapshot);
                true
            }
            Err(e) => {
                error!("Error fetching data: {e:#}");
                false
            }
        }
    }

    /// A new dataset arrived. Rebuilds the index, then the rows and the chart. The selection is
    /// kept even if its customer is gone.
    pub fn on_snapshot_change(&mut self, snapshot: Snapshot) {
        trace!("on_snapshot_change");
        let snapshot = self.store.replace(snapshot);
        self.index = JoinIndex::build(snapshot);
        self.recompute_rows();
        self.recompute_chart();
    }

    /// The filter text changed.
    pub fn on_filter_change(&mut self, filter: Filter) {
        trace!("on_filter_change {filter:?}");
        self.filter = filter;
        self.recompute_rows();
    }

    /// Convenience for a keystroke in the name box.
    pub fn set_name_pattern(&mut self, pattern: impl Into<String>) {
        let mut filter = self.filter.clone();
        filter.set_name_pattern(pattern);
        self.on_filter_change(filter);
    }

    /// Convenience for a keystroke in the amount box.
    pub fn set_amount_exact(&mut self, amount: impl Into<String>) {
        let mut filter = self.filter.clone();
        filter.set_amount_exact(amount);
        self.on_filter_change(filter);
    }

    /// A customer was selected.
    pub fn on_selection_change(&mut self, customer: Customer) {
        trace!("on_selection_change {}", customer.id());
        if self.selector.select(customer) {
            self.recompute_chart();
        }
    }

    /// A click on the table row at `position`. Returns the selected customer, or `None` when there
    /// is no such row.
    pub fn click_row(&mut self, position: usize) -> Option<&Customer> {
        let Some(customer) = self.rows.get(position).map(|r| r.customer().clone()) else {
            warn!("There is no row at position {position}");
            return None;
        };
        self.on_selection_change(customer);
        self.selector.selected()
    }

    /// Selects a customer of the current snapshot by id. Returns `None` when the snapshot has no
    /// such customer, leaving the selection unchanged.
    pub fn select_customer(&mut self, id: CustomerId) -> Option<&Customer> {
        let Some(customer) = self.store.snapshot().customer(id).cloned() else {
            warn!("There is no customer with id {id}");
            return None;
        };
        self.on_selection_change(customer);
        self.selector.selected()
    }

    fn recompute_rows(&mut self) {
        self.rows = self.index.rows(&self.filter);
        debug!("Recomputed {} rows", self.rows.len());
    }

    fn recompute_chart(&mut self) {
        self.chart = match self.selector.selected() {
            None => ChartView::NoSelection,
            Some(customer) => {
                let series = aggregate(self.store.snapshot().transactions(), customer.id());
                let model = chart::build(&series, &self.style);
                debug!(
                    "Recomputed chart for customer {}: {} points, scale max {}",
                    customer.id(),
                    series.len(),
                    model.scale_max()
                );
                ChartView::Selected(SelectedChart {
                    customer: customer.clone(),
                    series,
                    model,
                })
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::SCALE_MARGIN;
    use crate::model::Amount;
    use crate::test::{alice_and_bob, scenario_a, without_alice};
    use anyhow::anyhow;

    fn loaded(snapshot: Snapshot) -> Dashboard {
        let mut dashboard = Dashboard::default();
        dashboard.on_snapshot_change(snapshot);
        dashboard
    }

    fn selected(dashboard: &Dashboard) -> &SelectedChart {
        dashboard.chart().selected().expect("a selection")
    }

    #[test]
    fn test_starts_empty() {
        let dashboard = Dashboard::default();
        assert!(dashboard.rows().is_empty());
        assert_eq!(dashboard.chart(), &ChartView::NoSelection);
    }

    #[test]
    fn test_snapshot_change_produces_rows_without_selection() {
        let dashboard = loaded(alice_and_bob());
        assert_eq!(dashboard.rows().len(), 5);
        assert_eq!(dashboard.chart(), &ChartView::NoSelection);
    }

    #[test]
    fn test_scenario_a_through_row_click() {
        let mut dashboard = loaded(scenario_a());
        let customer = dashboard.click_row(0).unwrap();
        assert_eq!(customer.name(), "Alice");

        let chart = selected(&dashboard);
        assert!(chart.has_data());
        assert_eq!(chart.heading(), "Transactions for Alice");
        assert_eq!(chart.model().labels(), &["2024-01-01", "2024-01-02"]);
        assert_eq!(chart.model().values(), &[Amount::from(70), Amount::from(10)]);
        assert_eq!(chart.model().scale_max(), Amount::from(100));
    }

    #[test]
    fn test_scenario_d_customer_without_transactions() {
        let mut snapshot = scenario_a().customers().to_vec();
        snapshot.push(Customer::new(2, "Carol"));
        let mut dashboard = loaded(Snapshot::new(snapshot, scenario_a().transactions().to_vec()));

        dashboard.select_customer(2).unwrap();
        let chart = selected(&dashboard);
        assert!(chart.series().is_empty());
        assert!(!chart.has_data());
        assert_eq!(chart.model().scale_max(), Amount::from(SCALE_MARGIN));

        let summary = chart.summary();
        assert!(summary.no_data);
        assert_eq!(summary.message.as_deref(), Some(NO_DATA_MESSAGE));
        assert!(summary.chart.is_none());
    }

    #[test]
    fn test_scenario_e_reload_keeps_dangling_selection() {
        let mut dashboard = loaded(alice_and_bob());
        dashboard.select_customer(1).unwrap();
        assert!(selected(&dashboard).has_data());

        dashboard.on_snapshot_change(without_alice());
        assert_eq!(dashboard.selected().unwrap().id(), 1);
        let chart = selected(&dashboard);
        assert!(chart.series().is_empty());
        assert!(!chart.has_data());
        assert_eq!(chart.model().scale_max(), Amount::from(SCALE_MARGIN));
    }

    #[test]
    fn test_filter_change_only_touches_rows() {
        let mut dashboard = loaded(alice_and_bob());
        dashboard.select_customer(1).unwrap();
        let before = dashboard.chart().clone();

        dashboard.set_amount_exact("20");
        assert_eq!(dashboard.rows().len(), 2);
        // The chart ignores the text filters.
        assert_eq!(dashboard.chart(), &before);

        dashboard.set_name_pattern("bo");
        assert_eq!(dashboard.rows().len(), 1);
        assert_eq!(dashboard.rows()[0].transaction().id(), 5);

        dashboard.set_amount_exact("abc");
        assert!(dashboard.rows().is_empty());

        dashboard.on_filter_change(Filter::default());
        assert_eq!(dashboard.rows().len(), 5);
    }

    #[test]
    fn test_click_selects_row_customer() {
        let mut dashboard = loaded(alice_and_bob());
        dashboard.set_name_pattern("bob");
        assert_eq!(dashboard.click_row(1).unwrap().id(), 2);
        assert!(dashboard.click_row(2).is_none());
        assert_eq!(dashboard.selected().unwrap().id(), 2);
    }

    #[test]
    fn test_select_unknown_customer_keeps_selection() {
        let mut dashboard = loaded(alice_and_bob());
        dashboard.select_customer(2).unwrap();
        assert!(dashboard.select_customer(42).is_none());
        assert_eq!(dashboard.selected().unwrap().id(), 2);
    }

    #[test]
    fn test_failed_load_keeps_snapshot() {
        let mut dashboard = loaded(scenario_a());
        assert!(!dashboard.on_load(Err(anyhow!("connection refused"))));
        assert_eq!(**dashboard.snapshot(), scenario_a());
        assert_eq!(dashboard.rows().len(), 3);

        assert!(dashboard.on_load(Ok(alice_and_bob())));
        assert_eq!(dashboard.rows().len(), 5);
    }

    #[test]
    fn test_failed_first_load_stays_empty() {
        let mut dashboard = Dashboard::default();
        assert!(!dashboard.on_load(Err(anyhow!("not json"))));
        assert!(dashboard.snapshot().is_empty());
        assert!(dashboard.rows().is_empty());
    }

    #[test]
    fn test_amounts_at_the_edge_of_the_range_do_not_fault() {
        let json = r#"{
            "customers": [{"id": 1, "name": "Alice"}],
            "transactions": [
                {"id": 1, "customer_id": 1, "date": "2024-01-01", "amount": 5e28},
                {"id": 2, "customer_id": 1, "date": "2024-01-01", "amount": 5e28},
                {"id": 3, "customer_id": 1, "date": "2024-01-02", "amount": 1e29}
            ]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        let mut dashboard = loaded(snapshot);
        dashboard.select_customer(1).unwrap();

        let chart = selected(&dashboard);
        assert_eq!(chart.model().values(), &[Amount::MAX, Amount::MAX]);
        assert_eq!(chart.model().scale_max(), Amount::MAX);
        assert_eq!(dashboard.rows().len(), 3);
    }

    #[test]
    fn test_summary_serializes_render_payload() {
        let mut dashboard = loaded(scenario_a());
        dashboard.select_customer(1).unwrap();
        let value = serde_json::to_value(selected(&dashboard).summary()).unwrap();
        assert_eq!(value["heading"], "Transactions for Alice");
        assert_eq!(value["no_data"], false);
        assert!(value.get("message").is_none());
        assert_eq!(value["chart"]["options"]["scales"]["y"]["max"], 100.0);
    }
}
