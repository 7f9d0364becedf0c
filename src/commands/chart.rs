use crate::args::{ChartArgs, ChartTarget};
use crate::commands::{load_dashboard, Out};
use crate::dashboard::ChartSummary;
use crate::source::SourceKind;
use crate::{Config, Result};
use anyhow::bail;

/// Loads the data, selects a customer either by id or by its position in the filtered table, and
/// returns the chart of that customer's spending per day.
pub async fn chart(config: Config, kind: SourceKind, args: ChartArgs) -> Result<Out<ChartSummary>> {
    let mut dashboard = load_dashboard(&config, kind, args.filter().into()).await?;
    let found = match args.target() {
        ChartTarget::Customer(id) => dashboard.select_customer(id).is_some(),
        ChartTarget::Row(position) => dashboard.click_row(position).is_some(),
    };
    if !found {
        match args.target() {
            ChartTarget::Customer(id) => bail!("There is no customer with id {id}"),
            ChartTarget::Row(position) => bail!(
                "There is no row at position {position}, the table has {} rows",
                dashboard.rows().len()
            ),
        }
    }

    let Some(selected) = dashboard.chart().selected() else {
        bail!("No customer is selected");
    };
    let summary = selected.summary();
    let message = if summary.no_data {
        summary
            .message
            .clone()
            .unwrap_or_else(|| summary.heading.clone())
    } else {
        format!(
            "{}: {} days, {} in total",
            summary.heading,
            selected.series().len(),
            selected.series().total().formatted()
        )
    };
    Ok(Out::new(message, summary))
}
