//! Command handlers for the spend CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod chart;
mod init;
mod rows;
mod serve;
mod session;

use crate::args::{FilterArgs, RowsFormat};
use crate::dashboard::Dashboard;
use crate::filter::Filter;
use crate::join::Row;
use crate::source::{self, SourceKind};
use crate::{Config, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use tracing::info;

pub use chart::chart;
pub use init::init;
pub use rows::rows;
pub use serve::{router, serve, serve_listener};
pub use session::{run_session, session};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) to stdout.
    pub fn print(&self)
    where
        T: Display,
    {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            println!("{structure}");
        }
    }
}

/// Table rows in the requested output format.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rows {
    /// JSON array of objects, one per row.
    Json(serde_json::Value),
    /// Markdown table as a single formatted string.
    Table(String),
    /// CSV data as a properly escaped string.
    Csv(String),
}

impl Debug for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => write!(f, "Rows::Json({:?})", v),
            Rows::Table(s) => write!(f, "Rows::Table({} chars)", s.len()),
            Rows::Csv(s) => write!(f, "Rows::Csv({} chars)", s.len()),
        }
    }
}

impl Display for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => {
                if let Ok(s) = serde_json::to_string_pretty(v) {
                    write!(f, "{}", s)
                } else {
                    write!(f, "{:?}", v)
                }
            }
            Rows::Table(s) => write!(f, "{}", s),
            Rows::Csv(s) => write!(f, "{}", s),
        }
    }
}

const HEADERS: [&str; 3] = ["Customer Name", "Transaction Date", "Transaction Amount"];

impl Rows {
    /// Renders `rows` in `format`.
    pub fn new(rows: &[Row], format: RowsFormat) -> Result<Self> {
        Ok(match format {
            RowsFormat::Table => Rows::Table(markdown_table(rows)),
            RowsFormat::Json => {
                Rows::Json(serde_json::to_value(rows).context("Unable to serialize the rows")?)
            }
            RowsFormat::Csv => Rows::Csv(csv_table(rows)?),
        })
    }
}

fn markdown_table(rows: &[Row]) -> String {
    let cells: Vec<[String; 3]> = rows
        .iter()
        .map(|row| {
            [
                row.customer().name().to_string(),
                row.transaction().date().to_string(),
                row.transaction().amount().formatted(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = HEADERS.map(String::from);
    push_line(&mut out, &header, &widths, false);
    let rule = widths.map(|w| "-".repeat(w));
    push_line(&mut out, &rule, &widths, false);
    for line in &cells {
        push_line(&mut out, line, &widths, true);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 3], widths: &[usize; 3], numeric_last: bool) {
    out.push('|');
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if numeric_last && i == 2 {
            out.push_str(&format!(" {cell:>width$} |"));
        } else {
            out.push_str(&format!(" {cell:<width$} |"));
        }
    }
    out.push('\n');
}

fn csv_table(rows: &[Row]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(HEADERS)
        .context("Unable to write the CSV header")?;
    for row in rows {
        writer
            .write_record([
                row.customer().name().to_string(),
                row.transaction().date().to_string(),
                row.transaction().amount().to_string(),
            ])
            .context("Unable to write a CSV record")?;
    }
    let bytes = writer
        .into_inner()
        .context("Unable to flush the CSV writer")?;
    String::from_utf8(bytes).context("The CSV output is not valid UTF-8")
}

impl From<&FilterArgs> for Filter {
    fn from(args: &FilterArgs) -> Self {
        Filter::new(args.name(), args.amount())
    }
}

/// Loads a snapshot from `kind` and returns a dashboard showing it. Unlike the interactive
/// session, a one-shot command has nothing to fall back to, so a failed load is an error.
async fn load_dashboard(config: &Config, kind: SourceKind, filter: Filter) -> Result<Dashboard> {
    let snapshot = source::load(kind, config.endpoint()).await?;
    let mut dashboard = Dashboard::new(config.style().clone());
    dashboard.on_snapshot_change(snapshot);
    dashboard.on_filter_change(filter);
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Customer, Transaction};

    fn rows() -> Vec<Row> {
        vec![
            Row::new(
                Customer::new(1, "Ahmed, Ali"),
                Transaction::new(1, 1, "2022-01-01", 1000),
            ),
            Row::new(
                Customer::new(2, "Aya Elsayed"),
                Transaction::new(2, 2, "2022-01-02", 125),
            ),
        ]
    }

    #[test]
    fn test_markdown_table() {
        let Rows::Table(table) = Rows::new(&rows(), RowsFormat::Table).unwrap() else {
            panic!("expected a table");
        };
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("| Customer Name"));
        assert!(lines[1].starts_with("| ---"));
        assert!(lines[2].contains("Ahmed, Ali"));
        assert!(lines[2].ends_with("1,000.00 |"));
        assert!(lines[3].ends_with("  125.00 |"));
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn test_empty_markdown_table_has_header() {
        let table = Rows::new(&[], RowsFormat::Table).unwrap().to_string();
        assert_eq!(table.lines().count(), 2);
    }

    #[test]
    fn test_csv_quotes_names() {
        let csv = Rows::new(&rows(), RowsFormat::Csv).unwrap().to_string();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Customer Name,Transaction Date,Transaction Amount"
        );
        assert_eq!(lines[1], "\"Ahmed, Ali\",2022-01-01,1000");
        assert_eq!(lines[2], "Aya Elsayed,2022-01-02,125");
    }

    #[test]
    fn test_json_rows() {
        let Rows::Json(value) = Rows::new(&rows(), RowsFormat::Json).unwrap() else {
            panic!("expected json");
        };
        assert_eq!(value[0]["customer"]["name"], "Ahmed, Ali");
        assert_eq!(value[1]["transaction"]["amount"], 125.0);
    }

    #[test]
    fn test_out_from_message() {
        let out: Out<String> = "done".into();
        assert_eq!(out.message(), "done");
        assert!(out.structure().is_none());
    }
}
