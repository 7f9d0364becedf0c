//! These structs provide the CLI interface for the spend CLI.

use crate::model::CustomerId;
use crate::source::SourceKind;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// spend: A command-line tool for browsing customer transactions and charting a customer's
/// spending per day.
///
/// Data is loaded either from a remote endpoint that serves a JSON document with `customers` and
/// `transactions`, or from a copy of that document bundled with the program. Run `spend serve` to
/// host the bundled copy at the default endpoint.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and write an initial config.json into it.
    ///
    /// This is optional. Without a config file the program uses the default endpoint
    /// (http://localhost:5500/api/data) and the remote source. Pass --endpoint and --source to
    /// store other values.
    Init,
    /// Print the joined customer/transaction table, narrowed by the optional filters.
    Rows(RowsArgs),
    /// Print the chart of one customer's spending per day as JSON.
    Chart(ChartArgs),
    /// Read commands from stdin and print the table and chart as they change.
    ///
    /// Type `help` in the session for the list of commands.
    Session,
    /// Serve the bundled dataset over HTTP at /api/data.
    Serve(ServeArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the config file is held. Defaults to ~/customer-spend
    #[arg(long, env = "SPEND_HOME", default_value_t = default_spend_home())]
    spend_home: DisplayPath,

    /// Where to load data from. Overrides the config file.
    #[arg(long, value_enum)]
    source: Option<SourceKind>,

    /// The URL of the remote dataset. Overrides the config file.
    #[arg(long)]
    endpoint: Option<String>,
}

impl Common {
    pub fn new(log_level: LevelFilter, spend_home: PathBuf) -> Self {
        Self {
            log_level,
            spend_home: spend_home.into(),
            source: None,
            endpoint: None,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn spend_home(&self) -> &DisplayPath {
        &self.spend_home
    }

    pub fn source(&self) -> Option<SourceKind> {
        self.source
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

/// The two filter boxes above the table.
#[derive(Debug, Parser, Clone, Default)]
pub struct FilterArgs {
    /// Keep customers whose name contains this text, ignoring case.
    #[arg(long, default_value = "")]
    name: String,

    /// Keep transactions whose amount equals this number, e.g. 1000 or 125.5
    #[arg(long, default_value = "")]
    amount: String,
}

impl FilterArgs {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }
}

/// (Not shown): Args for the `spend rows` command.
#[derive(Debug, Parser, Clone)]
pub struct RowsArgs {
    #[clap(flatten)]
    filter: FilterArgs,

    /// The output format of the table.
    #[arg(long, value_enum, default_value_t = RowsFormat::Table)]
    format: RowsFormat,
}

impl RowsArgs {
    pub fn new(filter: FilterArgs, format: RowsFormat) -> Self {
        Self { filter, format }
    }

    pub fn filter(&self) -> &FilterArgs {
        &self.filter
    }

    pub fn format(&self) -> RowsFormat {
        self.format
    }
}

/// How table rows are written to stdout.
#[derive(
    Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum RowsFormat {
    /// A markdown table.
    #[default]
    Table,
    /// A JSON array of objects.
    Json,
    /// Comma separated values with a header line.
    Csv,
}

serde_plain::derive_display_from_serialize!(RowsFormat);
serde_plain::derive_fromstr_from_deserialize!(RowsFormat);

/// (Not shown): Args for the `spend chart` command.
#[derive(Debug, Parser, Clone)]
pub struct ChartArgs {
    /// The id of the customer to chart.
    #[arg(long, conflicts_with = "row", required_unless_present = "row")]
    customer: Option<CustomerId>,

    /// Chart the customer of this table row instead, counting from 0 after the filters are applied.
    #[arg(long)]
    row: Option<usize>,

    #[clap(flatten)]
    filter: FilterArgs,
}

/// Which customer `spend chart` should draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ChartTarget {
    Customer(CustomerId),
    Row(usize),
}

impl ChartArgs {
    pub fn new(target: ChartTarget, filter: FilterArgs) -> Self {
        let (customer, row) = match target {
            ChartTarget::Customer(id) => (Some(id), None),
            ChartTarget::Row(position) => (None, Some(position)),
        };
        Self {
            customer,
            row,
            filter,
        }
    }

    pub fn target(&self) -> ChartTarget {
        match (self.customer, self.row) {
            (Some(id), _) => ChartTarget::Customer(id),
            (None, Some(position)) => ChartTarget::Row(position),
            // clap requires one of the two
            (None, None) => ChartTarget::Row(0),
        }
    }

    pub fn filter(&self) -> &FilterArgs {
        &self.filter
    }
}

/// (Not shown): Args for the `spend serve` command.
#[derive(Debug, Parser, Clone)]
pub struct ServeArgs {
    /// The address to listen on.
    #[arg(long, default_value = "127.0.0.1:5500")]
    addr: SocketAddr,
}

impl ServeArgs {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

fn default_spend_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("customer-spend"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --spend-home or SPEND_HOME instead of relying on the default \
                home directory.",
            );
            PathBuf::from("customer-spend")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
