//! A line-oriented event loop on top of `Dashboard`.
//!
//! Each input line is one user event: typing in a filter box, clicking a row, toggling the data
//! source. After every event the affected view is written out, so a script piped into `spend
//! session` sees the same sequence of tables and charts an interactive user would.

use crate::args::RowsFormat;
use crate::commands::{Out, Rows};
use crate::dashboard::{ChartView, Dashboard};
use crate::model::CustomerId;
use crate::source::{self, SourceKind};
use crate::{Config, Result};
use anyhow::{bail, Context};
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};
use url::Url;

const HELP: &str = "\
Commands:
  name <text>     filter customers by name, an empty text clears the filter
  amount <text>   filter transactions by exact amount, an empty text clears the filter
  click <row>     select the customer of a table row, counting from 0
  select <id>     select a customer by id
  toggle          switch between the remote and fixture sources and reload
  reload          load the current source again
  rows            print the table
  chart           print the chart of the selected customer
  help            print this text
  quit            leave the session";

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Name(String),
    Amount(String),
    Click(usize),
    Select(CustomerId),
    Toggle,
    Reload,
    Rows,
    Chart,
    Help,
    Quit,
}

impl FromStr for Event {
    type Err = anyhow::Error;

    /// Only the single separator after the command word is removed. Filter text is kept exactly as
    /// typed, so `amount` followed by two spaces filters by `" "` and matches nothing.
    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim_start();
        let (word, text) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let arg = text.trim();
        Ok(match word {
            "name" => Event::Name(text.to_string()),
            "amount" => Event::Amount(text.to_string()),
            "click" => Event::Click(
                arg.parse()
                    .with_context(|| format!("'{arg}' is not a row number"))?,
            ),
            "select" => Event::Select(
                arg.parse()
                    .with_context(|| format!("'{arg}' is not a customer id"))?,
            ),
            "toggle" => Event::Toggle,
            "reload" => Event::Reload,
            "rows" => Event::Rows,
            "chart" => Event::Chart,
            "help" | "?" => Event::Help,
            "quit" | "exit" => Event::Quit,
            other => bail!("Unknown command '{other}', type 'help' for the list of commands"),
        })
    }
}

struct Session<W> {
    dashboard: Dashboard,
    kind: SourceKind,
    endpoint: Url,
    out: W,
}

impl<W> Session<W>
where
    W: AsyncWrite + Unpin,
{
    async fn load(&mut self) {
        let result = source::load(self.kind, &self.endpoint).await;
        if !self.dashboard.on_load(result) {
            warn!(
                "The {} source could not be loaded, keeping the current data",
                self.kind
            );
        }
    }

    /// Handles one event. Returns `false` when the session should end.
    async fn handle(&mut self, event: Event) -> Result<bool> {
        debug!("{event:?}");
        match event {
            Event::Name(text) => {
                self.dashboard.set_name_pattern(text);
                self.write_rows().await?;
            }
            Event::Amount(text) => {
                self.dashboard.set_amount_exact(text);
                self.write_rows().await?;
            }
            Event::Click(position) => {
                if self.dashboard.click_row(position).is_some() {
                    self.write_chart().await?;
                }
            }
            Event::Select(id) => {
                if self.dashboard.select_customer(id).is_some() {
                    self.write_chart().await?;
                }
            }
            Event::Toggle => {
                self.kind = self.kind.toggle();
                info!("Switched to the {} source", self.kind);
                self.load().await;
                self.write_rows().await?;
            }
            Event::Reload => {
                self.load().await;
                self.write_rows().await?;
            }
            Event::Rows => self.write_rows().await?,
            Event::Chart => self.write_chart().await?,
            Event::Help => self.write(HELP).await?,
            Event::Quit => return Ok(false),
        }
        Ok(true)
    }

    async fn write_rows(&mut self) -> Result<()> {
        let text = Rows::new(self.dashboard.rows(), RowsFormat::Table)?.to_string();
        self.write(&text).await
    }

    async fn write_chart(&mut self) -> Result<()> {
        let text = match self.dashboard.chart() {
            ChartView::NoSelection => "No customer selected".to_string(),
            ChartView::Selected(selected) => selected.summary().to_string(),
        };
        self.write(&text).await
    }

    async fn write(&mut self, text: &str) -> Result<()> {
        self.out
            .write_all(text.as_bytes())
            .await
            .context("Unable to write the session output")?;
        if !text.ends_with('\n') {
            self.out
                .write_all(b"\n")
                .await
                .context("Unable to write the session output")?;
        }
        self.out
            .flush()
            .await
            .context("Unable to flush the session output")
    }
}

/// Runs the session on stdin and stdout until `quit` or the end of input.
pub async fn session(config: Config, kind: SourceKind) -> Result<Out<String>> {
    let input = BufReader::new(tokio::io::stdin());
    run_session(config, kind, input, tokio::io::stdout()).await
}

/// Runs a session reading events from `input` and writing views to `output`.
///
/// The first load happens before any input is read. A failed load, at the start or later, is
/// logged and the session carries on with the data it has. Lines that are not valid commands are
/// logged and skipped.
pub async fn run_session<R, W>(
    config: Config,
    kind: SourceKind,
    input: R,
    output: W,
) -> Result<Out<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = Session {
        dashboard: Dashboard::new(config.style().clone()),
        kind,
        endpoint: config.endpoint().clone(),
        out: output,
    };
    session.load().await;
    session.write_rows().await?;

    let mut lines = input.lines();
    let mut handled = 0usize;
    while let Some(line) = lines
        .next_line()
        .await
        .context("Unable to read the session input")?
    {
        if line.trim().is_empty() {
            continue;
        }
        let event = match line.parse::<Event>() {
            Ok(event) => event,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };
        handled += 1;
        if !session.handle(event).await? {
            break;
        }
    }

    Ok(format!("Session ended after {handled} commands").into())
}
