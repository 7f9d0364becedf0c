use clap::Parser;
use customer_spend::args::{Args, Command, Common};
use customer_spend::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let common = args.common();
    let home = common.spend_home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => {
            let source = common.source().unwrap_or_default();
            commands::init(home, common.endpoint(), source)
                .await?
                .print()
        }

        Command::Rows(rows_args) => {
            let config = load_config(common).await?;
            let kind = common.source().unwrap_or(config.source());
            commands::rows(config, kind, rows_args.clone())
                .await?
                .print()
        }

        Command::Chart(chart_args) => {
            let config = load_config(common).await?;
            let kind = common.source().unwrap_or(config.source());
            commands::chart(config, kind, chart_args.clone())
                .await?
                .print()
        }

        Command::Session => {
            let config = load_config(common).await?;
            let kind = common.source().unwrap_or(config.source());
            commands::session(config, kind).await?.print()
        }

        Command::Serve(serve_args) => commands::serve(serve_args.addr()).await?.print(),
    };
    Ok(())
}

/// Loads the config file if there is one and applies the command line overrides.
async fn load_config(common: &Common) -> Result<Config> {
    let config = Config::load_or_default(common.spend_home().path()).await?;
    match common.endpoint() {
        Some(endpoint) => config.with_endpoint(endpoint),
        None => Ok(config),
    }
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                "customer_spend",
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
