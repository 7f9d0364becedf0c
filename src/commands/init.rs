use crate::commands::Out;
use crate::source::SourceKind;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory and an initial `config.json` file in it.
///
/// # Arguments
/// - `spend_home` - The directory that will hold the config, e.g. `$HOME/customer-spend`
/// - `endpoint` - The URL of the remote dataset, the default endpoint when `None`.
/// - `source` - The source that later commands load from unless told otherwise.
///
/// # Errors
/// - Returns an error if the endpoint is invalid, a config already exists, or a file operation
///   fails.
pub async fn init(
    spend_home: &Path,
    endpoint: Option<&str>,
    source: SourceKind,
) -> Result<Out<String>> {
    let config = Config::create(spend_home, endpoint, source)
        .await
        .context("Unable to create the home directory and config")?;
    Ok(Out::new(
        "Successfully created the home directory and config",
        config.config_path().display().to_string(),
    ))
}
