//! Configuration file handling.
//!
//! The configuration file is stored at `$SPEND_HOME/config.json` and holds the remote endpoint,
//! the data source to start with and, optionally, the chart style.

use crate::chart::StyleDescriptor;
use crate::source::{SourceKind, DEFAULT_ENDPOINT};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

const APP_NAME: &str = "customer-spend";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SPEND_HOME` and from there it loads `$SPEND_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    config_path: PathBuf,
    config_file: ConfigFile,
    endpoint: Url,
}

impl Config {
    /// Creates the home directory and an initial `config.json` in it.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the home directory, e.g. `$HOME/customer-spend`
    /// - `endpoint` - The URL of the remote dataset. Defaults to `DEFAULT_ENDPOINT`.
    /// - `source` - The source to load from when none is given on the command line.
    ///
    /// # Errors
    /// - Returns an error if the endpoint is not a valid URL, if the config already exists, or if
    ///   any file operation fails.
    pub async fn create(
        dir: impl Into<PathBuf>,
        endpoint: Option<&str>,
        source: SourceKind,
    ) -> Result<Self> {
        let endpoint_str = endpoint.unwrap_or(DEFAULT_ENDPOINT);
        let endpoint = parse_endpoint(endpoint_str)?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!("A config file already exists at '{}'", config_path.display())
        }

        let config_file = ConfigFile {
            endpoint: endpoint_str.to_string(),
            source,
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            config_path,
            config_file,
            endpoint,
        })
    }

    /// This will
    /// - validate that `home` and its config file exist
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The home directory is missing, run 'spend init' to create it")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let endpoint = parse_endpoint(&config_file.endpoint)?;

        Ok(Self {
            config_path,
            config_file,
            endpoint,
        })
    }

    /// Loads the config from `home` if it has one, otherwise uses the defaults without touching
    /// the filesystem.
    pub async fn load_or_default(home: impl Into<PathBuf>) -> Result<Self> {
        let home = home.into();
        if home.join(CONFIG_JSON).is_file() {
            return Self::load(home).await;
        }
        debug!(
            "No config file in '{}', using default settings",
            home.display()
        );
        let config_file = ConfigFile::default();
        let endpoint = parse_endpoint(&config_file.endpoint)?;
        Ok(Self {
            config_path: home.join(CONFIG_JSON),
            config_file,
            endpoint,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn source(&self) -> SourceKind {
        self.config_file.source
    }

    pub fn style(&self) -> &StyleDescriptor {
        &self.config_file.style
    }

    /// Overrides the endpoint for this run only. The config file is not changed.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.endpoint = parse_endpoint(endpoint)?;
        Ok(self)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "customer-spend",
///   "config_version": 1,
///   "endpoint": "http://localhost:5500/api/data",
///   "source": "remote",
///   "style": { "borderColor": "rgba(0, 0, 0, 1)", "fill": false }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "customer-spend"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL of the remote dataset
    endpoint: String,

    /// The data source used when none is given on the command line
    #[serde(default)]
    source: SourceKind,

    /// Chart style handed to the renderer, missing keys take their default values
    #[serde(default)]
    style: StyleDescriptor,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            source: SourceKind::default(),
            style: StyleDescriptor::default(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or names another application
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).with_context(|| format!("Invalid endpoint URL '{endpoint}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("The endpoint must use http or https, got '{other}'"),
    }
}
