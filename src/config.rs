//! Configuration file handling for the expenses CLI.
//!
//! The configuration file is stored at `$EXPENSES_HOME/config.json` and holds the URL of the
//! expense store and display settings.

use crate::model::DEFAULT_CURRENCY;
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "expenses";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EXPENSES_HOME` and from there it loads `$EXPENSES_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    api_url: Url,
}

impl Config {
    /// Creates the data directory and an initial `config.json` in it.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory, e.g. `$HOME/expenses`
    /// - `api_url` - The base URL of the expense store, e.g. `http://localhost:5000`. Records are
    ///   read and written at `{api_url}/api/expenses`.
    /// - `currency_symbol` - The symbol to print amounts with, `£` when `None`.
    ///
    /// # Errors
    /// - Returns an error if the URL is not an http(s) URL or if any file operation fails.
    pub async fn create(
        dir: impl Into<PathBuf>,
        api_url: &str,
        currency_symbol: Option<&str>,
    ) -> Result<Self> {
        let api_url = parse_api_url(api_url)?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the expenses home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = ConfigFile {
            api_url: api_url.to_string(),
            currency_symbol: currency_symbol.map(str::to_string),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            api_url,
        })
    }

    /// This will
    /// - validate that `expenses_home` exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(expenses_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = expenses_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The expenses home directory is missing, run 'expenses init' first")?;

        let _ = utils::read_dir(&root)
            .await
            .context("Expenses home is not a readable directory")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let api_url = parse_api_url(&config_file.api_url)
            .with_context(|| format!("Invalid api_url in '{}'", config_path.display()))?;

        Ok(Self {
            root,
            config_path,
            config_file,
            api_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The base URL of the expense store, always ending in `/`.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn currency_symbol(&self) -> &str {
        self.config_file
            .currency_symbol
            .as_deref()
            .unwrap_or(DEFAULT_CURRENCY)
    }
}

/// Parses the base URL of the expense store. Only http and https are accepted and a trailing slash
/// is added so that relative paths join beneath it.
fn parse_api_url(s: &str) -> Result<Url> {
    let mut url = Url::parse(s.trim()).with_context(|| format!("Invalid API URL '{s}'"))?;
    ensure!(
        matches!(url.scheme(), "http" | "https"),
        "The API URL must be http or https, got '{}'",
        url.scheme()
    );
    ensure!(
        url.query().is_none() && url.fragment().is_none(),
        "The API URL must not have a query or fragment, got '{s}'"
    );
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expenses",
///   "config_version": 1,
///   "api_url": "http://localhost:5000/",
///   "currency_symbol": "£"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expenses"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the expense store
    api_url: String,

    /// The symbol amounts are printed with, defaults to £
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency_symbol: Option<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url: String::new(),
            currency_symbol: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from `path`, checking that it belongs to this app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;
        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
