use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json` file pointing at `api_url`.
///
/// # Arguments
/// - `expenses_home` - The directory that will be the root of data directory, e.g.
///   `$HOME/expenses`
/// - `api_url` - The base URL of the expense store, e.g. `http://localhost:5000`
/// - `currency` - The symbol to print amounts with, `£` when `None`
///
/// # Errors
/// - Returns an error if the URL is invalid or any file operation fails.
pub async fn init(expenses_home: &Path, api_url: &str, currency: Option<&str>) -> Result<Out<()>> {
    let config = Config::create(expenses_home, api_url, currency)
        .await
        .context("Unable to create the data directory and config")?;
    Ok(format!(
        "Successfully created the expenses directory and config at {}",
        config.config_path().display()
    )
    .into())
}
