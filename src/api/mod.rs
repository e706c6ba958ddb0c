//! The expense store: where transaction records live.
//!
//! The store is reached through the `Store` trait. `HttpStore` talks to the REST backend and
//! `TestStore` keeps everything in memory so the whole program can run without a server.

mod http_store;
mod test_store;

use crate::model::{NewTransaction, Transaction, Transactions};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub(crate) use http_store::HttpStore;
pub(crate) use test_store::TestStore;

/// The path of the expenses resource relative to the configured API URL.
pub(crate) const EXPENSES_PATH: &str = "api/expenses";

/// Setting this environment variable to any non-empty value selects `Mode::Test`.
pub const TEST_MODE_ENV: &str = "EXPENSES_IN_TEST_MODE";

/// The operations offered by the expense store.
#[async_trait::async_trait]
pub trait Store {
    /// Fetches every record.
    async fn list(&mut self) -> Result<Transactions>;

    /// Creates a record and returns it as stored, with the id the store assigned.
    async fn create(&mut self, new: &NewTransaction) -> Result<Transaction>;

    /// Deletes the record with `id`.
    async fn delete(&mut self, id: &str) -> Result<()>;
}

/// Selects which `Store` implementation the program uses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Talk to the REST backend at the configured API URL.
    #[default]
    Http,
    /// Use an in-memory store seeded with sample data.
    Test,
}

serde_plain::derive_display_from_serialize!(Mode);
serde_plain::derive_fromstr_from_deserialize!(Mode);

impl Mode {
    /// `Mode::Test` when `EXPENSES_IN_TEST_MODE` is set and non-empty, otherwise `Mode::Http`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// Creates the store for `mode`.
pub async fn store(config: &Config, mode: Mode) -> Result<Box<dyn Store + Send>> {
    debug!("Using the {mode} store for {}", config.api_url());
    let store: Box<dyn Store + Send> = match mode {
        Mode::Http => Box::new(HttpStore::new(config.api_url())?),
        Mode::Test => Box::new(TestStore::new(config.api_url().as_str())),
    };
    Ok(store)
}
