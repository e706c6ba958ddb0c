//! Implements the `Store` trait against the REST backend using `reqwest`.

use crate::api::{Store, EXPENSES_PATH};
use crate::model::{NewTransaction, Transaction, Transactions};
use crate::Result;
use anyhow::{anyhow, bail, Context};
use reqwest::{Client, Response};
use tracing::{debug, trace};
use url::Url;

/// Talks to `{api_url}/api/expenses`. One request per call, no retries.
pub(crate) struct HttpStore {
    client: Client,
    endpoint: Url,
}

impl HttpStore {
    pub(crate) fn new(api_url: &Url) -> Result<Self> {
        let endpoint = api_url
            .join(EXPENSES_PATH)
            .with_context(|| format!("Unable to build the expenses URL from '{api_url}'"))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
        })
    }

    fn item_url(&self, id: &str) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("The API URL '{}' cannot have a path", self.endpoint))?
            .push(id);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Store for HttpStore {
    async fn list(&mut self) -> Result<Transactions> {
        trace!("GET {}", self.endpoint);
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .context("Failed to send the list request to the expense store")?;
        let response = check_status(response, "list").await?;
        let transactions: Transactions = response
            .json()
            .await
            .context("Failed to parse the expense list")?;
        debug!("Received {} expenses", transactions.len());
        Ok(transactions)
    }

    async fn create(&mut self, new: &NewTransaction) -> Result<Transaction> {
        trace!("POST {}", self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(new)
            .send()
            .await
            .context("Failed to send the create request to the expense store")?;
        let response = check_status(response, "create").await?;
        let created: Transaction = response
            .json()
            .await
            .context("Failed to parse the created expense")?;
        debug!("Created expense '{}'", created.id());
        Ok(created)
    }

    async fn delete(&mut self, id: &str) -> Result<()> {
        let url = self.item_url(id)?;
        trace!("DELETE {url}");
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .with_context(|| format!("Failed to send the delete request for '{id}'"))?;
        check_status(response, "delete").await?;
        Ok(())
    }
}

/// Passes a 2xx response through and turns anything else into an error carrying the status and
/// body.
async fn check_status(response: Response, operation: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response body".to_string());
    bail!("The expense store {operation} failed with status {status}: {body}")
}
