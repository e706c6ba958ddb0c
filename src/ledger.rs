//! The local copy of the expense collection and the store it mirrors.

use crate::api::Store;
use crate::model::{NewTransaction, Transaction, Transactions};
use crate::Result;
use tracing::{debug, info, warn};

/// Holds the last known good collection of transactions along with the store it came from.
///
/// Writes go to the store first. The local collection only changes once the store call succeeds,
/// so a failed call leaves it exactly as it was.
pub struct Ledger {
    store: Box<dyn Store + Send>,
    transactions: Transactions,
}

impl Ledger {
    /// Creates a ledger with an empty collection. Call `refresh` to populate it.
    pub fn new(store: Box<dyn Store + Send>) -> Self {
        Self {
            store,
            transactions: Transactions::default(),
        }
    }

    /// Creates a ledger and fetches the collection from `store`.
    pub async fn load(store: Box<dyn Store + Send>) -> Result<Self> {
        let mut ledger = Self::new(store);
        ledger.refresh().await?;
        Ok(ledger)
    }

    pub fn transactions(&self) -> &Transactions {
        &self.transactions
    }

    /// Replaces the collection with a fresh listing from the store.
    pub async fn refresh(&mut self) -> Result<()> {
        let transactions = self.store.list().await.inspect_err(|e| {
            warn!("Unable to fetch expenses, keeping the last known list: {e:#}");
        })?;
        for t in transactions.iter().filter(|t| t.is_over_reimbursed()) {
            warn!(
                "Expense '{}' has a reimbursement of {} which is more than its amount of {}",
                t.id(),
                t.reimbursement_amount(),
                t.amount()
            );
        }
        for t in transactions.with_unreadable_dates() {
            warn!(
                "Expense '{}' has an unreadable date '{}', leaving it out of dated figures",
                t.id(),
                t.raw_date()
            );
        }
        debug!("Loaded {} expenses", transactions.len());
        self.transactions = transactions;
        Ok(())
    }

    /// Creates a transaction in the store and puts the stored record at the front of the
    /// collection.
    pub async fn add(&mut self, new: NewTransaction) -> Result<Transaction> {
        let created = self.store.create(&new).await.inspect_err(|e| {
            warn!("Unable to add expense '{}': {e:#}", new.description());
        })?;
        info!("Added expense '{}'", created.id());
        self.transactions.prepend(created.clone());
        Ok(created)
    }

    /// Deletes a transaction from the store and then from the collection. Returns the removed
    /// record, or `None` if it was not in the local collection.
    pub async fn delete(&mut self, id: &str) -> Result<Option<Transaction>> {
        self.store.delete(id).await.inspect_err(|e| {
            warn!("Unable to delete expense '{id}': {e:#}");
        })?;
        let removed = self.transactions.remove(id);
        if removed.is_none() {
            debug!("Expense '{id}' was not in the local list");
        }
        Ok(removed)
    }
}
