//! Implements the `Store` trait with in-memory data.
//!
//! This is compiled into the program too, so that everything can be run top-to-bottom without an
//! expense server. State is shared per API URL, so separate `TestStore` instances pointed at the
//! same URL see the same records for the life of the process.

use crate::api::Store;
use crate::model::{NewTransaction, Transaction, Transactions};
use crate::Result;
use anyhow::Context;
use chrono::Local;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

static STATE: LazyLock<Mutex<HashMap<String, Transactions>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn state() -> MutexGuard<'static, HashMap<String, Transactions>> {
    STATE.lock().unwrap_or_else(|e| e.into_inner())
}

/// An in-memory expense store keyed by API URL. A key seen for the first time is seeded with
/// sample data.
pub(crate) struct TestStore {
    key: String,
}

impl TestStore {
    pub(crate) fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// A copy of the records currently held under this store's key.
    pub(crate) fn get_state(&self) -> Result<Transactions> {
        let mut state = state();
        Ok(seeded(&mut state, &self.key)?.clone())
    }

    /// Replaces the records held under this store's key.
    #[cfg(test)]
    pub(crate) fn set_state(&self, transactions: Transactions) {
        state().insert(self.key.clone(), transactions);
    }
}

#[async_trait::async_trait]
impl Store for TestStore {
    async fn list(&mut self) -> Result<Transactions> {
        self.get_state()
    }

    async fn create(&mut self, new: &NewTransaction) -> Result<Transaction> {
        let transaction = new.clone().into_transaction(
            Uuid::new_v4().to_string(),
            Some(Local::now().to_rfc3339()),
        );
        let mut state = state();
        seeded(&mut state, &self.key)?.prepend(transaction.clone());
        debug!("Stored expense '{}' in memory", transaction.id());
        Ok(transaction)
    }

    async fn delete(&mut self, id: &str) -> Result<()> {
        let mut state = state();
        if seeded(&mut state, &self.key)?.remove(id).is_none() {
            debug!("Expense '{id}' was not in the in-memory store");
        }
        Ok(())
    }
}

fn seeded<'a>(
    state: &'a mut HashMap<String, Transactions>,
    key: &str,
) -> Result<&'a mut Transactions> {
    if !state.contains_key(key) {
        state.insert(key.to_string(), seed_data()?);
    }
    state
        .get_mut(key)
        .with_context(|| format!("No in-memory expenses for '{key}'"))
}

/// Parses the seed records, newest first.
fn seed_data() -> Result<Transactions> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(SEED_DATA.as_bytes());
    let mut data = Vec::new();
    for result in reader.deserialize() {
        let transaction: Transaction = result.context("Unable to parse seed expense data")?;
        data.push(transaction);
    }
    Ok(Transactions::new(data))
}

/// Seed expense data.
const SEED_DATA: &str = r##"id,description,amount,category,date,isReimbursement,reimbursementAmount
seed-0012,Tesco weekly shop,64.20,Groceries,2025-08-09,false,0
seed-0011,Fuel reimbursement July,45.00,Fuel Reimbursement,2025-08-08,false,0
seed-0010,Shell fill up,72.15,Car - Fuel,2025-08-06,true,30.00
seed-0009,Corner shop milk,3.85,Small Shop,2025-08-05,false,0
seed-0008,Pizza with friends,28.50,Dining,2025-08-02,false,0
seed-0007,Council tax August,1050.00,Rent and Council Tax,2025-08-01,false,0
seed-0006,Broadband,32.00,Internet,2025-07-28,false,0
seed-0005,MOT and service,240.00,Car - Maintenance,2025-07-22,true,120.00
seed-0004,Sainsbury's,51.37,Groceries,2025-07-19,false,0
seed-0003,Electricity,96.40,Utilities,2025-07-15,false,0
seed-0002,BP fill up,68.90,Car - Fuel,2025-07-11,false,0
seed-0001,Thai takeaway,22.75,Dining,2025-07-04,false,0
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Category};
    use std::str::FromStr;

    fn key() -> String {
        format!("http://test-{}.invalid/", Uuid::new_v4())
    }

    #[test]
    fn test_seed_data_parses() {
        let transactions = seed_data().unwrap();
        assert_eq!(transactions.len(), 12);
        let first = &transactions.data()[0];
        assert_eq!(first.id(), "seed-0012");
        assert_eq!(first.category(), &Category::Groceries);
        assert_eq!(first.amount(), Amount::from_str("64.20").unwrap());
        let fuel = transactions.get("seed-0010").unwrap();
        assert!(fuel.is_reimbursement());
        assert_eq!(fuel.reimbursement_amount(), Amount::from_str("30").unwrap());
        assert!(transactions.iter().all(|t| t.category().is_known()));
        assert!(transactions.iter().all(|t| t.date().is_some()));
    }

    #[tokio::test]
    async fn test_create_prepends_with_new_id() {
        let mut store = TestStore::new(key());
        let new = NewTransaction {
            description: "Bread".to_string(),
            amount: Amount::from_str("1.50").unwrap(),
            category: Category::SmallShop,
            date: "2025-08-10".to_string(),
            is_reimbursement: false,
            reimbursement_amount: Amount::ZERO,
        };
        let created = store.create(&new).await.unwrap();
        assert!(!created.id().is_empty());
        assert!(created.timestamp().is_some());
        assert_eq!(created.description(), "Bread");

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 13);
        assert_eq!(listed.data()[0].id(), created.id());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let mut store = TestStore::new(key());
        store.delete("seed-0001").await.unwrap();
        store.delete("seed-0001").await.unwrap();
        store.delete("no-such-id").await.unwrap();
        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 11);
        assert!(listed.get("seed-0001").is_none());
    }

    #[tokio::test]
    async fn test_state_is_shared_by_key() {
        let key = key();
        let mut a = TestStore::new(key.clone());
        let b = TestStore::new(key);
        a.delete("seed-0002").await.unwrap();
        assert!(b.get_state().unwrap().get("seed-0002").is_none());

        let other = TestStore::new(self::key());
        assert!(other.get_state().unwrap().get("seed-0002").is_some());
    }

    #[test]
    fn test_set_state() {
        let store = TestStore::new(key());
        store.set_state(Transactions::default());
        assert!(store.get_state().unwrap().is_empty());
    }
}
