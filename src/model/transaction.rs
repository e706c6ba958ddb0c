use crate::model::{Amount, Category};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::Visitor;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Formatter;
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Represents the expense records held by the expense store, newest first.
///
/// Deserializing skips, with a warning, any record that cannot be read, so one bad record does not
/// cost the rest of the list.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Transactions {
    data: Vec<Transaction>,
}

impl Transactions {
    pub fn new(data: Vec<Transaction>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &Vec<Transaction> {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Finds the transaction with `id`.
    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.data.iter().find(|t| t.id == id)
    }

    /// The transactions whose date cannot be read.
    pub fn with_unreadable_dates(&self) -> impl Iterator<Item = &Transaction> {
        self.data.iter().filter(|t| t.date().is_none())
    }

    /// Inserts a transaction at the front, where the newest records live.
    pub(crate) fn prepend(&mut self, transaction: Transaction) {
        self.data.insert(0, transaction);
    }

    /// Removes the transaction with `id`, returning it if it was present.
    pub(crate) fn remove(&mut self, id: &str) -> Option<Transaction> {
        let ix = self.data.iter().position(|t| t.id == id)?;
        Some(self.data.remove(ix))
    }
}

impl<'de> Deserialize<'de> for Transactions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records = Vec::<serde_json::Value>::deserialize(deserializer)?;
        let data = records
            .into_iter()
            .enumerate()
            .filter_map(
                |(ix, record)| match serde_json::from_value::<Transaction>(record) {
                    Ok(transaction) => Some(transaction),
                    Err(e) => {
                        warn!("Skipping expense record {ix}, it cannot be read: {e}");
                        None
                    }
                },
            )
            .collect();
        Ok(Self::new(data))
    }
}

impl<'a> IntoIterator for &'a Transactions {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl FromIterator<Transaction> for Transactions {
    fn from_iter<T: IntoIterator<Item = Transaction>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A single expense record as stored by the expense store.
///
/// Records are never edited in place: they are created, listed and deleted.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(deserialize_with = "text")]
    pub(crate) id: String,
    #[serde(default, deserialize_with = "text")]
    pub(crate) description: String,
    pub(crate) amount: Amount,
    pub(crate) category: Category,
    /// The date as sent by the store. See `Transaction::date` for the parsed value. A missing or
    /// null date is kept as an empty, unreadable date.
    #[serde(default, deserialize_with = "text")]
    pub(crate) date: String,
    /// Set by the entry form when an expense is work-related. Nothing reads it.
    #[serde(default)]
    pub(crate) is_reimbursement: bool,
    /// The portion of `amount` expected to be repaid.
    #[serde(default)]
    pub(crate) reimbursement_amount: Amount,
    /// When the store created the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) timestamp: Option<String>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
        category: Category,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            amount,
            category,
            date: date.into(),
            ..Default::default()
        }
    }

    /// Sets the reimbursement amount, marking the record as reimbursable when it is non-zero.
    pub fn with_reimbursement(mut self, reimbursement_amount: Amount) -> Self {
        self.is_reimbursement = !reimbursement_amount.is_zero();
        self.reimbursement_amount = reimbursement_amount;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn reimbursement_amount(&self) -> Amount {
        self.reimbursement_amount
    }

    pub fn is_reimbursement(&self) -> bool {
        self.is_reimbursement
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// The date exactly as received from the store.
    pub fn raw_date(&self) -> &str {
        &self.date
    }

    /// The calendar date of the transaction.
    ///
    /// Accepts `YYYY-MM-DD` as well as date-times (RFC 3339 or naive ISO 8601), whose date part is
    /// used as-is without any timezone conversion. Returns `None` when the date cannot be parsed;
    /// callers exclude such records from anything scoped to a period.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// The amount left to pay once the reimbursement amount is repaid.
    pub fn net_amount(&self) -> Amount {
        self.amount - self.reimbursement_amount
    }

    /// True when the reimbursement amount exceeds the amount. Such records are accepted as they
    /// are.
    pub fn is_over_reimbursed(&self) -> bool {
        self.reimbursement_amount > self.amount
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(s) {
        return Some(date_time.date_naive());
    }
    NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT)
        .ok()
        .map(|dt| dt.date())
}

/// Reads a string field that the store may send as a string, a number, a boolean or null. Null
/// becomes the empty string.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TextVisitor)
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = String;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a string, a number or null")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: serde::de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }
}

/// The body sent to the store to create a transaction. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub(crate) description: String,
    pub(crate) amount: Amount,
    pub(crate) category: Category,
    pub(crate) date: String,
    pub(crate) is_reimbursement: bool,
    pub(crate) reimbursement_amount: Amount,
}

impl NewTransaction {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn is_reimbursement(&self) -> bool {
        self.is_reimbursement
    }

    pub fn reimbursement_amount(&self) -> Amount {
        self.reimbursement_amount
    }

    /// Turns the request into a stored record with the given `id`.
    pub(crate) fn into_transaction(self, id: String, timestamp: Option<String>) -> Transaction {
        Transaction {
            id,
            description: self.description,
            amount: self.amount,
            category: self.category,
            date: self.date,
            is_reimbursement: self.is_reimbursement,
            reimbursement_amount: self.reimbursement_amount,
            timestamp,
        }
    }
}
