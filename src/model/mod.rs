//! Types that represent the core data model, such as `Transaction` and `Category`.
mod amount;
mod category;
mod form;
mod transaction;

pub use amount::{Amount, AmountError, DEFAULT_CURRENCY};
pub use category::{Category, CategoryGroup};
pub use form::TransactionForm;
pub use transaction::{NewTransaction, Transaction, Transactions};
