use crate::model::{Amount, Category, NewTransaction};
use crate::period;
use chrono::NaiveDate;
use std::str::FromStr;
use tracing::{debug, warn};

/// The raw input of the "add expense" form.
///
/// Only presence is checked: description, amount and category must be filled in. Anything else is
/// passed to the store as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub description: String,
    pub amount: String,
    pub category: String,
    /// Defaults to today when not set.
    pub date: Option<NaiveDate>,
    /// The "work-related (reimbursable)" checkbox.
    pub is_reimbursement: bool,
    pub reimbursement_amount: String,
}

impl TransactionForm {
    /// The reimbursement fields are only offered for car spending.
    pub fn shows_reimbursement_fields(&self) -> bool {
        Category::from_str(&self.category).is_ok_and(|c| c.is_car_spending())
    }

    /// Builds the request to send to the store, or `None` if a required field is missing.
    pub fn submit(&self) -> Option<NewTransaction> {
        self.submit_on(period::today())
    }

    /// Like `submit` with an explicit date to use when the form has none.
    pub fn submit_on(&self, today: NaiveDate) -> Option<NewTransaction> {
        let description = self.description.trim();
        if description.is_empty() {
            debug!("Not submitting: the description is empty");
            return None;
        }

        let amount = match self.amount.trim() {
            "" => None,
            s => Amount::from_str(s).ok(),
        };
        let Some(amount) = amount else {
            debug!("Not submitting: the amount '{}' is missing", self.amount);
            return None;
        };

        let category = match Category::from_str(&self.category) {
            Ok(category) if category.is_known() => category,
            _ => {
                debug!(
                    "Not submitting: '{}' is not a selectable category",
                    self.category
                );
                return None;
            }
        };

        let reimbursable = self.is_reimbursement && self.shows_reimbursement_fields();
        let reimbursement_amount = if reimbursable {
            match self.reimbursement_amount.trim() {
                "" => Amount::ZERO,
                s => Amount::from_str(s).unwrap_or_else(|e| {
                    warn!("Ignoring reimbursement amount '{s}': {e}");
                    Amount::ZERO
                }),
            }
        } else {
            Amount::ZERO
        };

        Some(NewTransaction {
            description: description.to_string(),
            amount,
            category,
            date: self.date.unwrap_or(today).format("%Y-%m-%d").to_string(),
            is_reimbursement: reimbursable,
            reimbursement_amount,
        })
    }
}
