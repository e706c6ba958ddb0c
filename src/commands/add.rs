use crate::args::AddArgs;
use crate::commands::{open_ledger, Out};
use crate::model::{Transaction, TransactionForm};
use crate::{Config, Mode, Result};
use tracing::info;

/// Validates the input the way the entry form does and, if it is complete, creates the expense.
///
/// Incomplete input is not an error: nothing is sent to the store and the message says so.
pub async fn add(config: Config, mode: Mode, args: AddArgs) -> Result<Out<Transaction>> {
    let form = TransactionForm {
        description: args.description().to_string(),
        amount: args.amount().to_string(),
        category: args.category().to_string(),
        date: args.date(),
        is_reimbursement: args.reimbursable(),
        reimbursement_amount: args.reimbursement_amount().unwrap_or_default().to_string(),
    };
    let Some(new) = form.submit() else {
        info!("The expense is incomplete, nothing was sent to the store");
        return Ok(Out::new_message(
            "Nothing was submitted: a description, a numeric amount and a known category are \
            required",
        ));
    };

    let mut ledger = open_ledger(&config, mode).await?;
    let created = ledger.add(new).await?;
    let message = format!(
        "Added {} {} on {} with id {}",
        created.category(),
        created.amount().format(config.currency_symbol()),
        created.raw_date(),
        created.id()
    );
    Ok(Out::new(message, created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Category};
    use crate::test::TestEnv;
    use chrono::NaiveDate;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_add_creates_and_prepends() {
        let env = TestEnv::new().await;
        let args = AddArgs::new("Fuel", "60", "Car - Fuel")
            .with_date(NaiveDate::from_ymd_opt(2025, 8, 12).unwrap())
            .with_reimbursement("25");
        let out = add(env.config(), Mode::Test, args).await.unwrap();
        let created = out.structure().unwrap();
        assert!(out.message().contains(created.id()));
        assert_eq!(created.category(), &Category::CarFuel);
        assert_eq!(
            created.reimbursement_amount(),
            Amount::from_str("25").unwrap()
        );

        let state = env.get_state();
        assert_eq!(state.len(), 13);
        assert_eq!(state.data()[0].id(), created.id());
        assert_eq!(state.data()[0].raw_date(), "2025-08-12");
    }

    #[tokio::test]
    async fn test_add_incomplete_makes_no_store_call() {
        let env = TestEnv::new().await;
        let out = add(env.config(), Mode::Test, AddArgs::new("Fuel", "", "Car - Fuel"))
            .await
            .unwrap();
        assert!(out.structure().is_none());
        assert!(out.message().starts_with("Nothing was submitted"));
        assert_eq!(env.get_state().len(), 12);
    }

    #[tokio::test]
    async fn test_add_defaults_date_to_today() {
        let env = TestEnv::new().await;
        let out = add(env.config(), Mode::Test, AddArgs::new("Milk", "1.10", "Small Shop"))
            .await
            .unwrap();
        let created = out.structure().unwrap();
        assert_eq!(created.date(), Some(crate::period::today()));
        assert!(created.reimbursement_amount().is_zero());
    }
}
