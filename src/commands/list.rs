use crate::args::ListArgs;
use crate::commands::{open_ledger, plural, Out};
use crate::model::{Transaction, Transactions};
use crate::{aggregate, period, Config, Mode, Result};

/// Lists expenses newest first, optionally only those in a period.
pub async fn list(config: Config, mode: Mode, args: ListArgs) -> Result<Out<Transactions>> {
    let ledger = open_ledger(&config, mode).await?;
    let transactions: Transactions = match args.period() {
        None => ledger.transactions().clone(),
        Some(selected) => aggregate::in_period(ledger.transactions(), selected, period::today())
            .cloned()
            .collect(),
    };

    let currency = config.currency_symbol();
    let heading = match args.period() {
        None => plural(transactions.len(), "expense"),
        Some(period) => format!("{} in {period}", plural(transactions.len(), "expense")),
    };
    let message = std::iter::once(heading)
        .chain(transactions.iter().map(|t| line(t, currency)))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Out::new(message, transactions))
}

fn line(t: &Transaction, currency: &str) -> String {
    let mut s = format!(
        "{:<36}  {:<10}  {:<20}  {:>12}  {}",
        t.id(),
        t.raw_date(),
        t.category().as_str(),
        t.amount().format(currency),
        t.description()
    );
    if !t.reimbursement_amount().is_zero() {
        s.push_str(&format!(
            " (reimbursed {})",
            t.reimbursement_amount().format(currency)
        ));
    }
    s
}
