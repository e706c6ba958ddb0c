use crate::args::DeleteArgs;
use crate::commands::{open_ledger, Out};
use crate::{Config, Mode, Result};

/// Deletes the expense with the given id. Deleting an id the store does not have is not an error.
pub async fn delete(config: Config, mode: Mode, args: DeleteArgs) -> Result<Out<String>> {
    let mut ledger = open_ledger(&config, mode).await?;
    let id = args.id().to_string();
    let message = match ledger.delete(&id).await? {
        Some(removed) => format!(
            "Deleted {} {} '{}'",
            removed.category(),
            removed.amount().format(config.currency_symbol()),
            removed.description()
        ),
        None => format!("No expense with id '{id}' was listed, the store was asked to delete it"),
    };
    Ok(Out::new(message, id))
}
