//! `kvpoll delete` — remove a secret from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{load_settings, vault_client, Cli};
use crate::errors::{KvPollError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    crate::vault::validate_secret_name(name)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete secret '{name}'?"))
            .default(false)
            .interact()
            .map_err(|e| KvPollError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let settings = load_settings(false)?;
    let client = vault_client(cli, &settings);

    client.delete(name)?;

    output::success(&format!("Deleted secret '{name}'"));

    Ok(())
}
