//! `kvpoll set` — add or update a secret in the vault.

use std::io::{self, IsTerminal, Read};

use crate::cli::output;
use crate::cli::{load_settings, vault_client, Cli};
use crate::errors::{KvPollError, Result};

/// Execute the `set` command.
pub fn execute(cli: &Cli, name: &str, value: Option<&str>) -> Result<()> {
    crate::vault::validate_secret_name(name)?;

    // Determine the secret value from one of three sources.
    let secret_value = if let Some(v) = value {
        // Source 1: Inline value on the command line.
        output::warning("Value provided on command line — it may appear in shell history.");
        v.to_string()
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf.trim_end().to_string()
    } else {
        // Source 3: Interactive secure prompt (default).
        dialoguer::Password::new()
            .with_prompt(format!("Enter value for {name}"))
            .interact()
            .map_err(|e| KvPollError::CommandFailed(format!("input prompt: {e}")))?
    };

    let settings = load_settings(false)?;
    let client = vault_client(cli, &settings);

    // The vault versions the secret itself; the latest write wins.
    client.set(name, &secret_value)?;

    output::success(&format!(
        "Secret '{}' set in vault '{}'",
        name, settings.vault_name
    ));

    Ok(())
}
