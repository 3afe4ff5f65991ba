//! `kvpoll list` — display the secrets in the vault (never their values).

use crate::cli::output;
use crate::cli::{load_settings, vault_client, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, plain: bool) -> Result<()> {
    let settings = load_settings(false)?;
    let client = vault_client(cli, &settings);

    let secrets = client.list()?;

    if plain {
        for s in &secrets {
            println!("{}", s.name);
        }
        return Ok(());
    }

    output::info(&format!(
        "{} — {} secret(s)",
        settings.vault_name,
        secrets.len()
    ));

    output::print_secrets_table(&secrets);

    Ok(())
}
