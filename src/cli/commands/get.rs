//! `kvpoll get` — retrieve and print a single secret's value.

use crate::cli::{load_settings, vault_client, Cli};
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let settings = load_settings(false)?;
    let client = vault_client(cli, &settings);

    // Print the bare value to stdout.
    let value = client.get(name)?;
    println!("{value}");

    Ok(())
}
