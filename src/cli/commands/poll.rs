//! `kvpoll poll` — the default command: fetch `SECNAME` repeatedly.

use std::io;
use std::time::Duration;

use crate::cli::{load_settings, vault_client, Cli};
use crate::config::settings::SECRET_NAME_VAR;
use crate::errors::{KvPollError, Result};
use crate::poller::Poller;

/// Execute the `poll` command.
pub fn execute(cli: &Cli) -> Result<()> {
    // All five variables must be present before any network call.
    let settings = load_settings(true)?;
    let name = settings
        .secret_name
        .clone()
        .ok_or_else(|| KvPollError::ConfigMissing(vec![SECRET_NAME_VAR]))?;

    let client = vault_client(cli, &settings);
    let poller = Poller::new(cli.interval, Duration::from_secs(cli.sleep_secs));

    tracing::debug!(
        secret = %name,
        iterations = poller.iterations,
        sleep_secs = cli.sleep_secs,
        "starting poll"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    poller.run(&client, &name, &mut out, std::thread::sleep)?;

    Ok(())
}
