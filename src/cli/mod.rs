//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::time::Duration;

use clap::Parser;

use crate::auth::ClientSecretCredential;
use crate::config::{describe_env, Settings};
use crate::errors::{KvPollError, Result};
use crate::http::{DumpInterceptor, Intercepted, Transport, UreqTransport};
use crate::poller::{DEFAULT_ITERATIONS, DEFAULT_SLEEP};
use crate::vault::VaultClient;

/// kvpoll CLI: Azure Key Vault secret poller.
///
/// Credentials come from `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`,
/// `AZURE_CLIENT_SECRET`; the vault from `KVAULT`; the polled secret from
/// `SECNAME`.
#[derive(Parser)]
#[command(
    name = "kvpoll",
    about = "Azure Key Vault secret poller",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Number of poll iterations
    #[arg(long, default_value_t = DEFAULT_ITERATIONS, global = true)]
    pub interval: u32,

    /// Dump raw HTTP requests and responses to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Seconds to sleep before each fetch
    #[arg(long, default_value_t = DEFAULT_SLEEP.as_secs(), global = true)]
    pub sleep_secs: u64,

    /// HTTP timeout in seconds (default: none)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

/// All available subcommands.
#[derive(Clone, clap::Subcommand)]
pub enum Commands {
    /// Poll the secret named by SECNAME (the default)
    Poll,

    /// List the secrets in the vault (names only, never values)
    List {
        /// Print one name per line instead of a table
        #[arg(long)]
        plain: bool,
    },

    /// Get a secret's value
    Get {
        /// Secret name
        name: String,
    },

    /// Set a secret (add or update)
    Set {
        /// Secret name (e.g. db-pass)
        name: String,
        /// Secret value (omit to read stdin or prompt)
        value: Option<String>,
    },

    /// Delete a secret
    Delete {
        /// Secret name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from the environment.
///
/// When anything is missing, the current value of every variable is echoed
/// (client secret masked) before the error is returned, so the user can see
/// what the process actually received.
pub fn load_settings(require_secret_name: bool) -> Result<Settings> {
    Settings::from_env(require_secret_name).map_err(|e| {
        if matches!(e, KvPollError::ConfigMissing(_)) {
            println!("{}", describe_env(|name| std::env::var(name).ok()));
        }
        e
    })
}

/// Build a vault client wired for this invocation.
///
/// The token exchange gets its own transport; only vault traffic is dumped
/// under `--debug`.
pub fn vault_client(cli: &Cli, settings: &Settings) -> VaultClient {
    let timeout = cli.timeout_secs.map(Duration::from_secs);

    let credential = ClientSecretCredential::new(settings, Box::new(UreqTransport::new(timeout)));

    let transport: Box<dyn Transport> = if cli.debug {
        Box::new(Intercepted::new(Box::new(UreqTransport::new(timeout))).with(DumpInterceptor))
    } else {
        Box::new(UreqTransport::new(timeout))
    };

    tracing::debug!(vault = %settings.vault_url(), debug = cli.debug, "vault client ready");
    VaultClient::new(settings.vault_url(), transport, Box::new(credential))
}
