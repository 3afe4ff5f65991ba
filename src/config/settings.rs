use std::fmt;

use zeroize::Zeroizing;

use crate::errors::{KvPollError, Result};

/// Process configuration, loaded once from the environment at startup.
///
/// Nothing here is ever written back or persisted. The struct is built in
/// `main` and handed to whatever needs it.
#[derive(Clone)]
pub struct Settings {
    /// Azure AD tenant the client application lives in.
    pub tenant_id: String,

    /// Application (client) id used for the client-credentials exchange.
    pub client_id: String,

    /// Client secret for the application above (zeroized on drop).
    pub client_secret: Zeroizing<String>,

    /// Bare vault name, e.g. `my-vault` for `https://my-vault.vault.azure.net`.
    pub vault_name: String,

    /// Secret polled by the default command (`SECNAME`).
    pub secret_name: Option<String>,
}

// ── Environment variable names ───────────────────────────────────────

pub const TENANT_ID_VAR: &str = "AZURE_TENANT_ID";
pub const CLIENT_ID_VAR: &str = "AZURE_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "AZURE_CLIENT_SECRET";
pub const VAULT_NAME_VAR: &str = "KVAULT";
pub const SECRET_NAME_VAR: &str = "SECNAME";

/// Every variable in the order it is reported back to the user.
pub const ALL_VARS: [&str; 5] = [
    TENANT_ID_VAR,
    CLIENT_ID_VAR,
    CLIENT_SECRET_VAR,
    VAULT_NAME_VAR,
    SECRET_NAME_VAR,
];

// ── Implementation ───────────────────────────────────────────────────

impl Settings {
    /// Load settings from the process environment.
    ///
    /// `require_secret_name` is set by the polling path, which reads the
    /// secret to fetch from `SECNAME` instead of the command line.
    pub fn from_env(require_secret_name: bool) -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok(), require_secret_name)
    }

    /// Load settings through an arbitrary variable lookup.
    ///
    /// Unset and empty variables are treated the same. All missing names are
    /// collected so the error reports them in one go.
    pub fn from_lookup<F>(lookup: F, require_secret_name: bool) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let tenant_id = read(TENANT_ID_VAR);
        let client_id = read(CLIENT_ID_VAR);
        let client_secret = read(CLIENT_SECRET_VAR);
        let vault_name = read(VAULT_NAME_VAR);
        let secret_name = read(SECRET_NAME_VAR);

        let mut missing = Vec::new();
        for (name, value) in [
            (TENANT_ID_VAR, &tenant_id),
            (CLIENT_ID_VAR, &client_id),
            (CLIENT_SECRET_VAR, &client_secret),
            (VAULT_NAME_VAR, &vault_name),
        ] {
            if value.is_none() {
                missing.push(name);
            }
        }
        if require_secret_name && secret_name.is_none() {
            missing.push(SECRET_NAME_VAR);
        }

        match (tenant_id, client_id, client_secret, vault_name) {
            (Some(tenant_id), Some(client_id), Some(client_secret), Some(vault_name))
                if missing.is_empty() =>
            {
                Ok(Self {
                    tenant_id,
                    client_id,
                    client_secret: Zeroizing::new(client_secret),
                    vault_name,
                    secret_name,
                })
            }
            _ => Err(KvPollError::ConfigMissing(missing)),
        }
    }

    /// Base URL of the vault's REST surface.
    ///
    /// Example: `https://my-vault.vault.azure.net`
    pub fn vault_url(&self) -> String {
        format!("https://{}.vault.azure.net", self.vault_name)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"****")
            .field("vault_name", &self.vault_name)
            .field("secret_name", &self.secret_name)
            .finish()
    }
}

/// Render the current value of every variable for a diagnostic line.
///
/// The client secret is masked; only whether it is set is shown.
pub fn describe_env<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ALL_VARS
        .iter()
        .map(|name| {
            let value = lookup(name).unwrap_or_default();
            let shown = if *name == CLIENT_SECRET_VAR && !value.is_empty() {
                "****".to_string()
            } else {
                value
            };
            format!("{name}={shown}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ────────────────────────────────────────────────────────────
