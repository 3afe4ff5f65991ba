//! Wire types for secrets exchanged with the vault, plus name validation.
//!
//! The vault reports timestamps as Unix seconds inside an `attributes`
//! object; they are converted to `chrono` values for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{KvPollError, Result};

/// Longest secret name the vault accepts.
const MAX_SECRET_NAME_LEN: usize = 127;

/// Response body of `GET /secrets/{name}` and `PUT /secrets/{name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SecretBundle {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: Option<SecretAttributes>,
}

/// Request body of `PUT /secrets/{name}`.
#[derive(Debug, Serialize)]
pub struct SetSecretParameters<'a> {
    pub value: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretAttributes {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub updated: Option<i64>,
}

/// One page of `GET /secrets`.
#[derive(Debug, Deserialize)]
pub struct SecretListPage {
    #[serde(default)]
    pub value: Vec<SecretListEntry>,
    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SecretListEntry {
    pub id: String,
    #[serde(default)]
    pub attributes: Option<SecretAttributes>,
    #[serde(rename = "contentType", default)]
    pub content_type: Option<String>,
}

/// Error envelope the vault returns on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct VaultErrorBody {
    pub error: VaultErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct VaultErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Lightweight metadata about a secret (no value).
///
/// Returned by `VaultClient::list` so callers can display names and
/// timestamps without fetching any secret value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretItem {
    pub name: String,
    pub enabled: Option<bool>,
    pub content_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SecretItem {
    /// Build an item from a list entry; `None` if the id has no name segment.
    pub fn from_entry(entry: SecretListEntry) -> Option<Self> {
        let name = entry.id.trim_end_matches('/').rsplit('/').next()?;
        if name.is_empty() {
            return None;
        }
        let attrs = entry.attributes.unwrap_or_default();
        Some(Self {
            name: name.to_string(),
            enabled: attrs.enabled,
            content_type: entry.content_type,
            created_at: attrs.created.and_then(|s| DateTime::from_timestamp(s, 0)),
            updated_at: attrs.updated.and_then(|s| DateTime::from_timestamp(s, 0)),
        })
    }
}

/// Validate a secret name before it is placed in a request path.
///
/// Allowed: ASCII letters, digits, hyphens; 1 to 127 characters. This is
/// what the vault itself accepts, and it keeps names from altering the URL.
pub fn validate_secret_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.len() > MAX_SECRET_NAME_LEN
        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(KvPollError::InvalidSecretName(name.to_string()));
    }
    Ok(())
}
