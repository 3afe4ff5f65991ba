//! Authentication — OAuth2 client-credentials exchange against Azure AD.
//!
//! The vault client asks a [`TokenProvider`] for an `Authorization` header
//! value before each request. [`ClientSecretCredential`] fetches a token
//! lazily and caches it until shortly before it expires.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Deserialize;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{KvPollError, Result};
use crate::http::{HttpRequest, Method, Transport};

/// Default Azure AD authority.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Scope requested for Key Vault data-plane access.
pub const VAULT_SCOPE: &str = "https://vault.azure.net/.default";

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Refresh this long before the reported expiry.
const EXPIRY_SKEW_SECS: u64 = 60;

/// Supplies the value of the `Authorization` header.
pub trait TokenProvider {
    fn bearer(&self) -> Result<String>;
}

/// A token fresh from the token endpoint.
///
/// `expires_in` is how long it may be reused: the reported lifetime less the
/// refresh skew, zero for tokens that live no longer than the skew.
pub struct AccessToken {
    pub token: Zeroizing<String>,
    pub expires_in: Duration,
}

struct CachedToken {
    token: Zeroizing<String>,
    expires_at: Instant,
}

/// Client-credentials flow using a tenant, client id and client secret.
pub struct ClientSecretCredential {
    tenant_id: String,
    client_id: String,
    client_secret: Zeroizing<String>,
    authority: String,
    scope: String,
    transport: Box<dyn Transport>,
    cache: Mutex<Option<CachedToken>>,
}

impl ClientSecretCredential {
    pub fn new(settings: &Settings, transport: Box<dyn Transport>) -> Self {
        Self {
            tenant_id: settings.tenant_id.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            authority: DEFAULT_AUTHORITY.to_string(),
            scope: VAULT_SCOPE.to_string(),
            transport,
            cache: Mutex::new(None),
        }
    }

    /// Point the credential at a different authority host.
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into().trim_end_matches('/').to_string();
        self
    }

    /// Token endpoint URL for the configured tenant.
    pub fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority, self.tenant_id)
    }

    /// Perform one client-credentials exchange, bypassing the cache.
    pub fn request_token(&self) -> Result<AccessToken> {
        let request = HttpRequest::new(Method::Post, self.token_url()).form(vec![
            ("grant_type".into(), "client_credentials".into()),
            ("client_id".into(), self.client_id.clone()),
            ("client_secret".into(), self.client_secret.to_string()),
            ("scope".into(), self.scope.clone()),
        ]);

        let response = self
            .transport
            .send(&request)
            .map_err(|e| KvPollError::AuthFailure(format!("failed to request token: {e}")))?;

        if !response.is_success() {
            let detail = serde_json::from_str::<TokenErrorResponse>(&response.body)
                .ok()
                .and_then(|e| e.error_description.or(e.error))
                .unwrap_or(response.body);
            return Err(KvPollError::AuthFailure(format!(
                "token endpoint rejected the request ({}): {detail}",
                response.status
            )));
        }

        let payload: TokenResponse = serde_json::from_str(&response.body).map_err(|e| {
            KvPollError::AuthFailure(format!("failed to parse token response: {e}"))
        })?;

        let expires_in = payload
            .expires_in
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS)
            .saturating_sub(EXPIRY_SKEW_SECS);

        tracing::debug!(
            tenant_id = %self.tenant_id,
            expires_in,
            "obtained vault access token"
        );

        Ok(AccessToken {
            token: Zeroizing::new(payload.access_token),
            expires_in: Duration::from_secs(expires_in),
        })
    }
}

impl TokenProvider for ClientSecretCredential {
    fn bearer(&self) -> Result<String> {
        let mut guard = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = guard.as_ref() {
            if Instant::now() < cached.expires_at {
                return Ok(format!("Bearer {}", cached.token.as_str()));
            }
        }

        let fresh = self.request_token()?;
        let header = format!("Bearer {}", fresh.token.as_str());
        *guard = Some(CachedToken {
            token: fresh.token,
            expires_at: Instant::now() + fresh.expires_in,
        });
        Ok(header)
    }
}

/// A pre-issued bearer token, used as-is.
pub struct StaticToken {
    header: Zeroizing<String>,
}

impl StaticToken {
    pub fn new(token: &str) -> Self {
        let trimmed = token.trim();
        let header = if trimmed.to_ascii_lowercase().starts_with("bearer ") {
            trimmed.to_string()
        } else {
            format!("Bearer {trimmed}")
        };
        Self {
            header: Zeroizing::new(header),
        }
    }
}

impl TokenProvider for StaticToken {
    fn bearer(&self) -> Result<String> {
        Ok(self.header.to_string())
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}
