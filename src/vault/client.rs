//! Key Vault REST client.
//!
//! `VaultClient` turns the four secret operations into single
//! request/response cycles against `<base>/secrets`, so the rest of the
//! application works with plain calls like `client.get("db-pass")`.

use ureq::http::Uri;

use crate::auth::TokenProvider;
use crate::errors::{KvPollError, Result};
use crate::http::{HttpRequest, HttpResponse, Method, Transport};

use super::secret::{
    validate_secret_name, SecretBundle, SecretItem, SecretListPage, SetSecretParameters,
    VaultErrorBody,
};

/// Key Vault data-plane API version.
pub const API_VERSION: &str = "7.4";

/// Handle on one vault.
pub struct VaultClient {
    /// `https://<vault>.vault.azure.net`, without a trailing slash.
    base_url: String,

    transport: Box<dyn Transport>,

    credential: Box<dyn TokenProvider>,
}

impl VaultClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Box<dyn Transport>,
        credential: Box<dyn TokenProvider>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            credential,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// List every secret in the vault, following `nextLink` pages.
    ///
    /// Values are never part of the listing.
    pub fn list(&self) -> Result<Vec<SecretItem>> {
        let mut items = Vec::new();
        let mut url = format!("{}/secrets?api-version={API_VERSION}", self.base_url);

        loop {
            let response = self.execute(HttpRequest::new(Method::Get, &url), "secrets")?;
            let page: SecretListPage = decode(&response)?;
            items.extend(page.value.into_iter().filter_map(SecretItem::from_entry));

            match page.next_link.filter(|link| !link.is_empty()) {
                Some(next) => {
                    // The link carries our bearer token along; never leave the vault host.
                    if !same_origin(&self.base_url, &next) {
                        return Err(KvPollError::InvalidResponse(format!(
                            "nextLink points outside the vault: {next}"
                        )));
                    }
                    url = next;
                }
                None => break,
            }
        }

        tracing::debug!(count = items.len(), "listed secrets");
        Ok(items)
    }

    /// Current value of `name`.
    pub fn get(&self, name: &str) -> Result<String> {
        validate_secret_name(name)?;
        let response = self.execute(HttpRequest::new(Method::Get, self.secret_url(name)), name)?;
        let bundle: SecretBundle = decode(&response)?;
        bundle
            .value
            .ok_or_else(|| KvPollError::InvalidResponse(format!("secret '{name}' has no value")))
    }

    /// Create `name`, or add a new version if it already exists.
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        validate_secret_name(name)?;
        let body = serde_json::to_string(&SetSecretParameters { value })
            .map_err(|e| KvPollError::InvalidResponse(format!("encoding request: {e}")))?;
        let request = HttpRequest::new(Method::Put, self.secret_url(name)).json(body);
        let response = self.execute(request, name)?;
        let bundle: SecretBundle = decode(&response)?;
        tracing::debug!(secret = name, id = bundle.id.as_deref().unwrap_or(""), "secret set");
        Ok(())
    }

    /// Delete `name`. Deleting a secret that does not exist is `NotFound`.
    pub fn delete(&self, name: &str) -> Result<()> {
        validate_secret_name(name)?;
        self.execute(HttpRequest::new(Method::Delete, self.secret_url(name)), name)?;
        tracing::debug!(secret = name, "secret deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    fn secret_url(&self, name: &str) -> String {
        format!("{}/secrets/{name}?api-version={API_VERSION}", self.base_url)
    }

    /// Authorize, send, and map error statuses. `subject` names the secret
    /// (or collection) for `NotFound`.
    fn execute(&self, request: HttpRequest, subject: &str) -> Result<HttpResponse> {
        let bearer = self.credential.bearer()?;
        let request = request
            .header("Authorization", bearer)
            .header("Accept", "application/json");

        let response = self.transport.send(&request)?;
        tracing::trace!(method = %request.method, status = response.status, "vault call");

        match response.status {
            200..=299 => Ok(response),
            404 => Err(KvPollError::NotFound(subject.to_string())),
            401 | 403 => Err(KvPollError::Unauthorized(error_message(&response))),
            status => Err(KvPollError::Api {
                status,
                message: error_message(&response),
            }),
        }
    }
}

/// Whether `link` points at the same scheme, host and port as `base`.
///
/// The vault writes the default port into `nextLink`
/// (`https://v.vault.azure.net:443/secrets?...`), so an explicit default
/// port compares equal to none.
fn same_origin(base: &str, link: &str) -> bool {
    let (Ok(base), Ok(link)) = (base.parse::<Uri>(), link.parse::<Uri>()) else {
        return false;
    };
    let origin = |uri: &Uri| -> Option<(String, String, u16)> {
        let scheme = uri.scheme_str()?.to_ascii_lowercase();
        let host = uri.host()?.to_ascii_lowercase();
        let port = match (uri.port_u16(), scheme.as_str()) {
            (Some(port), _) => port,
            (None, "https") => 443,
            (None, "http") => 80,
            (None, _) => return None,
        };
        Some((scheme, host, port))
    };
    match (origin(&base), origin(&link)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Best message available from an error response.
fn error_message(response: &HttpResponse) -> String {
    match serde_json::from_str::<VaultErrorBody>(&response.body) {
        Ok(body) => match (body.error.code, body.error.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (None, Some(message)) => message,
            (Some(code), None) => code,
            (None, None) => format!("HTTP {}", response.status),
        },
        Err(_) if response.body.trim().is_empty() => format!("HTTP {}", response.status),
        Err(_) => response.body.trim().to_string(),
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    serde_json::from_str(&response.body)
        .map_err(|e| KvPollError::InvalidResponse(format!("{e}; body={}", response.body)))
}
