use thiserror::Error;

/// All errors that can occur in kvpoll.
#[derive(Debug, Error)]
pub enum KvPollError {
    // --- Config errors ---
    #[error("env vars not set: {}", .0.join(", "))]
    ConfigMissing(Vec<&'static str>),

    // --- Auth errors ---
    #[error("unable to create vault authorizer: {0}")]
    AuthFailure(String),

    // --- Vault errors ---
    #[error("Secret '{0}' not found")]
    NotFound(String),

    #[error("Vault rejected the access token: {0}")]
    Unauthorized(String),

    #[error("Vault request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Secret name '{0}' is invalid — only ASCII letters, digits, and hyphens are allowed (1-127 characters)")]
    InvalidSecretName(String),

    #[error("Invalid response from vault: {0}")]
    InvalidResponse(String),

    // --- Transport errors ---
    #[error("Network error: {0}")]
    Network(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for kvpoll results.
pub type Result<T> = std::result::Result<T, KvPollError>;
