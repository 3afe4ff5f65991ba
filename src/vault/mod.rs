//! Vault module — remote secret access.
//!
//! This module provides:
//! - Wire types, `SecretItem`, and name validation (`secret`)
//! - The `VaultClient` issuing get/set/delete/list calls (`client`)

pub mod client;
pub mod secret;

// Re-export the most commonly used items.
pub use client::{VaultClient, API_VERSION};
pub use secret::{validate_secret_name, SecretItem};
