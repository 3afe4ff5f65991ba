//! Configuration — environment-sourced settings for the vault client.

pub mod settings;

pub use settings::{describe_env, Settings};
