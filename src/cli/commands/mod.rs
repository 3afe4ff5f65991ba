//! Command implementations, one module per subcommand.

pub mod completions;
pub mod delete;
pub mod get;
pub mod list;
pub mod poll;
pub mod set;
