//! Tracing setup for the `kvpoll` binary.
//!
//! Log output goes to stderr so that stdout carries nothing but secret
//! values and command output.

use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// `debug` raises this crate's own targets (including the `kvpoll::http`
/// wire dumps) to DEBUG; everything else stays at WARN. Calling this twice
/// is harmless.
pub fn init(debug: bool) {
    let own_level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let filter = Targets::new()
        .with_default(LevelFilter::WARN)
        .with_target("kvpoll", own_level);

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(true),
        )
        .with(filter)
        .try_init();
}
