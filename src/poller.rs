//! Poller — fetch one secret on a fixed cadence and print each value.

use std::io::Write;
use std::time::Duration;

use crate::errors::Result;
use crate::vault::VaultClient;

/// Default number of iterations (`--interval`).
pub const DEFAULT_ITERATIONS: u32 = 30;

/// Default pause before each fetch (`--sleep-secs`).
pub const DEFAULT_SLEEP: Duration = Duration::from_secs(5);

/// Anything that can fetch a secret's current value.
pub trait SecretReader {
    fn read_secret(&self, name: &str) -> Result<String>;
}

impl SecretReader for VaultClient {
    fn read_secret(&self, name: &str) -> Result<String> {
        self.get(name)
    }
}

impl<F> SecretReader for F
where
    F: Fn(&str) -> Result<String>,
{
    fn read_secret(&self, name: &str) -> Result<String> {
        self(name)
    }
}

/// One polling session: `iterations` rounds of sleep-then-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poller {
    pub iterations: u32,
    pub sleep: Duration,
}

impl Default for Poller {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            sleep: DEFAULT_SLEEP,
        }
    }
}

impl Poller {
    pub fn new(iterations: u32, sleep: Duration) -> Self {
        Self { iterations, sleep }
    }

    /// Run the loop, writing each value plus a newline to `out`.
    ///
    /// The first fetch error ends the session and is returned as-is; no
    /// further fetches are attempted. Returns the number of values printed.
    pub fn run<R, W, S>(&self, reader: &R, name: &str, out: &mut W, mut sleep: S) -> Result<u32>
    where
        R: SecretReader + ?Sized,
        W: Write,
        S: FnMut(Duration),
    {
        for i in 0..self.iterations {
            sleep(self.sleep);
            let value = reader.read_secret(name)?;
            writeln!(out, "{value}")?;
            out.flush()?;
            tracing::debug!(iteration = i + 1, of = self.iterations, secret = name, "polled");
        }
        Ok(self.iterations)
    }
}
