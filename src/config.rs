use anyhow::{Context, Result};
use nonzero_ext::nonzero;
use std::env;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub provider_url: String,
    pub listen_addr: SocketAddr,
    pub provider_timeout: Duration,
    pub rate_limit_per_sec: NonZeroU32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider_url: "http://localhost:8000".to_string(),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            provider_timeout: Duration::from_secs(10),
            rate_limit_per_sec: nonzero!(5u32),
        }
    }
}

impl Config {
    /// Reads `HYPESCAN_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let provider_url = lookup("HYPESCAN_PROVIDER_URL").unwrap_or(defaults.provider_url);

        let listen_addr = match lookup("HYPESCAN_LISTEN_ADDR") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("HYPESCAN_LISTEN_ADDR is not a socket address: {raw}"))?,
            None => defaults.listen_addr,
        };

        let provider_timeout = match lookup("HYPESCAN_PROVIDER_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse()
                    .with_context(|| format!("HYPESCAN_PROVIDER_TIMEOUT_SECS is not a number: {raw}"))?,
            ),
            None => defaults.provider_timeout,
        };

        let rate_limit_per_sec = match lookup("HYPESCAN_RATE_LIMIT_PER_SEC") {
            Some(raw) => raw
                .parse::<NonZeroU32>()
                .with_context(|| format!("HYPESCAN_RATE_LIMIT_PER_SEC must be a positive integer: {raw}"))?,
            None => defaults.rate_limit_per_sec,
        };

        Ok(Self { provider_url, listen_addr, provider_timeout, rate_limit_per_sec })
    }
}
