use async_trait::async_trait;
use governor::{clock::DefaultClock, state::{InMemoryState, NotKeyed}, Quota, RateLimiter};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use crate::config::Config;
use crate::services::normalize::NormalizationError;
use crate::types::{ErrorKind, TokenIdentity};

pub type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProviderKind {
    Signals,
    Dex,
    Risk,
    History,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [Self::Signals, Self::Dex, Self::Risk, Self::History];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Signals => "/ai-signals",
            Self::Dex => "/dex-analytics",
            Self::Risk => "/risk-assessment",
            Self::History => "/historical",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Signals => "signals",
            Self::Dex => "dex",
            Self::Risk => "risk",
            Self::History => "history",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::NetworkError,
            Self::Timeout => ErrorKind::Timeout,
            Self::MalformedPayload(_) => ErrorKind::MalformedPayload,
        }
    }
}

impl From<NormalizationError> for ProviderError {
    fn from(err: NormalizationError) -> Self {
        match err {
            NormalizationError::MalformedPayload(msg) => Self::MalformedPayload(msg),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// One remote analytic capability. Returns the raw JSON body; normalization
/// happens in the orchestrator.
#[async_trait]
pub trait Provider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Resolves once the provider may be called. The wait is not part of the
    /// call's timeout.
    async fn ready(&self) {}

    async fn fetch(&self, identity: &TokenIdentity) -> Result<Value, ProviderError>;
}

pub fn rate_limiter(per_second: NonZeroU32) -> SharedRateLimiter {
    Arc::new(RateLimiter::direct(Quota::per_second(per_second)))
}

pub struct HttpProvider {
    kind: ProviderKind,
    client: Client,
    base_url: String,
    rate_limiter: SharedRateLimiter,
}

impl HttpProvider {
    pub fn new(kind: ProviderKind, client: Client, base_url: &str, rate_limiter: SharedRateLimiter) -> Self {
        Self {
            kind,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter,
        }
    }

    /// One provider per kind, sharing a client and a rate limiter.
    pub fn from_config(config: &Config) -> Result<Vec<Arc<dyn Provider>>, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.provider_timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        let limiter = rate_limiter(config.rate_limit_per_sec);

        Ok(ProviderKind::ALL
            .iter()
            .map(|&kind| {
                Arc::new(HttpProvider::new(kind, client.clone(), &config.provider_url, limiter.clone()))
                    as Arc<dyn Provider>
            })
            .collect())
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.kind.path())
    }
}

#[async_trait]
impl Provider for HttpProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn ready(&self) {
        self.rate_limiter.until_ready().await;
    }

    async fn fetch(&self, identity: &TokenIdentity) -> Result<Value, ProviderError> {
        let url = self.url();
        tracing::debug!("GET {} for {}", url, identity);
        let response = self
            .client
            .get(&url)
            .query(&identity.query_params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Network(format!("{} returned {}", url, status)));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ProviderError::MalformedPayload(e.to_string()))
    }
}
