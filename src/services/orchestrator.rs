use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use crate::services::normalize::{self, NormalizationError};
use crate::services::provider::{Provider, ProviderError, ProviderKind};
use crate::services::store::{ProviderUpdate, ViewModelStore};
use crate::types::{ErrorKind, IdentityError, RequestStamp, TokenIdentity};

/// In-flight provider calls for one refresh. Dropping it does not cancel
/// them; results still land in the store if the stamp is current.
pub struct RefreshHandle {
    pub stamp: RequestStamp,
    tasks: Vec<JoinHandle<()>>,
}

impl RefreshHandle {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits until every provider call has been written (or dropped as stale).
    pub async fn wait(self) {
        for result in join_all(self.tasks).await {
            if let Err(e) = result {
                tracing::error!("Provider task for {} aborted: {:?}", self.stamp.identity, e);
            }
        }
    }
}

pub struct FetchOrchestrator {
    store: Arc<ViewModelStore>,
    providers: Vec<Arc<dyn Provider>>,
    timeout: Duration,
}

impl FetchOrchestrator {
    pub fn new(store: Arc<ViewModelStore>, providers: Vec<Arc<dyn Provider>>, timeout: Duration) -> Self {
        Self { store, providers, timeout }
    }

    pub fn store(&self) -> &Arc<ViewModelStore> {
        &self.store
    }

    /// Entry point for input capture. Partial input issues no requests and
    /// leaves the store as it is.
    pub async fn set_identity(&self, coin_address: &str, pair_address: &str) -> Result<RefreshHandle, IdentityError> {
        let identity = TokenIdentity::new(coin_address, pair_address)?;
        self.refresh(identity).await
    }

    /// Issues one call per provider, concurrently, all stamped with the same
    /// identity. Returns as soon as the calls are spawned.
    pub async fn refresh(&self, identity: TokenIdentity) -> Result<RefreshHandle, IdentityError> {
        let identity = identity.normalized()?;

        let stamp = self.store.begin(identity).await;
        tracing::info!(
            "Refreshing {} providers for {} (generation {})",
            self.providers.len(),
            stamp.identity,
            stamp.generation
        );

        let tasks = self
            .providers
            .iter()
            .map(|provider| {
                let provider = provider.clone();
                let store = self.store.clone();
                let stamp = stamp.clone();
                let timeout = self.timeout;

                tokio::spawn(async move {
                    if !store.is_current(&stamp).await {
                        tracing::debug!("Skipping {} call for superseded {}", provider.kind(), stamp.identity);
                        return;
                    }
                    provider.ready().await;
                    if !store.is_current(&stamp).await {
                        tracing::debug!("{} call for {} superseded while throttled", provider.kind(), stamp.identity);
                        return;
                    }
                    let update = fetch_one(provider.as_ref(), &stamp.identity, timeout).await;
                    store.apply(&stamp, update).await;
                })
            })
            .collect();

        Ok(RefreshHandle { stamp, tasks })
    }
}

/// The timeout covers the call itself; throttling happens before it starts.
async fn fetch_one(provider: &dyn Provider, identity: &TokenIdentity, timeout: Duration) -> ProviderUpdate {
    let raw = match tokio::time::timeout(timeout, provider.fetch(identity)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout),
    };
    into_update(provider.kind(), raw)
}

/// Normalizes a raw provider result into the update for its slot(s).
pub fn into_update(kind: ProviderKind, raw: Result<Value, ProviderError>) -> ProviderUpdate {
    match kind {
        ProviderKind::Signals => ProviderUpdate::Signals(finish(kind, raw, normalize::signals::normalize)),
        ProviderKind::Dex => ProviderUpdate::Dex(finish(kind, raw, normalize::dex::normalize)),
        ProviderKind::Risk => ProviderUpdate::Risk(finish(kind, raw, normalize::risk::normalize)),
        ProviderKind::History => ProviderUpdate::History(finish(kind, raw, normalize::history::normalize)),
    }
}

fn finish<T>(
    kind: ProviderKind,
    raw: Result<Value, ProviderError>,
    normalize: fn(&Value) -> Result<T, NormalizationError>,
) -> Result<T, ErrorKind> {
    raw.and_then(|value| normalize(&value).map_err(ProviderError::from))
        .map_err(|e| {
            tracing::warn!("{} provider failed: {}", kind, e);
            e.kind()
        })
}
