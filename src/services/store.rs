//! Last-known-good view models, one slot per section.
//!
//! Writes are stamped with the identity and generation they were requested
//! under. A write whose stamp is no longer current is dropped without
//! touching the slot, so results from a superseded identity never surface.
//! Every accepted write, and every identity change, is published as one
//! `ChangeNotice` on a broadcast channel.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, RwLock};
use crate::services::normalize::history::HistoryPayload;
use crate::types::models::{AlertsModel, DexModel, HistoryModel, RiskModel, SignalModel};
use crate::types::{ErrorKind, ProviderResult, RequestStamp, TokenIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlotKind {
    Signals,
    Dex,
    Risk,
    History,
    Alerts,
}

/// Normalized outcome of one provider call, ready to be written.
#[derive(Debug, Clone)]
pub enum ProviderUpdate {
    Signals(Result<SignalModel, ErrorKind>),
    Dex(Result<DexModel, ErrorKind>),
    Risk(Result<RiskModel, ErrorKind>),
    /// Feeds both the history and the alerts slot.
    History(Result<HistoryPayload, ErrorKind>),
}

/// Capacity of the change channel. Slower subscribers see `Lagged` and
/// should re-read the whole snapshot.
pub const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// `slot` is `None` when the current identity changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeNotice {
    pub version: u64,
    pub slot: Option<SlotKind>,
}

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub identity: Option<TokenIdentity>,
    pub signals: ProviderResult<SignalModel>,
    pub dex: ProviderResult<DexModel>,
    pub risk: ProviderResult<RiskModel>,
    pub history: ProviderResult<HistoryModel>,
    pub alerts: ProviderResult<AlertsModel>,
}

struct Slot<T> {
    result: ProviderResult<T>,
    applied_generation: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self { result: ProviderResult::Pending, applied_generation: 0 }
    }
}

impl<T> Slot<T> {
    fn write(&mut self, generation: u64, outcome: Result<T, ErrorKind>) -> bool {
        if generation < self.applied_generation {
            return false;
        }
        self.applied_generation = generation;
        self.result = match outcome {
            Ok(data) => ProviderResult::success(data),
            Err(error) => std::mem::take(&mut self.result).into_failure(error),
        };
        true
    }
}

pub struct ViewModelStore {
    current: RwLock<Option<RequestStamp>>,
    signals: RwLock<Slot<SignalModel>>,
    dex: RwLock<Slot<DexModel>>,
    risk: RwLock<Slot<RiskModel>>,
    history: RwLock<Slot<HistoryModel>>,
    alerts: RwLock<Slot<AlertsModel>>,
    version: AtomicU64,
    changes: broadcast::Sender<ChangeNotice>,
}

impl Default for ViewModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewModelStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            current: RwLock::new(None),
            signals: RwLock::default(),
            dex: RwLock::default(),
            risk: RwLock::default(),
            history: RwLock::default(),
            alerts: RwLock::default(),
            version: AtomicU64::new(0),
            changes,
        }
    }

    /// Makes `identity` current and returns the stamp its requests must carry.
    /// Any stamp handed out earlier becomes stale.
    pub async fn begin(&self, identity: TokenIdentity) -> RequestStamp {
        let mut current = self.current.write().await;
        let generation = current.as_ref().map_or(0, |s| s.generation) + 1;
        let stamp = RequestStamp { identity, generation };
        *current = Some(stamp.clone());
        drop(current);

        self.notify(None);
        stamp
    }

    pub async fn current_stamp(&self) -> Option<RequestStamp> {
        self.current.read().await.clone()
    }

    pub async fn is_current(&self, stamp: &RequestStamp) -> bool {
        self.current.read().await.as_ref() == Some(stamp)
    }

    /// Writes one provider outcome. Returns `false` when the stamp is stale.
    pub async fn apply(&self, stamp: &RequestStamp, update: ProviderUpdate) -> bool {
        // held across the slot write so `begin` cannot interleave
        let current = self.current.read().await;
        if current.as_ref() != Some(stamp) {
            tracing::debug!(
                "Dropping stale result for {} (generation {})",
                stamp.identity,
                stamp.generation
            );
            return false;
        }

        let generation = stamp.generation;
        let mut written = Vec::with_capacity(2);
        match update {
            ProviderUpdate::Signals(outcome) => {
                if self.signals.write().await.write(generation, outcome) {
                    written.push(SlotKind::Signals);
                }
            }
            ProviderUpdate::Dex(outcome) => {
                if self.dex.write().await.write(generation, outcome) {
                    written.push(SlotKind::Dex);
                }
            }
            ProviderUpdate::Risk(outcome) => {
                if self.risk.write().await.write(generation, outcome) {
                    written.push(SlotKind::Risk);
                }
            }
            ProviderUpdate::History(outcome) => {
                let (history, alerts) = match outcome {
                    Ok(payload) => (Ok(payload.history), Ok(payload.alerts)),
                    Err(error) => (Err(error), Err(error)),
                };
                if self.history.write().await.write(generation, history) {
                    written.push(SlotKind::History);
                }
                if self.alerts.write().await.write(generation, alerts) {
                    written.push(SlotKind::Alerts);
                }
            }
        }
        drop(current);

        for slot in &written {
            tracing::debug!("Updated {:?} slot for {}", slot, stamp.identity);
            self.notify(Some(*slot));
        }
        !written.is_empty()
    }

    fn notify(&self, slot: Option<SlotKind>) {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        // no subscribers is fine
        let _ = self.changes.send(ChangeNotice { version, slot });
    }

    pub async fn snapshot(&self) -> Snapshot {
        let identity = self.current.read().await.as_ref().map(|s| s.identity.clone());
        Snapshot {
            identity,
            signals: self.signals.read().await.result.clone(),
            dex: self.dex.read().await.result.clone(),
            risk: self.risk.read().await.result.clone(),
            history: self.history.read().await.result.clone(),
            alerts: self.alerts.read().await.result.clone(),
        }
    }

    /// One notice per accepted slot write and per identity change.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeNotice> {
        self.changes.subscribe()
    }
}
