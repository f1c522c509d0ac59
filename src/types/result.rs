use chrono::{DateTime, Utc};
use serde::Serialize;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    NetworkError,
    Timeout,
    MalformedPayload,
}

/// Fetch status tracked alongside slot data, so a default model is never
/// mistaken for an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FetchStatus {
    Pending,
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResult<T> {
    Pending,
    Success {
        data: T,
        fetched_at: DateTime<Utc>,
    },
    Failure {
        error: ErrorKind,
        last_good: Option<T>,
    },
}

impl<T> Default for ProviderResult<T> {
    fn default() -> Self {
        Self::Pending
    }
}

impl<T> ProviderResult<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data, fetched_at: Utc::now() }
    }

    pub fn status(&self) -> FetchStatus {
        match self {
            Self::Pending => FetchStatus::Pending,
            Self::Success { .. } => FetchStatus::Success,
            Self::Failure { .. } => FetchStatus::Failure,
        }
    }

    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            Self::Failure { error, .. } => Some(*error),
            _ => None,
        }
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Success { fetched_at, .. } => Some(*fetched_at),
            _ => None,
        }
    }

    /// Latest good value, fresh or carried forward.
    pub fn latest(&self) -> Option<&T> {
        match self {
            Self::Pending => None,
            Self::Success { data, .. } => Some(data),
            Self::Failure { last_good, .. } => last_good.as_ref(),
        }
    }

    /// Transitions to `Failure`, keeping whatever good value this slot held.
    pub fn into_failure(self, error: ErrorKind) -> Self {
        let last_good = match self {
            Self::Pending => None,
            Self::Success { data, .. } => Some(data),
            Self::Failure { last_good, .. } => last_good,
        };
        Self::Failure { error, last_good }
    }
}

impl<T: Clone + Default> ProviderResult<T> {
    /// The value to display: latest good value, otherwise the model default.
    pub fn view(&self) -> Cow<'_, T> {
        match self.latest() {
            Some(data) => Cow::Borrowed(data),
            None => Cow::Owned(T::default()),
        }
    }

    /// `true` when `view()` is showing the default rather than fetched data.
    pub fn is_default_view(&self) -> bool {
        self.latest().is_none()
    }
}

/// Wire form of a slot for the consumer boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView<T> {
    pub status: FetchStatus,
    pub error: Option<ErrorKind>,
    pub fetched_at: Option<DateTime<Utc>>,
    /// `true` when `data` is stale or default rather than the latest fetch.
    pub stale: bool,
    pub data: T,
}

impl<T: Clone + Default> From<&ProviderResult<T>> for SlotView<T> {
    fn from(result: &ProviderResult<T>) -> Self {
        Self {
            status: result.status(),
            error: result.error(),
            fetched_at: result.fetched_at(),
            stale: result.status() != FetchStatus::Success,
            data: result.view().into_owned(),
        }
    }
}
