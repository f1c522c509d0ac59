use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;
use crate::services::derive::DerivedView;
use crate::services::store::Snapshot;
use crate::types::models::{AlertsModel, DexModel, HistoryModel, RiskModel, SignalModel};
use crate::types::{IdentityError, SlotView, TokenIdentity};
use super::error::ApiError;
use super::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityParams {
    #[serde(default)]
    pub coin_address: String,
    #[serde(default)]
    pub pair_address: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub dispatched: bool,
    pub generation: Option<u64>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub signals: SlotView<SignalModel>,
    pub dex: SlotView<DexModel>,
    pub risk: SlotView<RiskModel>,
    pub history: SlotView<HistoryModel>,
    pub alerts: SlotView<AlertsModel>,
}

#[derive(Serialize)]
pub struct ViewResponse {
    pub identity: Option<TokenIdentity>,
    pub slots: SlotsResponse,
    pub derived: DerivedView,
}

impl From<&Snapshot> for ViewResponse {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            identity: snapshot.identity.clone(),
            slots: SlotsResponse {
                signals: SlotView::from(&snapshot.signals),
                dex: SlotView::from(&snapshot.dex),
                risk: SlotView::from(&snapshot.risk),
                history: SlotView::from(&snapshot.history),
                alerts: SlotView::from(&snapshot.alerts),
            },
            derived: DerivedView::from_snapshot(snapshot),
        }
    }
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn set_identity(
    State(orchestrator): State<AppState>,
    payload: Result<Json<IdentityParams>, JsonRejection>,
) -> Result<(StatusCode, Json<RefreshResponse>), ApiError> {
    let Json(params) = payload?;

    match orchestrator.set_identity(&params.coin_address, &params.pair_address).await {
        // calls keep running after the handle is dropped
        Ok(handle) => Ok((
            StatusCode::ACCEPTED,
            Json(RefreshResponse { dispatched: true, generation: Some(handle.stamp.generation) }),
        )),
        Err(IdentityError::InvalidIdentity) => {
            tracing::debug!("Ignoring partial identity input");
            Ok((StatusCode::OK, Json(RefreshResponse { dispatched: false, generation: None })))
        }
    }
}

pub async fn get_view(State(orchestrator): State<AppState>) -> Json<ViewResponse> {
    let snapshot = orchestrator.store().snapshot().await;
    Json(ViewResponse::from(&snapshot))
}

/// Streams one `slot` event per store write. A subscriber that falls behind
/// the channel gets a single `refresh` event and should re-read `/view`.
pub async fn view_events(
    State(orchestrator): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = orchestrator.store().subscribe();
    let stream = futures::stream::unfold(rx, |mut rx| async move {
        let event = match rx.recv().await {
            Ok(notice) => Event::default()
                .event("slot")
                .json_data(notice)
                .unwrap_or_else(|_| Event::default().event("slot")),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("View subscriber lagged by {} notices", skipped);
                Event::default().event("refresh").data(skipped.to_string())
            }
            Err(RecvError::Closed) => return None,
        };
        Some((Ok(event), rx))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
