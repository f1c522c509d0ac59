use std::sync::Arc;
use crate::services::orchestrator::FetchOrchestrator;

pub type AppState = Arc<FetchOrchestrator>;
