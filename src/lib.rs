pub mod api;
pub mod config;
pub mod services;
pub mod types;

pub use services::orchestrator::FetchOrchestrator;
pub use services::store::ViewModelStore;
pub use types::TokenIdentity;
