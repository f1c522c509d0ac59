pub mod derive;
pub mod normalize;
pub mod orchestrator;
pub mod provider;
pub mod store;
