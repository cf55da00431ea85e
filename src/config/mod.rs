//! Configuration module for the ab-pilot application.

// Can all be private now because we have a public re-export.
mod backend;
mod debug;
mod orchestration;
mod persistence;
mod types;

// Public
pub mod constants;

// Re-export commonly used items
pub use backend::{BACKEND, BackendConfig, BackendSettings};
pub use constants::LOG_PERFORMANCE;
pub use debug::DF;
pub use orchestration::{OrchestrationConfig, StageSpec, StageTiming};
pub use persistence::PERSISTENCE;
pub use types::ProgressPct;
