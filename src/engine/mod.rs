mod budget;
mod core;
mod messages;
mod state;
mod worker;

pub use {
    budget::PollBudget,
    core::{CancelHandle, ProgressOrchestrator},
    messages::{ProgressEvent, RunOutcome},
    state::{Phase, ProgressState},
};
