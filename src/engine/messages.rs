use {
    super::state::Phase,
    crate::{
        config::ProgressPct,
        domain::{AnalysisOutcome, AnalysisStage},
        errors::AnalysisError,
    },
    uuid::Uuid,
};

/// Snapshot published on every visible state change of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub run_id: Uuid,
    pub stage: Option<AnalysisStage>,
    pub stage_index: usize,
    pub percent: ProgressPct,
    pub phase: Phase,
    /// User facing text of the error, on the final `Failed` snapshot only.
    pub error_message: Option<String>,
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(Box<AnalysisOutcome>),
    Failed(AnalysisError),
    /// Dismissed before it finished. Any late network result was dropped.
    Abandoned,
}

impl RunOutcome {
    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        match self {
            RunOutcome::Completed(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match self {
            RunOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}
