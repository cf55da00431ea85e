use {
    crate::{config::ProgressPct, errors::AnalysisError},
    strum_macros::Display,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }
}

/// Progress of the current run. Owned by the orchestrator for the run's lifetime.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressState {
    /// Never decreases within a run.
    pub percent_complete: ProgressPct,
    pub stage_index: usize,
    pub phase: Phase,
    pub error: Option<AnalysisError>,
}

impl ProgressState {
    pub fn running() -> Self {
        Self {
            phase: Phase::Running,
            ..Self::default()
        }
    }

    /// Moves progress forward to `pct`. Returns false when that would be a step back.
    pub fn advance_to(&mut self, pct: f64) -> bool {
        let next = ProgressPct::new(pct);
        if next > self.percent_complete {
            self.percent_complete = next;
            true
        } else {
            false
        }
    }

    pub fn complete(&mut self) {
        self.percent_complete = ProgressPct::COMPLETE;
        self.phase = Phase::Completed;
        self.error = None;
    }

    pub fn fail(&mut self, error: AnalysisError) {
        // Forced to 100 so a consumer never sees a stalled bar next to an error.
        self.percent_complete = ProgressPct::COMPLETE;
        self.phase = Phase::Failed;
        self.error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_never_moves_backwards() {
        let mut state = ProgressState::running();
        assert!(state.advance_to(40.0));
        assert!(!state.advance_to(39.9));
        assert!(!state.advance_to(40.0));
        assert_eq!(state.percent_complete.value(), 40.0);
    }

    #[test]
    fn failure_forces_full_progress() {
        let mut state = ProgressState::running();
        state.advance_to(60.0);
        state.fail(AnalysisError::Timeout);
        assert!(state.percent_complete.is_complete());
        assert!(state.phase.is_terminal());
        assert_eq!(state.error, Some(AnalysisError::Timeout));
    }
}
