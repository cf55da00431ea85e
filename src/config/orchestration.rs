//! Stage pacing and reconciliation settings for the progress orchestrator.

use std::time::Duration;

use crate::config::constants;
use crate::domain::AnalysisStage;

/// One step of the visual stage sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSpec {
    pub stage: AnalysisStage,
    /// The stage is shown for at least this long, whatever the network does.
    pub min_delay: Duration,
    /// Progress never passes this value while the stage is active.
    pub ceiling_pct: f64,
}

impl StageSpec {
    pub const fn new(stage: AnalysisStage, min_delay: Duration, ceiling_pct: f64) -> Self {
        Self {
            stage,
            min_delay,
            ceiling_pct,
        }
    }
}

/// Compile-time blueprint (see `constants::orchestration::DEFAULT`)
pub struct StageTiming {
    pub stages: &'static [StageSpec],
    pub progress_cap_pct: f64,
    pub tick_interval: Duration,
    pub tick_increment_min: f64,
    pub tick_increment_max: f64,
    pub poll_interval: Duration,
    pub poll_attempts: u32,
}

/// Runtime copy of the orchestration settings. Tests shrink or reshape it freely.
#[derive(Debug, Clone)]
pub struct OrchestrationConfig {
    pub stages: Vec<StageSpec>,
    /// Upper bound on progress until the network result is known.
    pub progress_cap_pct: f64,
    /// Progress ticks forward at this period while a stage is on screen.
    pub tick_interval: Duration,
    pub tick_increment_min: f64,
    pub tick_increment_max: f64,
    pub poll_interval: Duration,
    /// Explicit ceiling on reconciliation attempts.
    pub poll_attempts: u32,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        let d = &constants::orchestration::DEFAULT;
        Self {
            stages: d.stages.to_vec(),
            progress_cap_pct: d.progress_cap_pct,
            tick_interval: d.tick_interval,
            tick_increment_min: d.tick_increment_min,
            tick_increment_max: d.tick_increment_max,
            poll_interval: d.poll_interval,
            poll_attempts: d.poll_attempts,
        }
    }
}

impl OrchestrationConfig {
    /// Time the stage sequence is guaranteed to stay on screen.
    pub fn stage_sequence_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.min_delay).sum()
    }

    /// Longest time the orchestrator waits for the network once the stages are done.
    pub fn poll_ceiling(&self) -> Duration {
        self.poll_interval * self.poll_attempts
    }

    /// Upper bound on the whole run.
    pub fn max_run_duration(&self) -> Duration {
        self.stage_sequence_duration() + self.poll_ceiling()
    }

    /// Same pacing, fixed increments. Keeps progress traces reproducible.
    pub fn without_jitter(mut self) -> Self {
        self.tick_increment_max = self.tick_increment_min;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pacing_matches_stage_table() {
        let config = OrchestrationConfig::default();
        assert_eq!(config.stages.len(), 6);
        assert_eq!(config.stage_sequence_duration(), Duration::from_millis(3500));
        assert_eq!(config.poll_ceiling(), Duration::from_secs(5));
        assert_eq!(config.max_run_duration(), Duration::from_millis(8500));
    }

    #[test]
    fn stage_ceilings_rise_and_stop_at_cap() {
        let config = OrchestrationConfig::default();
        let ceilings: Vec<f64> = config.stages.iter().map(|s| s.ceiling_pct).collect();
        assert!(ceilings.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ceilings.last().copied(), Some(config.progress_cap_pct));
    }
}
