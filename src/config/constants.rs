use std::time::Duration;

// Top Level Constants
pub const LOG_PERFORMANCE: bool = false;

pub mod sizing {
    /// Two-sided z score used by the frequentist estimator.
    /// Fixed at the 95% value whatever confidence level is requested.
    pub const Z_ALPHA: f64 = 1.96;
    /// z score for 80% power.
    pub const Z_BETA: f64 = 0.84;
    /// Numerator of the simplified Bayesian sample size rule (16 / effect²).
    pub const BAYESIAN_NUMERATOR: f64 = 16.0;
    pub const DEFAULT_CONFIDENCE: f64 = 95.0;
    pub const CONVENTIONAL_CONFIDENCE_LEVELS: &[f64] = &[80.0, 85.0, 90.0, 95.0, 99.0];
}

pub mod submission {
    pub const CONTROL_KEY: &str = "control";
    pub const VARIATION_KEY: &str = "variation";
    pub const DEFAULT_FILE_TYPE: &str = "csv";
    pub const ALLOWED_FILE_TYPES: &[&str] = &["json", "csv", "xlsx", "xls"];
    pub const COLUMN_TYPE: &str = "numeric";
}

pub mod orchestration {
    use super::Duration;
    use crate::config::{StageSpec, StageTiming};
    use crate::domain::AnalysisStage;

    pub const PROGRESS_CAP_PCT: f64 = 95.0;
    pub const TICK_INTERVAL: Duration = Duration::from_millis(250);
    pub const TICK_INCREMENT_MIN: f64 = 1.2;
    pub const TICK_INCREMENT_MAX: f64 = 2.0;
    pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
    pub const POLL_ATTEMPTS: u32 = 50; // 5 seconds maximum wait (50 * 100ms)

    pub const STAGES: &[StageSpec] = &[
        StageSpec::new(AnalysisStage::ReadingFile, Duration::from_millis(600), 20.0),
        StageSpec::new(AnalysisStage::ValidatingStructure, Duration::from_millis(500), 40.0),
        StageSpec::new(AnalysisStage::IdentifyingGroups, Duration::from_millis(600), 60.0),
        StageSpec::new(AnalysisStage::ComputingStatistics, Duration::from_millis(600), 75.0),
        StageSpec::new(AnalysisStage::RunningTests, Duration::from_millis(700), 90.0),
        StageSpec::new(AnalysisStage::Finalizing, Duration::from_millis(500), 95.0),
    ];

    pub const DEFAULT: StageTiming = StageTiming {
        stages: STAGES,
        progress_cap_pct: PROGRESS_CAP_PCT,
        tick_interval: TICK_INTERVAL,
        tick_increment_min: TICK_INCREMENT_MIN,
        tick_increment_max: TICK_INCREMENT_MAX,
        poll_interval: POLL_INTERVAL,
        poll_attempts: POLL_ATTEMPTS,
    };
}
