//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Stage transitions, reconciliation and terminal state of each run.
    pub log_orchestrator: bool,

    /// Every progress tick inside a stage (noisy).
    pub log_stage_ticks: bool,

    /// Outgoing payload summary and raw status of each backend call.
    pub log_client: bool,

    /// Fallbacks taken while normalizing a backend response.
    pub log_normalizer: bool,

    pub log_session_repo: bool,

    pub log_sizing: bool,
}

pub const DF: LogFlags = LogFlags {
    log_orchestrator: true,
    log_client: true,

    log_stage_ticks: false,
    log_normalizer: false,
    log_session_repo: false,
    log_sizing: false,
};
