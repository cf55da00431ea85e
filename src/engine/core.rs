use {
    super::{
        budget::PollBudget,
        messages::{ProgressEvent, RunOutcome},
        state::ProgressState,
        worker::{self, SubmissionResult},
    },
    crate::{
        analysis::ResultNormalizer,
        config::{OrchestrationConfig, StageSpec},
        data::AnalysisClient,
        domain::AnalysisSubmission,
        errors::AnalysisError,
        utils::{AppInstant, format_duration},
    },
    rand::{Rng, SeedableRng, rngs::StdRng},
    std::{
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
            mpsc::Sender,
        },
        time::Duration,
    },
    tokio::{
        sync::Notify,
        time::{MissedTickBehavior, interval_at, sleep_until},
    },
    uuid::Uuid,
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Abandons the run of the orchestrator it came from. Safe to call more than once.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    generation: Arc<AtomicU64>,
    wake: Arc<Notify>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.wake.notify_one();
    }
}

/// The run's generation went stale while it was suspended.
struct Abandoned;

enum StageStep {
    Tick,
    Elapsed,
    Cancelled,
}

enum Reconciled {
    Resolved(SubmissionResult),
    TimedOut,
    Cancelled,
}

/// Runs the visual stage sequence alongside the network call and folds both into
/// one `RunOutcome`. The stages are always played in full; the network result is
/// applied only afterwards, and only if it lands within the poll budget.
pub struct ProgressOrchestrator {
    client: Arc<AnalysisClient>,
    config: OrchestrationConfig,
    state: ProgressState,
    progress_tx: Option<Sender<ProgressEvent>>,
    rng: StdRng,

    // Cancellation
    generation: Arc<AtomicU64>,
    wake: Arc<Notify>,
    /// Generation the next run belongs to. A cancel issued before `run` abandons it.
    armed: u64,

    run_id: Uuid,
}

impl ProgressOrchestrator {
    pub fn new(client: Arc<AnalysisClient>, config: OrchestrationConfig) -> Self {
        Self {
            client,
            config,
            state: ProgressState::default(),
            progress_tx: None,
            rng: StdRng::from_os_rng(),
            generation: Arc::new(AtomicU64::new(0)),
            wake: Arc::new(Notify::new()),
            armed: 0,
            run_id: Uuid::nil(),
        }
    }

    pub fn with_progress_sender(mut self, tx: Sender<ProgressEvent>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Reproducible tick jitter.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            generation: self.generation.clone(),
            wake: self.wake.clone(),
        }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn config(&self) -> &OrchestrationConfig {
        &self.config
    }

    /// Completes after the slower of the stage sequence and the network result
    /// (or the poll budget), or as soon as the run is cancelled.
    pub async fn run(&mut self, submission: AnalysisSubmission) -> RunOutcome {
        let run_gen = self.armed;
        let outcome = self.drive(run_gen, submission).await;
        self.armed = self.generation.load(Ordering::SeqCst);
        outcome
    }

    async fn drive(&mut self, run_gen: u64, submission: AnalysisSubmission) -> RunOutcome {
        if self.is_stale(run_gen) {
            return self.abandon();
        }

        let started = AppInstant::now();
        self.run_id = Uuid::new_v4();
        self.state = ProgressState::running();

        #[cfg(debug_assertions)]
        if DF.log_orchestrator {
            log::info!(
                "🚀 ORCHESTRATOR [{}]: run started ({} stages, poll {} x {:?})",
                self.run_id,
                self.config.stages.len(),
                self.config.poll_attempts,
                self.config.poll_interval
            );
        }
        self.publish();

        // 1. Network path, from here on independent of the pacing
        let mut pending = worker::spawn_submission(self.client.clone(), submission);

        // 2. Stage sequence
        if self.play_stages(run_gen).await.is_err() {
            return self.abandon();
        }

        // 3. Reconcile with whatever the network path has cached
        let mut budget = PollBudget::new(self.config.poll_interval, self.config.poll_attempts);
        let reconciled = tokio::select! {
            biased;
            _ = wait_for_cancel(&self.generation, &self.wake, run_gen) => Reconciled::Cancelled,
            result = &mut pending => Reconciled::Resolved(result.unwrap_or_else(|_| Err(interrupted()))),
            _ = budget.exhausted() => Reconciled::TimedOut,
        };

        // Token is checked again before anything is written.
        if self.is_stale(run_gen) {
            return self.abandon();
        }

        let outcome = match reconciled {
            Reconciled::Cancelled => return self.abandon(),
            Reconciled::Resolved(Ok(raw)) => {
                let outcome = crate::trace_time!("Normalize analysis response", 2_000, {
                    ResultNormalizer::normalize(&raw)
                });
                self.state.complete();
                RunOutcome::Completed(Box::new(outcome))
            }
            Reconciled::Resolved(Err(e)) => {
                log::warn!("Analysis run {} failed: {}", self.run_id, e);
                self.state.fail(e.clone());
                RunOutcome::Failed(e)
            }
            Reconciled::TimedOut => {
                log::warn!(
                    "Analysis run {} gave up after {} polls",
                    self.run_id,
                    budget.attempts_spent()
                );
                self.state.fail(AnalysisError::Timeout);
                RunOutcome::Failed(AnalysisError::Timeout)
            }
        };
        self.publish();

        log::info!(
            "🏁 Analysis run {} {} after {}",
            self.run_id,
            self.state.phase,
            format_duration(started.elapsed())
        );

        outcome
    }

    async fn play_stages(&mut self, run_gen: u64) -> Result<(), Abandoned> {
        let stages = self.config.stages.clone();
        for (index, spec) in stages.iter().enumerate() {
            self.state.stage_index = index;
            self.publish();

            #[cfg(debug_assertions)]
            if DF.log_orchestrator {
                log::info!(
                    "ORCHESTRATOR [{}]: stage {}/{} '{}' ({:?})",
                    self.run_id,
                    index + 1,
                    stages.len(),
                    spec.stage,
                    spec.min_delay
                );
            }

            self.hold_stage(run_gen, spec).await?;

            if self.state.advance_to(self.stage_ceiling(spec)) {
                self.publish();
            }
        }
        Ok(())
    }

    /// Waits out the stage's minimum delay while ticking progress toward its ceiling.
    async fn hold_stage(&mut self, run_gen: u64, spec: &StageSpec) -> Result<(), Abandoned> {
        let deadline = AppInstant::now() + spec.min_delay;
        let period = self.config.tick_interval.max(Duration::from_millis(1));
        let mut ticker = interval_at(AppInstant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let ceiling = self.stage_ceiling(spec);

        loop {
            // Loops on the deadline, so a stray wake-up cannot shorten the stage.
            let step = tokio::select! {
                biased;
                _ = wait_for_cancel(&self.generation, &self.wake, run_gen) => StageStep::Cancelled,
                _ = sleep_until(deadline) => StageStep::Elapsed,
                _ = ticker.tick() => StageStep::Tick,
            };

            match step {
                StageStep::Cancelled => return Err(Abandoned),
                StageStep::Elapsed => return Ok(()),
                StageStep::Tick => {
                    let target =
                        (self.state.percent_complete.value() + self.tick_increment()).min(ceiling);
                    if self.state.advance_to(target) {
                        #[cfg(debug_assertions)]
                        if DF.log_stage_ticks {
                            log::info!(
                                "ORCHESTRATOR [{}]: tick -> {}",
                                self.run_id,
                                self.state.percent_complete
                            );
                        }
                        self.publish();
                    }
                }
            }
        }
    }

    fn stage_ceiling(&self, spec: &StageSpec) -> f64 {
        spec.ceiling_pct.min(self.config.progress_cap_pct)
    }

    fn tick_increment(&mut self) -> f64 {
        let (lo, hi) = (self.config.tick_increment_min, self.config.tick_increment_max);
        if hi > lo {
            self.rng.random_range(lo..=hi)
        } else {
            lo
        }
    }

    fn is_stale(&self, run_gen: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != run_gen
    }

    /// Nothing is published; the state goes back to idle.
    fn abandon(&mut self) -> RunOutcome {
        log::info!(
            "Analysis run {} abandoned at {}",
            self.run_id,
            self.state.percent_complete
        );
        self.state = ProgressState::default();
        RunOutcome::Abandoned
    }

    fn publish(&self) {
        let Some(tx) = &self.progress_tx else {
            return;
        };
        let event = ProgressEvent {
            run_id: self.run_id,
            stage: self
                .config
                .stages
                .get(self.state.stage_index)
                .map(|s| s.stage),
            stage_index: self.state.stage_index,
            percent: self.state.percent_complete,
            phase: self.state.phase,
            error_message: self.state.error.as_ref().map(ToString::to_string),
        };
        // Nobody listening is fine; the run carries on.
        let _ = tx.send(event);
    }
}

/// Resolves once the generation moves past `run_gen`.
async fn wait_for_cancel(generation: &AtomicU64, wake: &Notify, run_gen: u64) {
    while generation.load(Ordering::SeqCst) == run_gen {
        wake.notified().await;
    }
}

fn interrupted() -> AnalysisError {
    AnalysisError::Request {
        status: None,
        message: "Analysis request was interrupted".to_string(),
    }
}
