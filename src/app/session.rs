use {
    crate::{
        config::OrchestrationConfig,
        data::{AnalysisClient, SessionRepository},
        domain::{AnalysisRecord, SubmissionDraft},
        engine::{CancelHandle, ProgressEvent, ProgressOrchestrator, RunOutcome},
        errors::SessionError,
    },
    std::sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
    },
};

/// Host flow around the orchestrator: one run at a time, saved analyses in an
/// injected repository, and dismissal of the run in flight.
pub struct AnalysisSession {
    repository: Arc<dyn SessionRepository>,
    client: Arc<AnalysisClient>,
    config: OrchestrationConfig,
    in_flight: AtomicBool,
    active: Mutex<Option<CancelHandle>>,
}

/// Holds the in-flight flag for the duration of a run. Released on every exit path,
/// including the caller dropping the run future.
struct FlightGuard<'a> {
    session: &'a AnalysisSession,
}

impl<'a> FlightGuard<'a> {
    fn acquire(session: &'a AnalysisSession) -> Option<Self> {
        session
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { session })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.session.set_active(None);
        self.session.in_flight.store(false, Ordering::Release);
    }
}

impl AnalysisSession {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        client: Arc<AnalysisClient>,
        config: OrchestrationConfig,
    ) -> Self {
        Self {
            repository,
            client,
            config,
            in_flight: AtomicBool::new(false),
            active: Mutex::new(None),
        }
    }

    pub fn repository(&self) -> &Arc<dyn SessionRepository> {
        &self.repository
    }

    // --- SAVED ANALYSES ---

    pub async fn create_analysis(&self, name: &str) -> Result<AnalysisRecord, SessionError> {
        let record = AnalysisRecord::new(name);
        self.repository.save(&record).await?;
        Ok(record)
    }

    /// Most recently modified first.
    pub async fn analyses(&self) -> Result<Vec<AnalysisRecord>, SessionError> {
        Ok(self.repository.list().await?)
    }

    pub async fn rename_analysis(
        &self,
        id: &str,
        name: &str,
    ) -> Result<AnalysisRecord, SessionError> {
        let mut record = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| SessionError::RecordNotFound(id.to_string()))?;
        record.name = name.to_string();
        record.touch();
        self.repository.save(&record).await?;
        Ok(record)
    }

    pub async fn delete_analysis(&self, id: &str) -> Result<bool, SessionError> {
        Ok(self.repository.delete(id).await?)
    }

    // --- RUNS ---

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validates the draft, plays one orchestrated run and, when it completes, stores
    /// the outcome on the record and flags the KPI as uploaded.
    /// A `ValidationError` comes back before any run starts.
    pub async fn run_analysis(
        &self,
        record_id: &str,
        draft: &SubmissionDraft,
        progress_tx: Option<Sender<ProgressEvent>>,
    ) -> Result<RunOutcome, SessionError> {
        // 1. One run at a time. The cancel handle is armed before the first await,
        // so a dismiss issued while the inputs are checked still abandons the run.
        let _guard = FlightGuard::acquire(self).ok_or(SessionError::AlreadyRunning)?;
        let mut orchestrator = ProgressOrchestrator::new(self.client.clone(), self.config.clone());
        self.set_active(Some(orchestrator.cancel_handle()));

        // 2. Inputs
        if self.repository.get(record_id).await?.is_none() {
            return Err(SessionError::RecordNotFound(record_id.to_string()));
        }
        let submission = AnalysisClient::prepare(draft)?;
        let kpi = submission.kpi_type;

        // 3. Run
        if let Some(tx) = progress_tx {
            orchestrator = orchestrator.with_progress_sender(tx);
        }
        let outcome = orchestrator.run(submission).await;

        // 4. Record. Re-read so edits made during the run are kept.
        if let RunOutcome::Completed(result) = &outcome {
            match self.repository.get(record_id).await? {
                Some(mut record) => {
                    record.mark_kpi_uploaded(&kpi.to_string());
                    record.last_outcome = Some(result.as_ref().clone());
                    record.touch();
                    self.repository.save(&record).await?;
                }
                None => log::warn!(
                    "Analysis {} was deleted while its run was in flight; outcome not saved",
                    record_id
                ),
            }
        }

        Ok(outcome)
    }

    /// Abandons the run in flight, if any. Returns whether there was one.
    pub fn dismiss(&self) -> bool {
        let handle = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match handle {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    fn set_active(&self, handle: Option<CancelHandle>) {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = handle;
    }
}
