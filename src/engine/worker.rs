use {
    crate::{data::AnalysisClient, domain::AnalysisSubmission, errors::AnalysisError},
    serde_json::Value,
    std::sync::Arc,
    tokio::sync::oneshot,
};

pub type SubmissionResult = Result<Value, AnalysisError>;

/// Starts the network call on its own task. The receiver holds the result once it
/// lands; nothing is applied until the orchestrator reads it.
pub fn spawn_submission(
    client: Arc<AnalysisClient>,
    submission: AnalysisSubmission,
) -> oneshot::Receiver<SubmissionResult> {
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = client.submit(&submission).await;
        // Err here means the run was abandoned and the receiver dropped.
        if tx.send(result).is_err() {
            log::debug!("Discarding analysis result for an abandoned run");
        }
    });

    rx
}
