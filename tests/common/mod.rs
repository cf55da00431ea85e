// Shared fixtures for the orchestration and session integration tests
#![allow(dead_code)]

use {
    ab_pilot::{
        AnalysisClient, AnalysisTransport,
        data::TransportResponse,
        domain::{AnalysisSubmission, SubmissionDraft, SubmissionPayload, UploadedFile},
    },
    anyhow::{Result, anyhow},
    async_trait::async_trait,
    serde_json::json,
    std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    },
};

/// What the fake backend does with each request.
#[derive(Debug, Clone)]
pub enum Script {
    /// Answer after the delay.
    Respond(Duration, TransportResponse),
    /// Fail without an HTTP response after the delay.
    Unreachable(Duration),
    /// Never answer.
    Hang,
}

pub struct ScriptedTransport {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisTransport for ScriptedTransport {
    async fn post_analysis(&self, _payload: &SubmissionPayload) -> Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Respond(delay, response) => {
                tokio::time::sleep(*delay).await;
                Ok(response.clone())
            }
            Script::Unreachable(delay) => {
                tokio::time::sleep(*delay).await;
                Err(anyhow!("connection refused"))
            }
            Script::Hang => std::future::pending().await,
        }
    }
}

pub fn client(transport: Arc<ScriptedTransport>) -> Arc<AnalysisClient> {
    Arc::new(AnalysisClient::new(transport))
}

pub fn ok_response() -> TransportResponse {
    let body = json!({
        "basic_statistics": {
            "control": {"count": 100, "mean": 0.1, "median": 0.0, "std_dev": 0.3,
                        "min_value": 0, "max_value": 1},
            "variation": {"count": 98, "mean": 0.12, "median": 0.0, "std_dev": 0.32,
                          "min_value": 0, "max_value": 1}
        },
        "conversion_metrics": {
            "control_value": 0.1,
            "variation_value": 0.12,
            "uplift": 20.0,
            "test_result": {"p_value": 0.04, "confidence": 96.0, "significant": true,
                            "power": 0.62, "test_name": "chi-square"},
            "interpretation": "Variation converts better"
        },
        "outliers_removed": 4,
        "message": "Found 100 control transactions and 98 variation transactions"
    });
    TransportResponse {
        status: 200,
        reason: Some("OK".to_string()),
        body: body.to_string(),
    }
}

pub fn error_response(status: u16, body: &str) -> TransportResponse {
    TransportResponse {
        status,
        reason: None,
        body: body.to_string(),
    }
}

pub fn draft() -> SubmissionDraft {
    SubmissionDraft::new("conversion")
        .with_file(UploadedFile::new(
            "checkout.csv",
            b"group,converted\ncontrol,1\nvariation,0\n".to_vec(),
        ))
        .with_users("control", "100")
        .with_users("variation", "98")
}

pub fn submission() -> AnalysisSubmission {
    AnalysisClient::prepare(&draft()).expect("fixture draft is valid")
}
