use {
    crate::{
        config::{
            BackendConfig,
            constants::submission::{ALLOWED_FILE_TYPES, CONTROL_KEY, DEFAULT_FILE_TYPE},
        },
        domain::{
            AnalysisSubmission, EncodedFile, KpiType, SubmissionDraft, SubmissionPayload,
            UploadedFile,
        },
        errors::{AnalysisError, ValidationError},
    },
    anyhow::{Context, Result},
    async_trait::async_trait,
    base64::{Engine, engine::general_purpose::STANDARD},
    serde_json::Value,
    std::{collections::BTreeMap, sync::Arc, time::Duration},
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// What came back from the analysis endpoint, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Canonical status phrase, e.g. "Bad Gateway".
    pub reason: Option<String>,
    pub body: String,
}

/// Abstract interface for delivering a submission to the analysis service.
/// An `Err` means no HTTP response was received at all.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn post_analysis(&self, payload: &SubmissionPayload) -> Result<TransportResponse>;
}

/// JSON over HTTP to `{base_url}/analyze-data/detailed`.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: config.analyze_url(),
        })
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn post_analysis(&self, payload: &SubmissionPayload) -> Result<TransportResponse> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.url))?;

        let status = response.status();
        // Body is read as text first; JSON parsing happens in interpret_response.
        let body = response
            .text()
            .await
            .context("Failed to read analysis response body")?;

        Ok(TransportResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            body,
        })
    }
}

/// Validates and encodes submissions, then performs the one network call per run.
pub struct AnalysisClient {
    transport: Arc<dyn AnalysisTransport>,
}

impl AnalysisClient {
    pub fn new(transport: Arc<dyn AnalysisTransport>) -> Self {
        Self { transport }
    }

    pub fn http(config: &BackendConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// Reports every problem with the draft, not just the first one.
    pub fn validate(draft: &SubmissionDraft) -> Result<(), ValidationError> {
        let checked = inspect(draft);
        if checked.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: checked.violations,
            })
        }
    }

    /// Deterministic: same bytes and name, same output.
    pub fn encode(file: &UploadedFile) -> EncodedFile {
        EncodedFile {
            content: STANDARD.encode(&file.bytes),
            file_type: file_type_of(&file.name),
        }
    }

    /// Validate, then encode, then assemble the submission.
    pub fn prepare(draft: &SubmissionDraft) -> Result<AnalysisSubmission, ValidationError> {
        let checked = inspect(draft);
        let (Some(file), Some(kpi_type), true) =
            (draft.file.as_ref(), checked.kpi, checked.violations.is_empty())
        else {
            return Err(ValidationError {
                violations: checked.violations,
            });
        };

        let encoded = Self::encode(file);
        Ok(AnalysisSubmission {
            encoded_file_content: encoded.content,
            file_type: encoded.file_type,
            kpi_type,
            exclude_outliers: draft.exclude_outliers,
            users_per_variation: checked.users,
        })
    }

    /// Sends the submission and returns the raw JSON body of a successful answer.
    /// No retries: a failure ends the run.
    pub async fn submit(&self, submission: &AnalysisSubmission) -> Result<Value, AnalysisError> {
        let payload = submission.to_payload();

        #[cfg(debug_assertions)]
        if DF.log_client {
            log::info!(
                "📤 CLIENT: submitting {} bytes of {} for kpi={} users={:?}",
                payload.file_content.len(),
                payload.file_type,
                payload.kpi_type,
                payload.users_per_variation
            );
        }

        let response = self.transport.post_analysis(&payload).await.map_err(|e| {
            log::warn!("Analysis request did not reach the backend: {:#}", e);
            AnalysisError::Request {
                status: None,
                message: format!("{:#}", e),
            }
        })?;

        #[cfg(debug_assertions)]
        if DF.log_client {
            log::info!(
                "📥 CLIENT: status {} ({} bytes)",
                response.status,
                response.body.len()
            );
        }

        Self::interpret_response(response)
    }

    /// Maps a raw response onto the error taxonomy.
    pub fn interpret_response(response: TransportResponse) -> Result<Value, AnalysisError> {
        let parsed = serde_json::from_str::<Value>(&response.body);

        if (200..300).contains(&response.status) {
            return parsed.map_err(|_| AnalysisError::MalformedResponse {
                raw_text: response.body,
            });
        }

        let from_json = parsed.ok().and_then(|json| {
            ["detail", "message", "error"]
                .iter()
                .find_map(|key| json.get(*key).and_then(error_text))
        });
        let message = from_json
            .or_else(|| {
                let raw = response.body.trim();
                (!raw.is_empty()).then(|| raw.to_string())
            })
            .or(response.reason)
            .unwrap_or_else(|| "Unknown error".to_string());

        Err(AnalysisError::Request {
            status: Some(response.status),
            message,
        })
    }
}

/// Result of one validation pass over a draft.
struct Inspection {
    violations: Vec<String>,
    users: BTreeMap<String, u64>,
    kpi: Option<KpiType>,
}

fn inspect(draft: &SubmissionDraft) -> Inspection {
    let mut violations = Vec::new();

    // 1. File
    match &draft.file {
        None => violations.push("Please attach a data file for analysis".to_string()),
        Some(file) => {
            if file.name.trim().is_empty() {
                violations.push("The attached file has no name".to_string());
            }
            if file.bytes.is_empty() {
                violations.push("The attached file is empty".to_string());
            }
            if !ALLOWED_FILE_TYPES.contains(&file_type_of(&file.name).as_str()) {
                violations.push("Only JSON, CSV, or Excel files are allowed".to_string());
            }
        }
    }

    // 2. Group sizes. Blank entries count as not provided.
    let provided: Vec<(&String, &str)> = draft
        .users_per_variation
        .iter()
        .map(|(group, raw)| (group, raw.trim()))
        .filter(|(_, raw)| !raw.is_empty())
        .collect();

    if !provided.iter().any(|(group, _)| group.as_str() == CONTROL_KEY) {
        violations.push("Please specify the number of users for the control group".to_string());
    }
    if !provided.iter().any(|(group, _)| group.as_str() != CONTROL_KEY) {
        violations
            .push("Please specify the number of users for at least one variation".to_string());
    }

    let mut users = BTreeMap::new();
    for (group, raw) in provided {
        match raw.parse::<u64>() {
            Ok(count) if count > 0 => {
                users.insert(group.clone(), count);
            }
            _ => violations.push(format!(
                "User count for {} must be a positive integer",
                group_label(group)
            )),
        }
    }

    // 3. KPI
    let kpi = draft.kpi.trim().parse::<KpiType>().ok();
    if kpi.is_none() {
        violations.push("KPI type must be one of: conversion, revenue, aov".to_string());
    }

    Inspection {
        violations,
        users,
        kpi,
    }
}

fn group_label(group: &str) -> String {
    if group == CONTROL_KEY {
        "Control group".to_string()
    } else {
        group.to_string()
    }
}

/// Lowercase trailing extension, "csv" when the name has none.
fn file_type_of(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => DEFAULT_FILE_TYPE.to_string(),
    }
}

fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        // e.g. a list of field errors
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draft() -> SubmissionDraft {
        SubmissionDraft::new("conversion")
            .with_file(UploadedFile::new("orders.CSV", b"group,value\ncontrol,1\n".to_vec()))
            .with_users("control", "1000")
            .with_users("variation", "980")
    }

    fn response(status: u16, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            reason: Some("Bad Request".to_string()),
            body: body.to_string(),
        }
    }

    #[test]
    fn well_formed_draft_validates() {
        assert!(AnalysisClient::validate(&draft()).is_ok());
    }

    #[test]
    fn missing_control_is_reported_by_name() {
        let mut d = draft();
        d.users_per_variation.remove("control");
        let err = AnalysisClient::validate(&d).unwrap_err();
        assert!(err.mentions("control"));
    }

    #[test]
    fn every_bad_count_gets_its_own_message() {
        let d = SubmissionDraft::new("revenue")
            .with_file(UploadedFile::new("orders.json", b"[]".to_vec()))
            .with_users("control", "0")
            .with_users("variation1", "-3")
            .with_users("variation2", "12.5");
        let err = AnalysisClient::validate(&d).unwrap_err();
        assert_eq!(
            err.violations,
            vec![
                "User count for Control group must be a positive integer",
                "User count for variation1 must be a positive integer",
                "User count for variation2 must be a positive integer",
            ]
        );
    }

    #[test]
    fn all_violations_are_collected_in_one_pass() {
        let d = SubmissionDraft::new("clicks");
        let err = AnalysisClient::validate(&d).unwrap_err();
        assert_eq!(err.violations.len(), 4);
        assert!(err.mentions("data file"));
        assert!(err.mentions("control group"));
        assert!(err.mentions("at least one variation"));
        assert!(err.mentions("KPI type"));
    }

    #[test]
    fn blank_variation_entry_does_not_count() {
        let d = SubmissionDraft::new("aov")
            .with_file(UploadedFile::new("a.csv", b"x".to_vec()))
            .with_users("control", "10")
            .with_users("variation", "   ");
        let err = AnalysisClient::validate(&d).unwrap_err();
        assert_eq!(
            err.violations,
            vec!["Please specify the number of users for at least one variation"]
        );
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let mut d = draft();
        d.file = Some(UploadedFile::new("report.pdf", b"%PDF".to_vec()));
        let err = AnalysisClient::validate(&d).unwrap_err();
        assert!(err.mentions("Only JSON, CSV, or Excel"));
    }

    #[test]
    fn encode_is_deterministic_and_lowercases_extension() {
        let file = UploadedFile::new("Export.XLSX", b"hello".to_vec());
        let first = AnalysisClient::encode(&file);
        assert_eq!(first, AnalysisClient::encode(&file));
        assert_eq!(first.content, "aGVsbG8=");
        assert_eq!(first.file_type, "xlsx");
    }

    #[test]
    fn encode_defaults_to_csv_without_extension() {
        let file = UploadedFile::new("export", b"a".to_vec());
        assert_eq!(AnalysisClient::encode(&file).file_type, "csv");
    }

    #[test]
    fn prepare_builds_typed_submission() {
        let submission = AnalysisClient::prepare(&draft().excluding_outliers(true)).unwrap();
        assert_eq!(submission.kpi_type, KpiType::Conversion);
        assert_eq!(submission.file_type, "csv");
        assert!(submission.exclude_outliers);
        assert_eq!(submission.users_per_variation.get("variation"), Some(&980));
    }

    #[test]
    fn success_body_is_parsed() {
        let value = AnalysisClient::interpret_response(response(200, r#"{"message":"ok"}"#))
            .unwrap();
        assert_eq!(value["message"], "ok");
    }

    #[test]
    fn success_with_garbage_body_is_malformed() {
        let err = AnalysisClient::interpret_response(response(200, "<html>oops")).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MalformedResponse {
                raw_text: "<html>oops".to_string()
            }
        );
    }

    #[test]
    fn error_message_prefers_detail_then_message_then_error() {
        let err = AnalysisClient::interpret_response(response(
            422,
            r#"{"error":"e","message":"m","detail":"d"}"#,
        ))
        .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Request {
                status: Some(422),
                message: "d".to_string()
            }
        );

        let err =
            AnalysisClient::interpret_response(response(500, r#"{"error":"boom"}"#)).unwrap_err();
        assert_eq!(err.to_string(), "API responded with status: 500 - boom");
    }

    #[test]
    fn error_falls_back_to_raw_text_then_status_phrase() {
        let err = AnalysisClient::interpret_response(response(502, "upstream down")).unwrap_err();
        assert_eq!(err.to_string(), "API responded with status: 502 - upstream down");

        let err = AnalysisClient::interpret_response(response(400, "")).unwrap_err();
        assert_eq!(err.to_string(), "API responded with status: 400 - Bad Request");
    }
}
