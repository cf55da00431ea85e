use {
    crate::config::constants::submission::{COLUMN_TYPE, CONTROL_KEY, VARIATION_KEY},
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
    strum_macros::{Display, EnumString},
};

/// KPIs the remote analysis service knows how to test.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum KpiType {
    Conversion,
    Revenue,
    Aov,
}

/// A file picked by the user, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFile {
    pub content: String,
    pub file_type: String,
}

/// Raw form input for one analysis run. Counts are kept as typed so that
/// validation can report non-numeric entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmissionDraft {
    pub file: Option<UploadedFile>,
    pub kpi: String,
    pub exclude_outliers: bool,
    pub users_per_variation: BTreeMap<String, String>,
}

impl SubmissionDraft {
    pub fn new(kpi: impl Into<String>) -> Self {
        Self {
            kpi: kpi.into(),
            ..Self::default()
        }
    }

    pub fn with_file(mut self, file: UploadedFile) -> Self {
        self.file = Some(file);
        self
    }

    pub fn with_users(mut self, group: impl Into<String>, count: impl Into<String>) -> Self {
        self.users_per_variation.insert(group.into(), count.into());
        self
    }

    pub fn excluding_outliers(mut self, exclude: bool) -> Self {
        self.exclude_outliers = exclude;
        self
    }
}

/// A validated, encoded submission ready to go over the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSubmission {
    pub encoded_file_content: String,
    pub file_type: String,
    pub kpi_type: KpiType,
    pub exclude_outliers: bool,
    /// Always holds "control" and at least one other group, all counts > 0.
    pub users_per_variation: BTreeMap<String, u64>,
}

impl AnalysisSubmission {
    /// The backend compares exactly two groups. Prefer an explicit "variation"
    /// entry, otherwise the first non-control group in key order.
    pub fn compared_users(&self) -> ComparedUsers {
        let control = self
            .users_per_variation
            .get(CONTROL_KEY)
            .copied()
            .unwrap_or_default();
        let variation = self
            .users_per_variation
            .get(VARIATION_KEY)
            .or_else(|| {
                self.users_per_variation
                    .iter()
                    .find(|(k, _)| k.as_str() != CONTROL_KEY)
                    .map(|(_, v)| v)
            })
            .copied()
            .unwrap_or_default();
        ComparedUsers { control, variation }
    }

    pub fn to_payload(&self) -> SubmissionPayload {
        SubmissionPayload {
            file_content: self.encoded_file_content.clone(),
            file_type: self.file_type.clone(),
            control_column: ColumnSpec::numeric(CONTROL_KEY),
            variation_column: ColumnSpec::numeric(VARIATION_KEY),
            kpi_type: self.kpi_type,
            exclude_outliers: self.exclude_outliers,
            users_per_variation: self.compared_users(),
        }
    }
}

// --- WIRE FORMAT ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

impl ColumnSpec {
    fn numeric(name: &str) -> Self {
        Self {
            name: name.to_string(),
            column_type: COLUMN_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparedUsers {
    pub control: u64,
    pub variation: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub file_content: String,
    pub file_type: String,
    pub control_column: ColumnSpec,
    pub variation_column: ColumnSpec,
    pub kpi_type: KpiType,
    pub exclude_outliers: bool,
    pub users_per_variation: ComparedUsers,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(users: &[(&str, u64)]) -> AnalysisSubmission {
        AnalysisSubmission {
            encoded_file_content: "YQ==".to_string(),
            file_type: "csv".to_string(),
            kpi_type: KpiType::Revenue,
            exclude_outliers: true,
            users_per_variation: users.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn explicit_variation_key_wins() {
        let sub = submission(&[("control", 10), ("a_variant", 7), ("variation", 12)]);
        assert_eq!(
            sub.compared_users(),
            ComparedUsers {
                control: 10,
                variation: 12
            }
        );
    }

    #[test]
    fn numbered_variations_fall_back_to_first_key() {
        let sub = submission(&[("control", 10), ("variation2", 4), ("variation1", 9)]);
        assert_eq!(sub.compared_users().variation, 9);
    }

    #[test]
    fn payload_uses_backend_field_names() {
        let json = serde_json::to_value(submission(&[("control", 3), ("variation", 4)]).to_payload())
            .unwrap();
        assert_eq!(json["kpi_type"], "revenue");
        assert_eq!(json["control_column"]["type"], "numeric");
        assert_eq!(json["variation_column"]["name"], "variation");
        assert_eq!(json["users_per_variation"]["variation"], 4);
        assert_eq!(json["exclude_outliers"], true);
    }

    #[test]
    fn kpi_names_parse_case_insensitively() {
        assert_eq!("AOV".parse::<KpiType>().ok(), Some(KpiType::Aov));
        assert_eq!("Conversion".parse::<KpiType>().ok(), Some(KpiType::Conversion));
        assert!("clicks".parse::<KpiType>().is_err());
    }
}
