use {
    crate::{config::constants::sizing, errors::SizingError},
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumString},
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SizingMethod {
    #[default]
    Frequentist,
    Bayesian,
}

/// Inputs of a planned experiment. Fractions are in (0, 1], not percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingRequest {
    pub daily_visits: i64,
    pub daily_conversions: i64,
    pub traffic_fraction: f64,
    pub variation_count: u32,
    pub expected_improvement_fraction: f64,
    pub confidence_level: f64,
    pub method: SizingMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingResult {
    pub per_variation_sample: u64,
    /// Always `per_variation_sample * variation_count`.
    pub required_total_sample: u64,
    pub required_days: u64,
}

// --- WIRE FORMAT ---

/// JSON body of a sizing request. Traffic and improvement arrive as percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingPayload {
    pub visits: i64,
    pub conversions: i64,
    pub traffic: f64,
    pub variations: i64,
    pub improvement: f64,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub method: SizingMethod,
}

fn default_confidence() -> f64 {
    sizing::DEFAULT_CONFIDENCE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingResponse {
    pub days: u64,
    #[serde(rename = "minSample")]
    pub min_sample: u64,
}

impl TryFrom<SizingPayload> for SizingRequest {
    type Error = SizingError;

    fn try_from(payload: SizingPayload) -> Result<Self, Self::Error> {
        let variation_count = u32::try_from(payload.variations).map_err(|_| {
            SizingError::invalid(
                "variations",
                format!("must be a small positive integer, got {}", payload.variations),
            )
        })?;

        Ok(Self {
            daily_visits: payload.visits,
            daily_conversions: payload.conversions,
            traffic_fraction: payload.traffic / 100.0,
            variation_count,
            expected_improvement_fraction: payload.improvement / 100.0,
            confidence_level: payload.confidence,
            method: payload.method,
        })
    }
}

impl From<SizingResult> for SizingResponse {
    fn from(result: SizingResult) -> Self {
        Self {
            days: result.required_days,
            min_sample: result.required_total_sample,
        }
    }
}
