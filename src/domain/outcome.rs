use {
    crate::domain::KpiType,
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

/// Descriptive statistics of one group as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct GroupStatistics {
    pub count: u64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min_value: f64,
    pub max_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TestResult {
    pub test_name: String,
    pub p_value: f64,
    /// (1 - p) * 100
    pub confidence: f64,
    pub significant: bool,
    pub power: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KpiMetrics {
    pub metric_name: String,
    pub control_value: f64,
    pub variation_value: f64,
    /// Percentage difference of variation over control.
    pub uplift: f64,
    pub test_result: TestResult,
    pub interpretation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutliersRemoved {
    pub control: u64,
    pub variation: u64,
}

impl OutliersRemoved {
    pub fn total(&self) -> u64 {
        self.control + self.variation
    }
}

/// Transactions per group, read from the summary message when possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GroupCounts {
    pub control: u64,
    pub variation: u64,
}

/// Canonical result of one analysis run. Only the normalizer builds these
/// from backend JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisOutcome {
    pub basic_statistics: BTreeMap<String, GroupStatistics>,
    #[serde(default)]
    pub basic_interpretation: Vec<String>,
    pub conversion_metrics: Option<KpiMetrics>,
    pub aov_metrics: Option<KpiMetrics>,
    pub revenue_metrics: Option<KpiMetrics>,
    pub outliers_removed: OutliersRemoved,
    pub group_counts: GroupCounts,
    pub message: String,
}

impl AnalysisOutcome {
    pub fn metrics_for(&self, kpi: KpiType) -> Option<&KpiMetrics> {
        match kpi {
            KpiType::Conversion => self.conversion_metrics.as_ref(),
            KpiType::Aov => self.aov_metrics.as_ref(),
            KpiType::Revenue => self.revenue_metrics.as_ref(),
        }
    }

    pub fn group(&self, name: &str) -> GroupStatistics {
        self.basic_statistics.get(name).copied().unwrap_or_default()
    }
}
