use std::sync::LazyLock;

pub const ICON_OK: &str = "✔";
pub const ICON_FAIL: &str = "✘";
pub const ICON_DISMISSED: &str = "⏹";

pub struct UiText {
    // --- SIZING ---
    pub sizing_heading: String,
    pub label_method: String,
    pub label_per_variation: String,
    pub label_total_sample: String,
    pub label_days: String,

    // --- PROGRESS ---
    pub progress_starting: String,
    pub progress_done: String,
    pub progress_failed: String,

    // --- OUTCOME ---
    pub outcome_heading: String,
    pub label_group: String,
    pub label_count: String,
    pub label_mean: String,
    pub label_median: String,
    pub label_std_dev: String,
    pub label_min: String,
    pub label_max: String,
    pub label_metric: String,
    pub label_control: String,
    pub label_variation: String,
    pub label_uplift: String,
    pub label_p_value: String,
    pub label_confidence: String,
    pub label_significant: String,
    pub label_outliers: String,
    pub label_transactions: String,
    pub no_metrics_for_kpi: String,
    pub run_dismissed: String,
    pub interrupt_again_to_quit: String,

    // --- HISTORY ---
    pub history_empty: String,
    pub label_id: String,
    pub label_name: String,
    pub label_created: String,
    pub label_modified: String,
    pub label_kpis: String,
    pub deleted: String,
    pub not_found: String,
}

pub static UI_TEXT: LazyLock<UiText> = LazyLock::new(|| UiText {
    sizing_heading: "Experiment sizing".to_string(),
    label_method: "Method".to_string(),
    label_per_variation: "Sample per variation".to_string(),
    label_total_sample: "Minimum total sample".to_string(),
    label_days: "Estimated days".to_string(),

    progress_starting: "Preparing analysis".to_string(),
    progress_done: format!("{} Analysis complete", ICON_OK),
    progress_failed: format!("{} Analysis failed", ICON_FAIL),

    outcome_heading: "Analysis results".to_string(),
    label_group: "Group".to_string(),
    label_count: "Count".to_string(),
    label_mean: "Mean".to_string(),
    label_median: "Median".to_string(),
    label_std_dev: "Std dev".to_string(),
    label_min: "Min".to_string(),
    label_max: "Max".to_string(),
    label_metric: "Metric".to_string(),
    label_control: "Control".to_string(),
    label_variation: "Variation".to_string(),
    label_uplift: "Uplift".to_string(),
    label_p_value: "p-value".to_string(),
    label_confidence: "Confidence".to_string(),
    label_significant: "Significant".to_string(),
    label_outliers: "Outliers removed".to_string(),
    label_transactions: "Transactions".to_string(),
    no_metrics_for_kpi: "The service returned no metrics for this KPI".to_string(),
    run_dismissed: format!("{} Analysis dismissed", ICON_DISMISSED),
    interrupt_again_to_quit: "Dismissing analysis... press Ctrl-C again to quit".to_string(),

    history_empty: "No saved analyses yet".to_string(),
    label_id: "Id".to_string(),
    label_name: "Name".to_string(),
    label_created: "Created".to_string(),
    label_modified: "Last modified".to_string(),
    label_kpis: "KPIs with data".to_string(),
    deleted: "Deleted".to_string(),
    not_found: "No saved analysis with id".to_string(),
});
