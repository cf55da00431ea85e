use {
    crate::{
        config::constants::submission::{CONTROL_KEY, VARIATION_KEY},
        domain::{
            AnalysisOutcome, GroupCounts, GroupStatistics, KpiMetrics, OutliersRemoved,
            TestResult,
        },
        utils::finite_or_zero,
    },
    regex::Regex,
    serde_json::{Map, Value},
    std::{collections::BTreeMap, sync::LazyLock},
};

#[cfg(debug_assertions)]
use crate::config::DF;

static COUNTS_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"Found (\d+) control transactions and (\d+) variation transactions").ok()
});

/// Turns the loosely typed backend response into an `AnalysisOutcome`.
/// Nothing downstream reads raw JSON: every default and coercion happens here.
pub struct ResultNormalizer;

impl ResultNormalizer {
    pub fn normalize(raw: &Value) -> AnalysisOutcome {
        let basic_statistics = Self::normalize_statistics(raw.get("basic_statistics"));
        let message = raw
            .get("message")
            .map(coerce_string)
            .unwrap_or_default();
        let group_counts = Self::normalize_counts(&message, &basic_statistics);

        AnalysisOutcome {
            basic_interpretation: normalize_interpretation(raw.get("basic_interpretation")),
            conversion_metrics: normalize_metrics(raw.get("conversion_metrics")),
            aov_metrics: normalize_metrics(raw.get("aov_metrics")),
            revenue_metrics: normalize_metrics(raw.get("revenue_metrics")),
            outliers_removed: Self::normalize_outliers(raw.get("outliers_removed")),
            basic_statistics,
            group_counts,
            message,
        }
    }

    /// Accepts `{control, variation}` with numbers or numeric strings, or one total
    /// that is split between the two groups (the odd unit goes to variation).
    pub fn normalize_outliers(raw: Option<&Value>) -> OutliersRemoved {
        match raw {
            Some(Value::Object(fields)) => OutliersRemoved {
                control: fields.get(CONTROL_KEY).map(coerce_count).unwrap_or(0),
                variation: fields.get(VARIATION_KEY).map(coerce_count).unwrap_or(0),
            },
            Some(total @ Value::Number(_)) => {
                let total = coerce_count(total);
                let control = total / 2;
                OutliersRemoved {
                    control,
                    variation: total - control,
                }
            }
            Some(other) => {
                log::debug!("NORMALIZER: unusable outliers_removed {}, using zeros", other);
                OutliersRemoved::default()
            }
            None => OutliersRemoved::default(),
        }
    }

    /// Reads "Found N control transactions and M variation transactions" from the message,
    /// falling back to the per-group statistics counts.
    pub fn normalize_counts(
        message: &str,
        basic_statistics: &BTreeMap<String, GroupStatistics>,
    ) -> GroupCounts {
        let from_message = COUNTS_PATTERN.as_ref().and_then(|re| {
            let caps = re.captures(message)?;
            let control = caps.get(1)?.as_str().parse::<u64>().ok()?;
            let variation = caps.get(2)?.as_str().parse::<u64>().ok()?;
            Some(GroupCounts { control, variation })
        });

        from_message.unwrap_or_else(|| {
            #[cfg(debug_assertions)]
            if DF.log_normalizer {
                log::info!("NORMALIZER: no transaction counts in message, using statistics");
            }
            let count_of = |group: &str| basic_statistics.get(group).map_or(0, |s| s.count);
            GroupCounts {
                control: count_of(CONTROL_KEY),
                variation: count_of(VARIATION_KEY),
            }
        })
    }

    fn normalize_statistics(raw: Option<&Value>) -> BTreeMap<String, GroupStatistics> {
        let mut stats: BTreeMap<String, GroupStatistics> = raw
            .and_then(Value::as_object)
            .map(|groups| {
                groups
                    .iter()
                    .map(|(name, group)| (name.clone(), normalize_group(group)))
                    .collect()
            })
            .unwrap_or_default();

        // Both sides of the comparison are always present, zeroed when missing.
        for group in [CONTROL_KEY, VARIATION_KEY] {
            stats.entry(group.to_string()).or_default();
        }
        stats
    }
}

fn normalize_group(raw: &Value) -> GroupStatistics {
    let field = |name: &str| raw.get(name).map(coerce_f64).unwrap_or(0.0);
    GroupStatistics {
        count: raw.get("count").map(coerce_count).unwrap_or(0),
        mean: field("mean"),
        median: field("median"),
        std_dev: field("std_dev"),
        min_value: field("min_value"),
        max_value: field("max_value"),
    }
}

fn normalize_metrics(raw: Option<&Value>) -> Option<KpiMetrics> {
    let block = raw?.as_object()?;
    let number = |name: &str| block.get(name).map(coerce_f64).unwrap_or(0.0);
    let text = |name: &str| block.get(name).map(coerce_string).unwrap_or_default();

    Some(KpiMetrics {
        metric_name: text("metric_name"),
        control_value: number("control_value"),
        variation_value: number("variation_value"),
        uplift: number("uplift"),
        test_result: block
            .get("test_result")
            .and_then(Value::as_object)
            .map(normalize_test_result)
            .unwrap_or_default(),
        interpretation: text("interpretation"),
    })
}

fn normalize_test_result(raw: &Map<String, Value>) -> TestResult {
    let number = |name: &str| raw.get(name).map(coerce_f64).unwrap_or(0.0);
    TestResult {
        test_name: raw.get("test_name").map(coerce_string).unwrap_or_default(),
        p_value: number("p_value"),
        confidence: number("confidence"),
        significant: raw.get("significant").is_some_and(coerce_bool),
        power: number("power"),
    }
}

fn normalize_interpretation(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(line)) => vec![line.clone()],
        _ => Vec::new(),
    }
}

/// Numbers and numeric strings pass through; everything else, NaN included, becomes 0.
fn coerce_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.map(finite_or_zero).unwrap_or(0.0)
}

/// Non-negative integer view of a value. Strings are read like a form field:
/// leading digits only, so "12 rows" is 12 and "abc" is 0.
fn coerce_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or_else(|| {
            let f = n.as_f64().map(finite_or_zero).unwrap_or(0.0);
            if f > 0.0 { f.trunc() as u64 } else { 0 }
        }),
        Value::String(s) => leading_integer(s),
        _ => 0,
    }
}

fn leading_integer(text: &str) -> u64 {
    let trimmed = text.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = unsigned.chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<u64>().unwrap_or(0)
}

fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.is_finite() && f != 0.0),
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
