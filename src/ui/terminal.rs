//! Plain terminal rendering: a progress bar fed from the orchestrator's events
//! and tables for sizing results, analysis outcomes and saved analyses.

use {
    super::ui_text::UI_TEXT,
    crate::{
        config::ProgressPct,
        domain::{AnalysisOutcome, AnalysisRecord, KpiType, SizingRequest, SizingResult},
        engine::{Phase, ProgressEvent},
        utils::format_timestamp,
    },
    indicatif::{ProgressBar, ProgressStyle},
    std::{
        sync::{LazyLock, mpsc::Receiver},
        thread::{self, JoinHandle},
    },
    tabled::{builder::Builder, settings::Style},
};

static BAR_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Draws progress events until the terminal one arrives or the sender goes away.
/// A sender dropped without a terminal event means the run was dismissed.
pub fn spawn_progress_bar(rx: Receiver<ProgressEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let bar = ProgressBar::new(100);
        bar.set_style(BAR_STYLE.clone());
        bar.set_message(UI_TEXT.progress_starting.clone());

        while let Ok(event) = rx.recv() {
            bar.set_position(bar_position(event.percent));
            match event.phase {
                Phase::Completed => {
                    bar.finish_with_message(UI_TEXT.progress_done.clone());
                    return;
                }
                Phase::Failed => {
                    let reason = event.error_message.unwrap_or_default();
                    bar.abandon_with_message(format!("{}: {}", UI_TEXT.progress_failed, reason));
                    return;
                }
                Phase::Idle | Phase::Running => {
                    if let Some(stage) = event.stage {
                        bar.set_message(stage.to_string());
                    }
                }
            }
        }
        bar.abandon_with_message(UI_TEXT.run_dismissed.clone());
    })
}

fn bar_position(pct: ProgressPct) -> u64 {
    pct.value().round() as u64
}

fn rounded(builder: Builder) -> String {
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

pub fn render_sizing(req: &SizingRequest, result: &SizingResult) -> String {
    let t = &*UI_TEXT;
    let mut builder = Builder::default();
    builder.push_record([t.sizing_heading.clone(), String::new()]);
    builder.push_record([t.label_method.clone(), req.method.to_string()]);
    builder.push_record([
        t.label_per_variation.clone(),
        result.per_variation_sample.to_string(),
    ]);
    builder.push_record([
        t.label_total_sample.clone(),
        result.required_total_sample.to_string(),
    ]);
    builder.push_record([t.label_days.clone(), result.required_days.to_string()]);
    rounded(builder)
}

pub fn render_outcome(outcome: &AnalysisOutcome, kpi: KpiType) -> String {
    let t = &*UI_TEXT;
    let mut sections = vec![t.outcome_heading.clone()];

    // 1. Per group statistics
    let mut stats = Builder::default();
    stats.push_record([
        t.label_group.clone(),
        t.label_count.clone(),
        t.label_mean.clone(),
        t.label_median.clone(),
        t.label_std_dev.clone(),
        t.label_min.clone(),
        t.label_max.clone(),
    ]);
    for (group, s) in &outcome.basic_statistics {
        stats.push_record([
            group.clone(),
            s.count.to_string(),
            format!("{:.2}", s.mean),
            format!("{:.2}", s.median),
            format!("{:.2}", s.std_dev),
            format!("{:.2}", s.min_value),
            format!("{:.2}", s.max_value),
        ]);
    }
    sections.push(rounded(stats));

    // 2. The KPI that was asked for
    match outcome.metrics_for(kpi) {
        Some(m) => {
            let mut metrics = Builder::default();
            metrics.push_record([
                t.label_metric.clone(),
                t.label_control.clone(),
                t.label_variation.clone(),
                t.label_uplift.clone(),
                t.label_p_value.clone(),
                t.label_confidence.clone(),
                t.label_significant.clone(),
            ]);
            let name = if m.metric_name.is_empty() {
                kpi.to_string()
            } else {
                m.metric_name.clone()
            };
            metrics.push_record([
                name,
                format!("{:.4}", m.control_value),
                format!("{:.4}", m.variation_value),
                format!("{:+.2}%", m.uplift),
                format!("{:.4}", m.test_result.p_value),
                format!("{:.1}%", m.test_result.confidence),
                m.test_result.significant.to_string(),
            ]);
            sections.push(rounded(metrics));
            if !m.interpretation.is_empty() {
                sections.push(m.interpretation.clone());
            }
        }
        None => sections.push(t.no_metrics_for_kpi.clone()),
    }

    // 3. Cleaning summary
    let mut cleaning = Builder::default();
    cleaning.push_record([
        String::new(),
        t.label_control.clone(),
        t.label_variation.clone(),
    ]);
    cleaning.push_record([
        t.label_transactions.clone(),
        outcome.group_counts.control.to_string(),
        outcome.group_counts.variation.to_string(),
    ]);
    cleaning.push_record([
        t.label_outliers.clone(),
        outcome.outliers_removed.control.to_string(),
        outcome.outliers_removed.variation.to_string(),
    ]);
    sections.push(rounded(cleaning));

    sections.extend(outcome.basic_interpretation.iter().cloned());
    if !outcome.message.is_empty() {
        sections.push(outcome.message.clone());
    }
    sections.join("\n")
}

pub fn render_history(records: &[AnalysisRecord]) -> String {
    let t = &*UI_TEXT;
    if records.is_empty() {
        return t.history_empty.clone();
    }

    let mut builder = Builder::default();
    builder.push_record([
        t.label_id.clone(),
        t.label_name.clone(),
        t.label_created.clone(),
        t.label_modified.clone(),
        t.label_kpis.clone(),
    ]);
    for record in records {
        let kpis: Vec<&str> = record
            .kpis
            .iter()
            .filter(|k| k.data_uploaded)
            .map(|k| k.name.as_str())
            .collect();
        builder.push_record([
            record.id.clone(),
            record.name.clone(),
            format_timestamp(&record.created_at),
            format_timestamp(&record.last_modified),
            kpis.join(", "),
        ]);
    }
    rounded(builder)
}
