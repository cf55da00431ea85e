#![allow(clippy::collapsible_if)]
#![allow(clippy::too_many_arguments)]

// Core modules
pub mod analysis;
pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod ui;
pub mod utils;

// Re-export commonly used types outside of crate
pub use analysis::{ResultNormalizer, SizeEstimator};
pub use app::{AnalysisSession, run_cli};
pub use config::{BACKEND, PERSISTENCE};
pub use data::{AnalysisClient, AnalysisTransport, SessionRepository};
pub use engine::{ProgressOrchestrator, RunOutcome};

// CLI argument parsing
use {
    clap::{Args, Parser, Subcommand},
    domain::{KpiType, SizingMethod},
    std::path::PathBuf,
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite file holding saved analyses
    #[arg(long, global = true, default_value = PERSISTENCE.sessions.db_path)]
    pub db: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Estimate sample size and duration of a planned experiment
    Size(SizeArgs),

    /// Send a dataset to the analysis service and show the results
    Analyze(AnalyzeArgs),

    /// List saved analyses, or delete one
    History {
        /// Id of the analysis to delete
        #[arg(long)]
        delete: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SizeArgs {
    /// Daily visitors
    #[arg(long)]
    pub visits: i64,

    /// Daily conversions
    #[arg(long)]
    pub conversions: i64,

    /// Share of traffic in the test, in percent
    #[arg(long, default_value_t = 100.0)]
    pub traffic: f64,

    /// Number of groups, control included
    #[arg(long, default_value_t = 2)]
    pub variations: i64,

    /// Minimum relative improvement to detect, in percent
    #[arg(long)]
    pub improvement: f64,

    #[arg(long, default_value_t = config::constants::sizing::DEFAULT_CONFIDENCE)]
    pub confidence: f64,

    /// frequentist or bayesian
    #[arg(long, default_value = "frequentist")]
    pub method: SizingMethod,

    /// Print {days, minSample} as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// JSON, CSV or Excel export with the test data
    pub file: PathBuf,

    /// Users in the control group
    #[arg(long)]
    pub control: String,

    /// Users in the variation group
    #[arg(long)]
    pub variation: String,

    /// conversion, revenue or aov
    #[arg(long, default_value = "conversion")]
    pub kpi: KpiType,

    #[arg(long, default_value_t = false)]
    pub exclude_outliers: bool,

    /// Base URL of the analysis service
    #[arg(long, env = "BACKEND_URL", default_value = BACKEND.base_url)]
    pub backend_url: String,

    #[arg(long, default_value_t = BACKEND.timeout_ms)]
    pub timeout_ms: u64,

    /// Name of the saved analysis (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,
}
