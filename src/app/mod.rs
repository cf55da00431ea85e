mod commands;
mod session;

pub use commands::run_cli;
pub use session::AnalysisSession;
