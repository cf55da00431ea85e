mod analysis_client;
mod session_repo;

pub use {
    analysis_client::{AnalysisClient, AnalysisTransport, HttpTransport, TransportResponse},
    session_repo::{InMemorySessionRepository, SessionRepository, SqliteSessionRepository},
};
