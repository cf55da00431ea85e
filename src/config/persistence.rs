//! File persistence configuration

/// Configuration for saved analysis sessions
pub struct SessionPersistenceConfig {
    /// SQLite file holding saved analyses
    pub db_path: &'static str,
    /// Table name inside that file
    pub table: &'static str,
    /// Number of variations a freshly created analysis starts with
    pub default_variations: u32,
}

/// The Master Persistence Configuration
pub struct PersistenceConfig {
    pub sessions: SessionPersistenceConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    sessions: SessionPersistenceConfig {
        db_path: "ab_pilot_sessions.sqlite",
        table: "analyses",
        default_variations: 2,
    },
};
