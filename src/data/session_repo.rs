use {
    crate::{config::PERSISTENCE, domain::AnalysisRecord},
    anyhow::{Context, Result},
    async_trait::async_trait,
    chrono::SecondsFormat,
    sqlx::{
        Row,
        sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
            SqliteSynchronous,
        },
    },
    std::{collections::HashMap, str::FromStr, time::Duration},
    tokio::sync::Mutex,
};

#[cfg(debug_assertions)]
use crate::config::DF;

// --- TRAIT DEFINITION ---

/// Keyed storage of saved analyses.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<AnalysisRecord>>;
    /// Insert or replace.
    async fn save(&self, record: &AnalysisRecord) -> Result<()>;
    /// True if something was removed.
    async fn delete(&self, id: &str) -> Result<bool>;
    /// Most recently modified first.
    async fn list(&self) -> Result<Vec<AnalysisRecord>>;
}

fn newest_first(records: &mut [AnalysisRecord]) {
    records.sort_by(|a, b| {
        b.last_modified
            .cmp(&a.last_modified)
            .then_with(|| a.id.cmp(&b.id))
    });
}

// --- IN-MEMORY IMPLEMENTATION ---

#[derive(Default)]
pub struct InMemorySessionRepository {
    records: Mutex<HashMap<String, AnalysisRecord>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn get(&self, id: &str) -> Result<Option<AnalysisRecord>> {
        Ok(self.records.lock().await.get(id).cloned())
    }

    async fn save(&self, record: &AnalysisRecord) -> Result<()> {
        self.records
            .lock()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.records.lock().await.remove(id).is_some())
    }

    async fn list(&self) -> Result<Vec<AnalysisRecord>> {
        let mut records: Vec<AnalysisRecord> =
            self.records.lock().await.values().cloned().collect();
        newest_first(&mut records);
        Ok(records)
    }
}

// --- SQLITE IMPLEMENTATION ---

pub struct SqliteSessionRepository {
    pool: SqlitePool,
    table: &'static str,
}

impl SqliteSessionRepository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let connection_options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10))
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(2) // One CLI user, low throughput
            .connect_with(connection_options)
            .await
            .with_context(|| format!("Failed to connect to {}", db_path))?;

        let repo = Self {
            pool,
            table: PERSISTENCE.sessions.table,
        };
        repo.initialize().await?;

        Ok(repo)
    }

    async fn initialize(&self) -> Result<()> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                last_modified TEXT NOT NULL,
                record_json TEXT NOT NULL
            );",
            self.table
        ))
        .execute(&self.pool)
        .await
        .context("Failed to create analyses table")?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{0}_last_modified ON {0} (last_modified);",
            self.table
        ))
        .execute(&self.pool)
        .await
        .context("Failed to create last_modified index")?;

        Ok(())
    }
}

fn decode_record(json: &str) -> Result<AnalysisRecord> {
    serde_json::from_str(json).context("Stored analysis record is not valid JSON")
}

#[async_trait]
impl SessionRepository for SqliteSessionRepository {
    async fn get(&self, id: &str) -> Result<Option<AnalysisRecord>> {
        let row = sqlx::query(&format!(
            "SELECT record_json FROM {} WHERE id = ?",
            self.table
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to read analysis")?;

        row.map(|r| decode_record(r.get("record_json"))).transpose()
    }

    async fn save(&self, record: &AnalysisRecord) -> Result<()> {
        let json = serde_json::to_string(record).context("Failed to serialize analysis")?;

        #[cfg(debug_assertions)]
        if DF.log_session_repo {
            log::info!("SESSION DB: saving [{}] {}", record.id, record.name);
        }

        sqlx::query(&format!(
            r#"
            INSERT INTO {} (id, name, created_at, last_modified, record_json)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                last_modified = excluded.last_modified,
                record_json = excluded.record_json
            "#,
            self.table
        ))
        .bind(&record.id)
        .bind(&record.name)
        .bind(record.created_at.to_rfc3339_opts(SecondsFormat::Millis, true))
        .bind(record.last_modified.to_rfc3339_opts(SecondsFormat::Millis, true))
        .bind(json)
        .execute(&self.pool)
        .await
        .context("Failed to save analysis")?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", self.table))
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete analysis")?;

        #[cfg(debug_assertions)]
        if DF.log_session_repo {
            log::info!("SESSION DB: delete [{}] -> {} rows", id, result.rows_affected());
        }

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<AnalysisRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT record_json FROM {} ORDER BY last_modified DESC, id ASC",
            self.table
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list analyses")?;

        let mut records = rows
            .iter()
            .map(|r| decode_record(r.get("record_json")))
            .collect::<Result<Vec<_>>>()?;
        // Millisecond columns can tie; the in-memory order breaks ties the same way.
        newest_first(&mut records);
        Ok(records)
    }
}
