use {
    crate::{config::PERSISTENCE, domain::AnalysisOutcome, utils::now_utc},
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    uuid::Uuid,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub data_uploaded: bool,
}

/// A saved analysis as kept by the session repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub variations: u32,
    #[serde(default)]
    pub kpis: Vec<KpiEntry>,
    #[serde(default)]
    pub last_outcome: Option<AnalysisOutcome>,
}

impl AnalysisRecord {
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: now,
            last_modified: now,
            variations: PERSISTENCE.sessions.default_variations,
            kpis: Vec::new(),
            last_outcome: None,
        }
    }

    pub fn touch(&mut self) {
        let now = now_utc();
        // Keep last_modified monotonic even if the wall clock steps back.
        if now > self.last_modified {
            self.last_modified = now;
        }
    }

    /// Flags the KPI as having data, adding it first if the record does not know it yet.
    pub fn mark_kpi_uploaded(&mut self, kpi_name: &str) {
        match self
            .kpis
            .iter_mut()
            .find(|k| k.name.eq_ignore_ascii_case(kpi_name))
        {
            Some(entry) => entry.data_uploaded = true,
            None => self.kpis.push(KpiEntry {
                id: Uuid::new_v4().to_string(),
                name: kpi_name.to_string(),
                data_uploaded: true,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_starts_with_two_variations_and_no_kpis() {
        let record = AnalysisRecord::new("Checkout test");
        assert_eq!(record.variations, 2);
        assert!(record.kpis.is_empty());
        assert_eq!(record.created_at, record.last_modified);
        assert!(Uuid::parse_str(&record.id).is_ok());
    }

    #[test]
    fn marking_known_kpi_does_not_duplicate_it() {
        let mut record = AnalysisRecord::new("x");
        record.mark_kpi_uploaded("Revenue");
        record.mark_kpi_uploaded("revenue");
        assert_eq!(record.kpis.len(), 1);
        assert!(record.kpis[0].data_uploaded);
    }
}
