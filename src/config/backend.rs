/// Where the remote analysis service lives and how long we give it.
pub struct BackendSettings {
    pub base_url: &'static str,
    pub analyze_path: &'static str,
    pub timeout_ms: u64,
}

pub const BACKEND: BackendSettings = BackendSettings {
    base_url: "http://localhost:8000",
    analyze_path: "/analyze-data/detailed",
    timeout_ms: 30_000,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: BACKEND.base_url.to_string(),
            timeout_ms: BACKEND.timeout_ms,
        }
    }
}

impl BackendConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn analyze_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            BACKEND.analyze_path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_url_joins_without_double_slash() {
        let config = BackendConfig::default().with_base_url("http://analysis.local:9000/");
        assert_eq!(
            config.analyze_url(),
            "http://analysis.local:9000/analyze-data/detailed"
        );
    }

    #[test]
    fn default_points_at_local_backend() {
        assert_eq!(
            BackendConfig::default().analyze_url(),
            "http://localhost:8000/analyze-data/detailed"
        );
    }
}
