use crate::types::Severity;
use serde::{Deserialize, Serialize};

/// Dispatch tunables. Loaded from `data/desk_config.json` by the runner;
/// tests use `DeskConfig::default_test()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Complaints at or above this severity go to the priority queue.
    #[serde(default = "default_urgency_threshold")]
    pub urgency_threshold: Severity,
    /// Starting slot count of the priority heap. It doubles when full.
    #[serde(default = "default_heap_capacity")]
    pub initial_heap_capacity: usize,
    /// Where the runner writes the flat export on exit.
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
}

fn default_urgency_threshold() -> Severity {
    Severity::new(4).unwrap_or(Severity::MAX)
}

fn default_heap_capacity() -> usize {
    64
}

fn default_csv_path() -> String {
    "complaints_data.csv".to_string()
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            urgency_threshold:     default_urgency_threshold(),
            initial_heap_capacity: default_heap_capacity(),
            csv_path:              default_csv_path(),
        }
    }
}

impl DeskConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DeskConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        if config.initial_heap_capacity == 0 {
            anyhow::bail!("{path}: initial_heap_capacity must be at least 1");
        }
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    /// A small heap capacity so growth is exercised early.
    pub fn default_test() -> Self {
        Self {
            initial_heap_capacity: 2,
            csv_path: "test_complaints.csv".to_string(),
            ..Self::default()
        }
    }

    pub fn is_urgent(&self, severity: Severity) -> bool {
        severity >= self.urgency_threshold
    }
}
