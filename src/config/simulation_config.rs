use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::protocol::{ChangeKind, ConflictPolicy};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings for one simulation run: the generated topology, the change
/// applied to it, and how results are computed and printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub node_count: usize,
    pub connection_probability: f64,
    /// `None` seeds from the OS.
    pub seed: Option<u64>,
    pub change: ChangeKind,
    pub conflict_policy: ConflictPolicy,
    pub parallel: bool,
    pub output: OutputFormat,
    pub log_level: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            node_count: 6,
            connection_probability: 0.35,
            seed: Some(42),
            change: ChangeKind::Random,
            conflict_policy: ConflictPolicy::FirstSeen,
            parallel: false,
            output: OutputFormat::Text,
            log_level: "info".to_string(),
        }
    }
}

impl SimulationConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
