//! Read-only task and agent snapshot handed over by the dashboard's store.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Agent, Task};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub agents: Vec<Agent>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot at {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot at {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            tasks = snapshot.tasks.len(),
            agents = snapshot.agents.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Like [`Snapshot::load`], but a missing file yields an empty snapshot.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no snapshot file, using an empty one");
            Ok(Self::default())
        }
    }

    pub fn agent_name(&self, id: &str) -> Option<&str> {
        self.agents
            .iter()
            .find(|agent| agent.id == id)
            .map(|agent| agent.name.as_str())
    }
}
