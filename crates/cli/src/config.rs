use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use directories::ProjectDirs;
use once_cell::sync::Lazy;

use crate::cli::Cli;

static DEFAULT_SNAPSHOT_NAME: &str = "snapshot.json";
static ENV_SNAPSHOT: &str = "AGENTDECK_SNAPSHOT";

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("dev", "agentdeck", "agentdeck"));

#[derive(Debug, Clone)]
pub struct AppConfig {
    snapshot_path: PathBuf,
    today: NaiveDate,
}

impl AppConfig {
    /// Construct [`AppConfig`] by resolving the snapshot path from the override,
    /// the environment and platform defaults, and the evaluation day from the
    /// override or the local clock.
    pub fn discover(
        snapshot_override: Option<PathBuf>,
        today_override: Option<&str>,
    ) -> Result<Self> {
        let snapshot_path = resolve_snapshot_path(snapshot_override);
        let today = match today_override {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .with_context(|| format!("Invalid --today '{}': expected YYYY-MM-DD", raw))?,
            None => Local::now().date_naive(),
        };
        Ok(Self::new(snapshot_path, today))
    }

    pub fn new(snapshot_path: PathBuf, today: NaiveDate) -> Self {
        Self {
            snapshot_path,
            today,
        }
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }
}

pub fn from_cli(cli: &Cli) -> Result<AppConfig> {
    AppConfig::discover(cli.snapshot.clone(), cli.today.as_deref())
}

fn resolve_snapshot_path(snapshot_override: Option<PathBuf>) -> PathBuf {
    if let Some(path) = snapshot_override {
        return path;
    }

    if let Ok(env_path) = env::var(ENV_SNAPSHOT) {
        if !env_path.trim().is_empty() {
            return PathBuf::from(env_path);
        }
    }

    if let Some(project) = &*PROJECT_DIRS {
        return project.data_dir().join(DEFAULT_SNAPSHOT_NAME);
    }

    PathBuf::from(".agentdeck").join(DEFAULT_SNAPSHOT_NAME)
}
