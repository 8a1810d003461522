use crate::errors::{AppError, AppResult};
use crate::models::CenturyRange;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CHURCH_RANGE: CenturyRange = CenturyRange::ordered(1, 21);
const DEFAULT_POPULATION_RANGE: CenturyRange = CenturyRange::ordered(-8, 21);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    pub database_path: PathBuf,
    /// Daily-rolling JSON logs go here; stderr when unset.
    pub log_dir: Option<PathBuf>,
    pub log_filter: String,
    pub church_range: CenturyRange,
    pub population_range: CenturyRange,
    pub dedication_pattern: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("roman_churches.db"),
            log_dir: None,
            log_filter: "info".to_string(),
            church_range: DEFAULT_CHURCH_RANGE,
            population_range: DEFAULT_POPULATION_RANGE,
            dedication_pattern: "Mary".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Reads YAML from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> AppResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.dedication_pattern.trim().is_empty() {
            return Err(AppError::Config("dedicationPattern must not be empty".to_string()));
        }
        Ok(())
    }
}
