//! Persona and task text overrides from `agents.yaml` / `tasks.yaml`
//!
//! Both files are optional. A missing file logs a warning and leaves the
//! built-in defaults in place; a file that exists but does not parse is a
//! configuration error.

use crate::error::{Error, Result};
use crate::tasks::OutputFormat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// File holding agent persona overrides, keyed by agent name
pub const AGENTS_FILE: &str = "agents.yaml";

/// File holding task text overrides, keyed by task name
pub const TASKS_FILE: &str = "tasks.yaml";

/// Override for one agent persona; unset fields keep the default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentOverride {
    /// Agent role
    pub role: Option<String>,
    /// Agent goal
    pub goal: Option<String>,
    /// Agent backstory
    pub backstory: Option<String>,
}

/// Override for one task; unset fields keep the default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskOverride {
    /// Task description
    pub description: Option<String>,
    /// Expected output description
    pub expected_output: Option<String>,
    /// Queries run through the agent's tools before prompting
    pub search_queries: Option<Vec<String>>,
    /// Whether the task's output is prose or JSON
    pub output_format: Option<OutputFormat>,
}

/// All overrides for one pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOverrides {
    /// Persona overrides by agent name (`researcher`, `calculator`)
    pub agents: HashMap<String, AgentOverride>,
    /// Task overrides by task name (`research_task`, `calculation_task`)
    pub tasks: HashMap<String, TaskOverride>,
}

impl PipelineOverrides {
    /// Override for an agent, if any
    #[must_use]
    pub fn agent(&self, name: &str) -> Option<&AgentOverride> {
        self.agents.get(name)
    }

    /// Override for a task, if any
    #[must_use]
    pub fn task(&self, name: &str) -> Option<&TaskOverride> {
        self.tasks.get(name)
    }
}

/// Load `agents.yaml` and `tasks.yaml` from `config_dir`
///
/// # Errors
/// Returns [`Error::Config`] if a file exists but cannot be read or parsed
pub fn load_overrides(config_dir: &Path) -> Result<PipelineOverrides> {
    Ok(PipelineOverrides {
        agents: load_map(&config_dir.join(AGENTS_FILE))?,
        tasks: load_map(&config_dir.join(TASKS_FILE))?,
    })
}

fn load_map<T>(path: &Path) -> Result<HashMap<String, T>>
where
    T: serde::de::DeserializeOwned,
{
    if !path.exists() {
        warn!(path = %path.display(), "Override file not found, using defaults");
        return Ok(HashMap::new());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;

    // An empty file parses as null
    let map: Option<HashMap<String, T>> = serde_yaml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;

    let map = map.unwrap_or_default();
    info!(path = %path.display(), entries = map.len(), "Loaded overrides");
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = load_overrides(dir.path()).unwrap();
        assert_eq!(overrides, PipelineOverrides::default());
    }

    #[test]
    fn test_load_agents_and_tasks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(AGENTS_FILE),
            "researcher:\n  role: Big Cat Expert\ncalculator:\n  goal: Be exact\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(TASKS_FILE),
            "research_task:\n  search_queries:\n    - cheetah top speed\ncalculation_task:\n  output_format: text\n",
        )
        .unwrap();

        let overrides = load_overrides(dir.path()).unwrap();

        let researcher = overrides.agent("researcher").unwrap();
        assert_eq!(researcher.role.as_deref(), Some("Big Cat Expert"));
        assert!(researcher.goal.is_none());
        assert_eq!(
            overrides.agent("calculator").unwrap().goal.as_deref(),
            Some("Be exact")
        );
        assert_eq!(
            overrides.task("research_task").unwrap().search_queries,
            Some(vec!["cheetah top speed".to_string()])
        );
        assert_eq!(
            overrides.task("calculation_task").unwrap().output_format,
            Some(OutputFormat::Text)
        );
    }

    #[test]
    fn test_empty_file_is_no_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(AGENTS_FILE), "").unwrap();
        let overrides = load_overrides(dir.path()).unwrap();
        assert!(overrides.agents.is_empty());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TASKS_FILE), "research_task: [unclosed").unwrap();
        let err = load_overrides(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
