//! Agents - personas that carry tools
//!
//! An agent is a persona (role, goal, backstory) plus the tools it may use.
//! Agents do not talk to the model themselves; the crew builds the prompt
//! from the persona and hands it to the shared LLM client.

use crate::overrides::AgentOverride;
use crate::tools::Tool;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Name of the research agent
pub const RESEARCHER: &str = "researcher";

/// Name of the calculation agent
pub const CALCULATOR: &str = "calculator";

/// Persona text of an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// What the agent is
    pub role: String,
    /// What the agent tries to achieve
    pub goal: String,
    /// How the agent should behave
    pub backstory: String,
}

impl AgentProfile {
    /// Default researcher persona
    #[must_use]
    pub fn researcher() -> Self {
        Self {
            role: "Wildlife & Geography Researcher".to_string(),
            goal: "Find accurate factual information about animals and landmarks".to_string(),
            backstory: "You are an expert researcher specializing in wildlife biology and \
                        geography. You excel at finding accurate, up-to-date information from \
                        reliable sources. You always verify facts before reporting them."
                .to_string(),
        }
    }

    /// Default calculator persona
    #[must_use]
    pub fn calculator() -> Self {
        Self {
            role: "Physics Calculator".to_string(),
            goal: "Calculate precise time measurements using physics formulas".to_string(),
            backstory: "You are a physicist who specializes in motion calculations. Given speed \
                        and distance, you calculate time with precision. You always show your \
                        work and use the formula: Time = Distance / Speed. You convert units \
                        carefully (km/h to m/s by dividing by 3.6)."
                .to_string(),
        }
    }

    /// Replace the fields set in `overrides`
    #[must_use]
    pub fn with_overrides(mut self, overrides: Option<&AgentOverride>) -> Self {
        let Some(o) = overrides else {
            return self;
        };
        if let Some(role) = &o.role {
            self.role.clone_from(role);
        }
        if let Some(goal) = &o.goal {
            self.goal.clone_from(goal);
        }
        if let Some(backstory) = &o.backstory {
            self.backstory.clone_from(backstory);
        }
        self
    }
}

/// A named persona with its tools
#[derive(Clone)]
pub struct Agent {
    name: String,
    profile: AgentProfile,
    tools: Vec<Arc<dyn Tool>>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tools: Vec<&str> = self
            .tools
            .iter()
            .map(|t| t.definition().name.as_str())
            .collect();
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("profile", &self.profile)
            .field("tools", &tools)
            .finish()
    }
}

impl Agent {
    /// Create an agent without tools
    #[must_use]
    pub fn new(name: impl Into<String>, profile: AgentProfile) -> Self {
        Self {
            name: name.into(),
            profile,
            tools: Vec::new(),
        }
    }

    /// Give the agent a tool
    #[must_use]
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Agent name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Persona
    #[must_use]
    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    /// Role, as shown in logs and task outputs
    #[must_use]
    pub fn role(&self) -> &str {
        &self.profile.role
    }

    /// Names of the agent's tools
    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools
            .iter()
            .map(|t| t.definition().name.as_str())
            .collect()
    }

    /// System-style preamble for prompts
    #[must_use]
    pub fn persona_prompt(&self) -> String {
        format!(
            "You are a {}.\n{}\nYour goal: {}",
            self.profile.role, self.profile.backstory, self.profile.goal
        )
    }

    /// Run every query through every tool, in order
    ///
    /// Returns `(query, observation)` pairs. Tool failures are part of the
    /// observation text.
    pub async fn gather(&self, queries: &[String]) -> Vec<(String, String)> {
        let mut observations = Vec::with_capacity(queries.len() * self.tools.len());
        for query in queries {
            for tool in &self.tools {
                debug!(agent = %self.name, tool = %tool.definition().name, query = %query, "Using tool");
                let text = tool.observe(serde_json::json!({ "query": query })).await;
                observations.push((query.clone(), text));
            }
        }
        observations
    }
}
