//! Crew - sequential execution of tasks by their agents
//!
//! Tasks run strictly in order. A task starts only after every earlier task
//! finished, and its prompt embeds the raw output of the tasks listed in its
//! context. Text tasks go through [`LlmProvider::complete`] and fail the run
//! on error; JSON tasks go through [`LlmProvider::infer`], whose error
//! descriptor becomes the task's JSON output.

use crate::agents::Agent;
use crate::error::{Error, Result};
use crate::tasks::{OutputFormat, Task};
use chrono::{DateTime, Utc};
use leopard_llm::LlmProvider;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Output of one task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Task name
    pub task: String,
    /// Role of the agent that produced it
    pub agent: String,
    /// Raw text
    pub raw: String,
    /// Parsed JSON, for JSON tasks
    pub json: Option<Value>,
}

/// Output of a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Run identifier, also attached to the run's log span
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
    /// Raw text of the final task
    pub raw: String,
    /// Parsed JSON of the final task, if any
    pub json: Option<Value>,
    /// Every task output, in execution order
    pub tasks_output: Vec<TaskOutput>,
}

impl CrewOutput {
    /// Output of a task by name
    #[must_use]
    pub fn task(&self, name: &str) -> Option<&TaskOutput> {
        self.tasks_output.iter().find(|o| o.task == name)
    }
}

/// An ordered set of agents and tasks sharing one model
pub struct Crew {
    agents: Vec<Agent>,
    tasks: Vec<Task>,
    llm: Arc<dyn LlmProvider>,
}

impl std::fmt::Debug for Crew {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crew")
            .field("agents", &self.agents)
            .field("tasks", &self.tasks)
            .field("llm", &self.llm.name())
            .finish()
    }
}

impl Crew {
    /// Assemble a crew
    ///
    /// # Errors
    /// Returns [`Error::Pipeline`] if there are no tasks, task names repeat,
    /// a task names an unknown agent, or a task's context refers to a task
    /// that does not run before it
    pub fn new(agents: Vec<Agent>, tasks: Vec<Task>, llm: Arc<dyn LlmProvider>) -> Result<Self> {
        if tasks.is_empty() {
            return Err(Error::Pipeline("crew has no tasks".to_string()));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for task in &tasks {
            if !agents.iter().any(|a| a.name() == task.agent) {
                return Err(Error::Pipeline(format!(
                    "task '{}' is assigned to unknown agent '{}'",
                    task.name, task.agent
                )));
            }
            if let Some(missing) = task.context.iter().find(|c| !seen.contains(c.as_str())) {
                return Err(Error::Pipeline(format!(
                    "task '{}' needs context from '{}', which does not run before it",
                    task.name, missing
                )));
            }
            if !seen.insert(task.name.as_str()) {
                return Err(Error::Pipeline(format!(
                    "duplicate task name '{}'",
                    task.name
                )));
            }
        }

        Ok(Self { agents, tasks, llm })
    }

    /// Agents of the crew
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Tasks of the crew, in execution order
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Run every task in order
    ///
    /// # Errors
    /// Returns error if a text task's model call fails
    pub async fn kickoff(&self) -> Result<CrewOutput> {
        let run_id = Uuid::new_v4();
        let span = info_span!("crew", %run_id, model = %self.llm.model());
        self.run(run_id).instrument(span).await
    }

    async fn run(&self, run_id: Uuid) -> Result<CrewOutput> {
        let started_at = Utc::now();
        info!(agents = self.agents.len(), tasks = self.tasks.len(), "Kicking off crew");

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        for task in &self.tasks {
            let output = self.execute(task, &outputs).await?;
            outputs.push(output);
        }

        let finished_at = Utc::now();
        let last = outputs
            .last()
            .cloned()
            .ok_or_else(|| Error::Pipeline("crew produced no output".to_string()))?;

        info!(
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            json = last.json.is_some(),
            "Crew finished"
        );

        Ok(CrewOutput {
            run_id,
            started_at,
            finished_at,
            raw: last.raw,
            json: last.json,
            tasks_output: outputs,
        })
    }

    async fn execute(&self, task: &Task, done: &[TaskOutput]) -> Result<TaskOutput> {
        let agent = self
            .agents
            .iter()
            .find(|a| a.name() == task.agent)
            .ok_or_else(|| Error::Pipeline(format!("unknown agent '{}'", task.agent)))?;

        info!(task = %task.name, agent = %agent.role(), "Starting task");

        let context: Vec<&TaskOutput> = task
            .context
            .iter()
            .filter_map(|name| done.iter().find(|o| &o.task == name))
            .collect();
        let observations = agent.gather(&task.search_queries).await;
        let prompt = task.render_prompt(agent, &context, &observations);

        let (raw, json) = match task.output_format {
            OutputFormat::Text => (self.llm.complete(&prompt).await?, None),
            OutputFormat::Json => {
                let value = self.llm.infer(&prompt).await.into_value();
                (value.to_string(), Some(value))
            }
        };

        info!(task = %task.name, output_len = raw.len(), "Task completed");

        Ok(TaskOutput {
            task: task.name.clone(),
            agent: agent.role().to_string(),
            raw,
            json,
        })
    }
}
