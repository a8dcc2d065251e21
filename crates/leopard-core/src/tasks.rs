//! Tasks - work items assigned to agents
//!
//! A task names its agent and the earlier tasks whose outputs it receives as
//! context. The crew turns a task into a single prompt with
//! [`Task::render_prompt`].

use crate::agents::{Agent, CALCULATOR, RESEARCHER};
use crate::crew::TaskOutput;
use crate::overrides::TaskOverride;
use serde::{Deserialize, Serialize};

/// Name of the research task
pub const RESEARCH_TASK: &str = "research_task";

/// Name of the calculation task
pub const CALCULATION_TASK: &str = "calculation_task";

/// How a task's output is obtained from the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Prose, taken verbatim
    #[default]
    Text,
    /// A JSON object, extracted from the model output
    Json,
}

/// A unit of work in the crew
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task name
    pub name: String,
    /// What to do
    pub description: String,
    /// What the answer should look like
    pub expected_output: String,
    /// Name of the agent that performs the task
    pub agent: String,
    /// Names of earlier tasks whose output is passed in
    #[serde(default)]
    pub context: Vec<String>,
    /// Queries run through the agent's tools before prompting
    #[serde(default)]
    pub search_queries: Vec<String>,
    /// Output handling
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl Task {
    /// Create a text task without context or queries
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        agent: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent: agent.into(),
            context: Vec::new(),
            search_queries: Vec::new(),
            output_format: OutputFormat::Text,
        }
    }

    /// Receive the output of an earlier task
    #[must_use]
    pub fn with_context(mut self, task: impl Into<String>) -> Self {
        self.context.push(task.into());
        self
    }

    /// Set the tool queries
    #[must_use]
    pub fn with_search_queries(mut self, queries: Vec<String>) -> Self {
        self.search_queries = queries;
        self
    }

    /// Set the output format
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Default research task
    #[must_use]
    pub fn research() -> Self {
        Self::new(
            RESEARCH_TASK,
            RESEARCHER,
            "Research and find the following factual information:\n\
             1. What is the maximum running speed of a leopard in km/h?\n\
             2. What is the length of the Pont des Arts bridge in Paris in meters?\n\n\
             Use the web search results to find accurate, current information. \
             Cite your sources if possible.",
            "A clear report containing:\n\
             - Leopard's maximum speed (in km/h)\n\
             - Pont des Arts bridge length (in meters)\n\
             - Sources or reasoning for these values",
        )
        .with_search_queries(vec![
            "leopard maximum running speed km/h".to_string(),
            "Pont des Arts bridge Paris length meters".to_string(),
        ])
    }

    /// Default calculation task, fed by the research task
    #[must_use]
    pub fn calculation() -> Self {
        Self::new(
            CALCULATION_TASK,
            CALCULATOR,
            "Using the research data provided, calculate how many seconds it would take \
             for a leopard running at maximum speed to cross the Pont des Arts bridge.\n\n\
             Steps:\n\
             1. Convert the leopard's speed from km/h to m/s (divide by 3.6)\n\
             2. Apply the formula: Time (seconds) = Distance (meters) / Speed (m/s)\n\
             3. Round to 2 decimal places\n\n\
             Show your calculations clearly.",
            "A JSON response with the following structure:\n\
             {\n\
             \x20 \"speed_kmh\": <number>,\n\
             \x20 \"speed_ms\": <number>,\n\
             \x20 \"length_meters\": <number>,\n\
             \x20 \"time_seconds\": <number>,\n\
             \x20 \"calculation\": \"<formula and steps>\",\n\
             \x20 \"explanation\": \"<brief explanation>\"\n\
             }",
        )
        .with_context(RESEARCH_TASK)
        .with_output_format(OutputFormat::Json)
    }

    /// Replace the fields set in `overrides`
    #[must_use]
    pub fn with_overrides(mut self, overrides: Option<&TaskOverride>) -> Self {
        let Some(o) = overrides else {
            return self;
        };
        if let Some(description) = &o.description {
            self.description.clone_from(description);
        }
        if let Some(expected) = &o.expected_output {
            self.expected_output.clone_from(expected);
        }
        if let Some(queries) = &o.search_queries {
            self.search_queries.clone_from(queries);
        }
        if let Some(format) = o.output_format {
            self.output_format = format;
        }
        self
    }

    /// Build the prompt sent to the model
    ///
    /// `context` outputs are embedded verbatim, followed by the agent's tool
    /// observations as `(query, observation)` pairs.
    #[must_use]
    pub fn render_prompt(
        &self,
        agent: &Agent,
        context: &[&TaskOutput],
        observations: &[(String, String)],
    ) -> String {
        let mut prompt = agent.persona_prompt();

        prompt.push_str("\n\nTask:\n");
        prompt.push_str(&self.description);
        prompt.push_str("\n\nExpected output:\n");
        prompt.push_str(&self.expected_output);

        if !context.is_empty() {
            prompt.push_str("\n\nContext from previous tasks:");
            for output in context {
                prompt.push_str(&format!("\n[{}]\n{}", output.task, output.raw));
            }
        }

        if !observations.is_empty() {
            prompt.push_str("\n\nWeb search results:");
            for (query, observation) in observations {
                prompt.push_str(&format!("\nQuery: {}\n{}", query, observation));
            }
        }

        if self.output_format == OutputFormat::Json {
            prompt.push_str("\n\nRespond with the JSON object only.");
        }

        prompt
    }
}
