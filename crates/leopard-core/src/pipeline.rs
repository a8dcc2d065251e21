//! Crossing pipeline - the researcher → calculator crew, assembled
//!
//! Built once from the shared LLM handle, the search tool and the persona /
//! task overrides; every [`CrossingPipeline::run`] assembles a fresh crew.

use crate::agents::{Agent, AgentProfile, CALCULATOR, RESEARCHER};
use crate::crew::{Crew, CrewOutput};
use crate::crossing::{CrossingResult, CONSISTENCY_TOLERANCE_SECS};
use crate::error::Result;
use crate::overrides::PipelineOverrides;
use crate::tasks::{Task, CALCULATION_TASK, RESEARCH_TASK};
use crate::tools::Tool;
use leopard_llm::LlmProvider;
use std::sync::Arc;
use tracing::{info, warn};

/// The two-stage leopard crossing pipeline
#[derive(Clone)]
pub struct CrossingPipeline {
    llm: Arc<dyn LlmProvider>,
    search: Arc<dyn Tool>,
    overrides: PipelineOverrides,
}

impl std::fmt::Debug for CrossingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossingPipeline")
            .field("llm", &self.llm.name())
            .field("search", &self.search.definition().name)
            .field("overrides", &self.overrides)
            .finish()
    }
}

impl CrossingPipeline {
    /// Create a pipeline
    #[must_use]
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        search: Arc<dyn Tool>,
        overrides: PipelineOverrides,
    ) -> Self {
        Self {
            llm,
            search,
            overrides,
        }
    }

    /// Researcher (with the search tool) and calculator (no tools)
    #[must_use]
    pub fn agents(&self) -> Vec<Agent> {
        let researcher = AgentProfile::researcher().with_overrides(self.overrides.agent(RESEARCHER));
        let calculator = AgentProfile::calculator().with_overrides(self.overrides.agent(CALCULATOR));
        vec![
            Agent::new(RESEARCHER, researcher).with_tool(Arc::clone(&self.search)),
            Agent::new(CALCULATOR, calculator),
        ]
    }

    /// Research task followed by the calculation task
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        vec![
            Task::research().with_overrides(self.overrides.task(RESEARCH_TASK)),
            Task::calculation().with_overrides(self.overrides.task(CALCULATION_TASK)),
        ]
    }

    /// Assemble the crew for one run
    ///
    /// # Errors
    /// Returns error if the crew wiring is invalid
    pub fn crew(&self) -> Result<Crew> {
        Crew::new(self.agents(), self.tasks(), Arc::clone(&self.llm))
    }

    /// Run the pipeline once
    ///
    /// The calculator's answer is returned as produced. If its time does not
    /// match its own speed and length, a warning is logged.
    ///
    /// # Errors
    /// Returns error if the crew cannot be assembled or the research stage fails
    pub async fn run(&self) -> Result<CrewOutput> {
        let output = self.crew()?.kickoff().await?;

        if let Some(result) = output.json.as_ref().and_then(CrossingResult::from_value) {
            match (result.expected_time_seconds(), result.discrepancy()) {
                (Some(expected), Some(gap)) if gap > CONSISTENCY_TOLERANCE_SECS => warn!(
                    run_id = %output.run_id,
                    reported = ?result.time_seconds,
                    expected,
                    "Reported crossing time does not match speed and length"
                ),
                _ => info!(
                    run_id = %output.run_id,
                    time_seconds = ?result.time_seconds,
                    "Crossing time computed"
                ),
            }
        }

        Ok(output)
    }
}
