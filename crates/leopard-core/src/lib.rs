//! Leopard Core - agents, tasks and the crew
//!
//! This crate runs the two-stage crossing pipeline:
//! - Tools: tool trait and the DuckDuckGo web search tool
//! - Agents: researcher and calculator personas
//! - Tasks: research and calculation work items with context passing
//! - Crew: sequential execution of tasks by their agents
//! - Crossing: typed result, arithmetic cross-check and response payloads
//! - Overrides: `agents.yaml` / `tasks.yaml` loading

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod agents;
pub mod crew;
pub mod crossing;
pub mod error;
pub mod overrides;
pub mod pipeline;
pub mod tasks;
pub mod tools;

pub use agents::{Agent, AgentProfile};
pub use crew::{Crew, CrewOutput, TaskOutput};
pub use crossing::{result_payload, simple_payload, CrossingResult};
pub use error::{Error, Result};
pub use overrides::{load_overrides, PipelineOverrides};
pub use pipeline::CrossingPipeline;
pub use tasks::{OutputFormat, Task};
pub use tools::{SearchConfig, Tool, ToolDefinition, ToolResult, WebSearchTool};
