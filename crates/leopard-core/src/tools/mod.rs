//! Tools - capabilities an agent can use before asking the model
//!
//! A tool takes a JSON input and produces a [`ToolResult`]. Agents never show
//! raw results to the model; they ask the tool to render an observation
//! string instead, so a failing tool degrades into text rather than failing
//! the stage.

mod web_search;

pub use web_search::{SearchConfig, SearchResult, WebSearchTool};

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Tool metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name
    pub name: String,
    /// Human-readable description
    pub description: String,
}

impl ToolDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Result of a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether execution succeeded
    pub success: bool,
    /// Output data
    pub output: serde_json::Value,
    /// Error message if failed
    pub error: Option<String>,
    /// Execution duration in milliseconds
    pub duration_ms: u64,
}

impl ToolResult {
    /// Create a successful result
    #[must_use]
    pub fn success(output: serde_json::Value, duration_ms: u64) -> Self {
        Self {
            success: true,
            output,
            error: None,
            duration_ms,
        }
    }

    /// Create a failed result
    #[must_use]
    pub fn failure(error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            success: false,
            output: serde_json::Value::Null,
            error: Some(error.into()),
            duration_ms,
        }
    }
}

/// Trait for tool implementations
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition
    fn definition(&self) -> &ToolDefinition;

    /// Execute the tool with given input
    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult>;

    /// Text shown to the model for a successful result
    fn render(&self, result: &ToolResult) -> String {
        result.output.to_string()
    }

    /// Text shown to the model when the tool failed
    fn render_failure(&self, reason: &str) -> String {
        format!("{} failed: {}", self.definition().name, reason)
    }

    /// Execute and render in one step; never fails
    async fn observe(&self, input: serde_json::Value) -> String {
        match self.execute(input).await {
            Ok(result) if result.success => self.render(&result),
            Ok(result) => {
                let reason = result.error.unwrap_or_else(|| "unknown error".to_string());
                self.render_failure(&reason)
            }
            Err(e) => self.render_failure(&e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    struct EchoTool {
        definition: ToolDefinition,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(&self, input: serde_json::Value) -> Result<ToolResult> {
            if self.fail {
                return Err(Error::Tool("boom".to_string()));
            }
            Ok(ToolResult::success(input, 0))
        }
    }

    #[test]
    fn test_tool_definition() {
        let def = ToolDefinition::new("echo", "Echo input");
        assert_eq!(def.name, "echo");
        assert_eq!(def.description, "Echo input");
    }

    #[test]
    fn test_tool_result() {
        let ok = ToolResult::success(json!({"n": 1}), 12);
        assert!(ok.success);
        assert!(ok.error.is_none());

        let failed = ToolResult::failure("blocked", 3);
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("blocked"));
        assert!(failed.output.is_null());
    }

    #[tokio::test]
    async fn test_observe_renders_output() {
        let tool = EchoTool {
            definition: ToolDefinition::new("echo", "Echo input"),
            fail: false,
        };
        assert_eq!(tool.observe(json!({"q": 1})).await, r#"{"q":1}"#);
    }

    #[tokio::test]
    async fn test_observe_renders_error() {
        let tool = EchoTool {
            definition: ToolDefinition::new("echo", "Echo input"),
            fail: true,
        };
        assert_eq!(
            tool.observe(json!({})).await,
            "echo failed: tool error: boom"
        );
    }
}
