//! Error types for leopard-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// LLM provider error
    #[error("llm error: {0}")]
    Llm(#[from] leopard_llm::Error),

    /// Tool execution error
    #[error("tool error: {0}")]
    Tool(String),

    /// Invalid agent/task configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Crew wiring error (unknown agent, context referring to a later task)
    #[error("pipeline error: {0}")]
    Pipeline(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
