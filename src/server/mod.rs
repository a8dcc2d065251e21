//! Server module for Leopard Crossing
//!
//! # Module Structure
//!
//! - `config`: Configuration structures
//! - `loader`: Configuration loading from files and environment
//! - `state`: LLM client, search tool and overrides shared by the front ends
//! - `init`: HTTP server startup and run loop

pub mod config;
mod init;
mod loader;
pub mod state;

pub use self::config::AppConfig;
pub use init::run;
pub use loader::load_config;
pub use state::AppState;
