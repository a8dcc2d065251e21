//! Mock transport for testing
//!
//! Replies are scripted up front; every request is recorded so tests can
//! assert on URLs, headers and payloads.

use super::Transport;
use crate::error::{Error, Result};
use crate::providers::PreparedRequest;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

type Reply = Box<dyn Fn() -> Result<Value> + Send + Sync>;

/// A transport that replays queued replies, then falls back to a default one
pub struct MockTransport {
    queue: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    requests: Mutex<Vec<PreparedRequest>>,
    gets: Mutex<Vec<String>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Create a mock whose unscripted replies are network errors
    #[must_use]
    pub fn new() -> Self {
        Self::with_fallback(|| Err(Error::Network("no scripted reply".to_string())))
    }

    /// Create a mock that always replies with `body`
    #[must_use]
    pub fn always(body: Value) -> Self {
        Self::with_fallback(move || Ok(body.clone()))
    }

    /// Create a mock that always fails with the given HTTP status
    #[must_use]
    pub fn always_status(status: u16) -> Self {
        Self::with_fallback(move || {
            Err(Error::Api {
                status,
                message: format!("HTTP {}", status),
            })
        })
    }

    fn with_fallback(fallback: impl Fn() -> Result<Value> + Send + Sync + 'static) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Box::new(fallback),
            requests: Mutex::new(Vec::new()),
            gets: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    #[must_use]
    pub fn then_ok(self, body: Value) -> Self {
        self.push(Box::new(move || Ok(body.clone())));
        self
    }

    /// Queue an HTTP error reply
    #[must_use]
    pub fn then_status(self, status: u16) -> Self {
        self.push(Box::new(move || {
            Err(Error::Api {
                status,
                message: format!("HTTP {}", status),
            })
        }));
        self
    }

    /// Queue a chat-completions reply carrying `content`
    #[must_use]
    pub fn then_chat(self, content: &str) -> Self {
        self.then_ok(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }))
    }

    fn push(&self, reply: Reply) {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
    }

    fn next_reply(&self) -> Result<Value> {
        let reply = self
            .queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match reply {
            Some(reply) => reply(),
            None => (self.fallback)(),
        }
    }

    /// All POST requests seen so far
    #[must_use]
    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of POST requests seen so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// URLs of all GET requests seen so far
    #[must_use]
    pub fn get_urls(&self) -> Vec<String> {
        self.gets.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, request: &PreparedRequest) -> Result<Value> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        self.next_reply()
    }

    async fn get_json(&self, url: &str, _headers: &[(String, String)]) -> Result<Value> {
        self.gets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.to_string());
        self.next_reply()
    }
}
