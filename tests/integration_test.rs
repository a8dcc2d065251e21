//! Integration tests for Leopard Crossing
//!
//! These tests verify the integration between the crates:
//! - leopard-llm: provider shapes, retries and JSON extraction
//! - leopard-core: agents, tasks, crew and result payloads

use std::sync::Arc;
use std::time::Duration;

use leopard_core::{
    load_overrides, result_payload, simple_payload, CrossingPipeline, CrossingResult,
    PipelineOverrides, Tool, ToolDefinition, ToolResult,
};
use leopard_llm::{
    extract_json, InferenceResult, LlmClient, LlmProvider, MockTransport, ProviderConfig,
};
use serde_json::{json, Value};

/// Search tool returning canned snippets per query
struct CannedSearch {
    definition: ToolDefinition,
}

impl CannedSearch {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            definition: ToolDefinition::new("web_search", "Canned search"),
        })
    }
}

#[async_trait::async_trait]
impl Tool for CannedSearch {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value) -> leopard_core::Result<ToolResult> {
        let query = input["query"].as_str().unwrap_or_default();
        let snippet = if query.contains("leopard") {
            "Leopards can reach 58 km/h in short bursts."
        } else {
            "The Pont des Arts footbridge is 155 metres long."
        };
        Ok(ToolResult::success(json!({ "snippet": snippet }), 0))
    }

    fn render(&self, result: &ToolResult) -> String {
        format!("- result: {}", result.output["snippet"].as_str().unwrap_or_default())
    }
}

fn vllm_client(transport: Arc<MockTransport>) -> Arc<dyn LlmProvider> {
    let config = ProviderConfig::new("vllm", "http://test", "test-model")
        .with_retry_delay(Duration::from_millis(5));
    Arc::new(LlmClient::with_transport(config, transport).unwrap())
}

fn completion(text: &str) -> Value {
    json!({ "choices": [{ "text": text }] })
}

// ============================================================================
// Pipeline Integration Tests
// ============================================================================

#[tokio::test]
async fn test_pipeline_end_to_end() {
    let research = "Leopard top speed: 58 km/h. Pont des Arts length: 155 m.";
    let answer = r#"{"speed_kmh":58,"speed_ms":16.11,"length_meters":155,"time_seconds":9.62,"calculation":"155 / 16.11 = 9.62","explanation":"A leopard crosses in about 9.62 seconds."}"#;
    let transport = Arc::new(
        MockTransport::new()
            .then_ok(completion(research))
            .then_ok(completion(answer)),
    );
    let pipeline = CrossingPipeline::new(
        vllm_client(transport.clone()),
        CannedSearch::new(),
        PipelineOverrides::default(),
    );

    let output = pipeline.run().await.unwrap();

    // research stage saw the search observations
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, "http://test/completions");
    let research_prompt = requests[0].payload["prompt"].as_str().unwrap();
    assert!(research_prompt.contains("- result: Leopards can reach 58 km/h"));
    assert!(research_prompt.contains("- result: The Pont des Arts footbridge is 155 metres long."));

    // calculation stage saw the research output verbatim
    let calculation_prompt = requests[1].payload["prompt"].as_str().unwrap();
    assert!(calculation_prompt.contains(research));
    assert!(calculation_prompt.starts_with("You are a Physics Calculator."));

    let payload = result_payload(&output);
    assert_eq!(payload["time_seconds"], 9.62);
    let result = CrossingResult::from_value(&payload).unwrap();
    assert!(result.is_consistent());

    assert_eq!(
        simple_payload(&payload),
        json!({"time_seconds": 9.62, "explanation": "A leopard crosses in about 9.62 seconds."})
    );
}

#[tokio::test]
async fn test_pipeline_text_output_is_raw() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("tasks.yaml"),
        "calculation_task:\n  output_format: text\n",
    )
    .unwrap();
    let overrides = load_overrides(dir.path()).unwrap();

    let transport = Arc::new(
        MockTransport::new()
            .then_ok(completion("58 km/h, 155 m"))
            .then_ok(completion("Roughly ten seconds.")),
    );
    let pipeline = CrossingPipeline::new(vllm_client(transport), CannedSearch::new(), overrides);

    let output = pipeline.run().await.unwrap();

    assert_eq!(
        result_payload(&output),
        json!({
            "raw_output": "Roughly ten seconds.",
            "explanation": "Result was not in JSON format"
        })
    );
}

#[tokio::test]
async fn test_pipeline_calculator_failure_is_error_payload() {
    // research succeeds, every calculator attempt fails
    let transport = Arc::new(
        MockTransport::always_status(500).then_ok(completion("58 km/h, 155 m")),
    );
    let pipeline = CrossingPipeline::new(
        vllm_client(transport.clone()),
        CannedSearch::new(),
        PipelineOverrides::default(),
    );

    let output = pipeline.run().await.unwrap();
    let payload = result_payload(&output);

    assert_eq!(payload, json!({"error": "LLM API request failed after retries"}));
    assert_eq!(simple_payload(&payload), payload);
    assert_eq!(transport.call_count(), 1 + 3);
}

// ============================================================================
// LLM Client Integration Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_retry_spacing_with_defaults() {
    let transport = Arc::new(MockTransport::always_status(500));
    let client = LlmClient::with_transport(
        ProviderConfig::new("vllm", "http://test", "test-model"),
        transport.clone(),
    )
    .unwrap();
    let start = tokio::time::Instant::now();

    let result = client.infer("How fast is a leopard?").await;

    assert_eq!(
        result,
        InferenceResult::Error("LLM API request failed after retries".to_string())
    );
    assert_eq!(transport.call_count(), 3);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(10));
    assert!(elapsed < Duration::from_secs(15));
}

#[test]
fn test_extract_json_never_fails() {
    for text in ["", "   ", "{", "```json\n{oops}\n```", "plain prose", "[1, 2"] {
        let value = extract_json(text);
        assert_eq!(value, json!({"error": "Invalid JSON received from LLM"}), "{text:?}");
    }

    let answer = json!({"time_seconds": 9.62, "nested": {"ok": true}});
    assert_eq!(extract_json(&answer.to_string()), answer);
}
