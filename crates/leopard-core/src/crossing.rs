//! Crossing result - typed view of the calculator's answer and the payloads
//! the front ends return

use crate::crew::CrewOutput;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Largest accepted gap between reported and recomputed crossing time
pub const CONSISTENCY_TOLERANCE_SECS: f64 = 0.05;

/// Explanation attached to final output that is not JSON
pub const NOT_JSON_EXPLANATION: &str = "Result was not in JSON format";

/// Answer schema of the calculation task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossingResult {
    /// Leopard top speed in km/h
    pub speed_kmh: Option<f64>,
    /// Leopard top speed in m/s
    pub speed_ms: Option<f64>,
    /// Bridge length in meters
    pub length_meters: Option<f64>,
    /// Crossing time in seconds
    pub time_seconds: Option<f64>,
    /// Formula and steps
    pub calculation: Option<String>,
    /// Short explanation
    pub explanation: Option<String>,
}

impl CrossingResult {
    /// Typed view of a JSON answer; `None` if a field has the wrong type
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() || value.get("error").is_some() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// `length / (speed_kmh / 3.6)`, rounded to 2 decimals
    #[must_use]
    pub fn expected_time_seconds(&self) -> Option<f64> {
        let speed_ms = self.speed_kmh? / 3.6;
        if speed_ms <= 0.0 || !speed_ms.is_finite() {
            return None;
        }
        Some(round2(self.length_meters? / speed_ms))
    }

    /// Gap between the reported time and the recomputed one
    #[must_use]
    pub fn discrepancy(&self) -> Option<f64> {
        Some((self.time_seconds? - self.expected_time_seconds()?).abs())
    }

    /// Whether the reported time matches the reported inputs; `true` when
    /// there is not enough data to tell
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.discrepancy()
            .map_or(true, |gap| gap <= CONSISTENCY_TOLERANCE_SECS)
    }
}

/// Round to 2 decimal places
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Response for a finished run: the parsed JSON, or the raw text with a note
#[must_use]
pub fn result_payload(output: &CrewOutput) -> Value {
    match &output.json {
        Some(value) => value.clone(),
        None => json!({
            "raw_output": output.raw,
            "explanation": NOT_JSON_EXPLANATION,
        }),
    }
}

/// Reduced response: crossing time and explanation only
///
/// Payloads carrying `error` or `raw_output` pass through unchanged. The
/// explanation falls back to `calculation`.
#[must_use]
pub fn simple_payload(result: &Value) -> Value {
    if result.get("error").is_some() || result.get("raw_output").is_some() {
        return result.clone();
    }

    let explanation = result
        .get("explanation")
        .filter(|v| !v.is_null())
        .or_else(|| result.get("calculation"))
        .cloned()
        .unwrap_or(Value::Null);

    json!({
        "time_seconds": result.get("time_seconds").cloned().unwrap_or(Value::Null),
        "explanation": explanation,
    })
}
