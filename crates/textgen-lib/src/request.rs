//! Inbound request parsing.

use serde_json::Value;

use crate::encoding::single_field_object;
use crate::error::{Fault, Result};

const INVALID_PARAMETER: &str = "Invalid parameter.";

/// Placeholder recorded as the offending input when the event has no body.
pub const ABSENT_BODY: &str = "<absent>";

/// The caller's decoded intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    /// Text prompt forwarded to the model. Length is not checked.
    pub prompt: String,
}

impl InboundRequest {
    /// Parse the request from an API Gateway proxy event.
    ///
    /// The event's `body` must be a string holding a JSON object with a
    /// string `prompt`. A repeated `prompt` key resolves to its last value.
    /// Any other shape is a client fault carrying the raw body as offending
    /// input.
    pub fn from_event(event: &Value) -> Result<Self> {
        let body = event.get("body");

        let raw = match body {
            Some(Value::String(raw)) => raw,
            Some(other) => return Err(Fault::client(other.to_string(), INVALID_PARAMETER)),
            None => return Err(Fault::client(ABSENT_BODY, INVALID_PARAMETER)),
        };

        let decoded: Value = serde_json::from_str(raw)
            .map_err(|_| Fault::client(raw.as_str(), INVALID_PARAMETER))?;

        match decoded.get("prompt").and_then(Value::as_str) {
            Some(prompt) => Ok(Self {
                prompt: prompt.to_string(),
            }),
            None => Err(Fault::client(raw.as_str(), INVALID_PARAMETER)),
        }
    }

    /// Serialize into the payload the model service expects:
    /// `{"prompt": ...}` with non-ASCII characters escaped.
    pub fn to_body(&self) -> String {
        single_field_object("prompt", &self.prompt)
    }
}
