//! Test utilities for Lambda handler testing.
//!
//! This module provides shared test infrastructure for the Lambda crates:
//! a scripted [`StubInvoker`], model response fixtures, environment fixtures
//! and helpers for building API Gateway events.
//!
//! # Usage
//!
//! These utilities are only available in test builds:
//!
//! ```ignore
//! use textgen_lambda_shared::test_utils::{api_event, model_env, StubInvoker};
//!
//! #[tokio::test]
//! async fn test_handler() {
//!     let invoker = StubInvoker::echo();
//!     let event = api_event(r#"{"prompt": "hi"}"#);
//!     // ... invoke handler logic with `model_env()` and `&invoker`
//! }
//! ```

use std::sync::Mutex;

use async_trait::async_trait;
use lambda_runtime::{Context, LambdaEvent};
use serde_json::{json, Value};

use textgen_lib::{InvocationError, ModelInvoker};

/// Model identifier used by fixtures.
pub const TEST_MODEL_ID: &str = "ai21.j2-mid-v1";

/// Scripted behaviour of a [`StubInvoker`].
#[derive(Debug, Clone)]
pub enum StubReply {
    /// Echo the payload's `prompt` back as a single completion.
    Echo,
    /// Return the given completion segments.
    Completions(Vec<String>),
    /// Return this raw body verbatim.
    Raw(Vec<u8>),
    /// Fail with a service error carrying `code` and `message`.
    ServiceError { code: String, message: String },
    /// Fail before the service answers.
    Transport(String),
    /// Panic inside the invocation.
    Panic,
}

/// In-memory [`ModelInvoker`] with a fixed reply and call recording.
#[derive(Debug)]
pub struct StubInvoker {
    reply: StubReply,
    calls: Mutex<Vec<(String, String)>>,
}

impl StubInvoker {
    pub fn new(reply: StubReply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Stub that echoes the prompt.
    pub fn echo() -> Self {
        Self::new(StubReply::Echo)
    }

    /// Stub that returns the given segments.
    pub fn completions<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self::new(StubReply::Completions(
            texts.into_iter().map(Into::into).collect(),
        ))
    }

    /// Stub that fails with a service error.
    pub fn service_error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StubReply::ServiceError {
            code: code.into(),
            message: message.into(),
        })
    }

    /// Recorded `(model_id, payload)` pairs, in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ModelInvoker for StubInvoker {
    async fn invoke(&self, model_id: &str, payload: &str) -> Result<Vec<u8>, InvocationError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((model_id.to_string(), payload.to_string()));
        }

        match &self.reply {
            StubReply::Echo => {
                let prompt = serde_json::from_str::<Value>(payload)
                    .ok()
                    .and_then(|v| v.get("prompt").and_then(Value::as_str).map(str::to_string))
                    .unwrap_or_default();
                Ok(completions_body([prompt]))
            }
            StubReply::Completions(texts) => Ok(completions_body(texts.iter().cloned())),
            StubReply::Raw(body) => Ok(body.clone()),
            StubReply::ServiceError { code, message } => {
                Err(InvocationError::service(code.clone(), message.clone()))
            }
            StubReply::Transport(reason) => Err(InvocationError::transport(reason.clone())),
            StubReply::Panic => panic!("stub invoker asked to panic"),
        }
    }
}

/// Serialize completion segments in the model service's response shape.
pub fn completions_body<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Vec<u8> {
    let completions: Vec<Value> = texts
        .into_iter()
        .map(|text| json!({ "data": { "text": text.into() } }))
        .collect();
    json!({ "completions": completions }).to_string().into_bytes()
}

/// Environment with `MODEL_ID` set, as deployed.
pub fn model_env() -> Vec<(String, String)> {
    vec![
        ("MODEL_ID".to_string(), TEST_MODEL_ID.to_string()),
        ("LOG_LEVEL".to_string(), "INFO".to_string()),
        ("POWERTOOLS_SERVICE_NAME".to_string(), "text_api".to_string()),
    ]
}

/// Environment lacking `MODEL_ID`.
pub fn env_without_model_id() -> Vec<(String, String)> {
    model_env()
        .into_iter()
        .filter(|(k, _)| k != "MODEL_ID")
        .collect()
}

/// API Gateway proxy event with the given string body.
pub fn api_event(body: &str) -> Value {
    json!({
        "resource": "/text",
        "path": "/text",
        "httpMethod": "POST",
        "headers": { "Content-Type": "application/json" },
        "requestContext": { "requestId": "c6af9ac6-7b61-11e6-9a41-93e8deadbeef" },
        "body": body,
        "isBase64Encoded": false
    })
}

/// API Gateway proxy event for a prompt.
pub fn prompt_event(prompt: &str) -> Value {
    api_event(&json!({ "prompt": prompt }).to_string())
}

/// Wrap a payload in a [`LambdaEvent`] with a recognisable request id.
pub fn lambda_event(payload: Value, suffix: &str) -> LambdaEvent<Value> {
    let mut context = Context::default();
    context.request_id = mock_request_id(suffix);
    LambdaEvent::new(payload, context)
}

/// Create a mock request ID for testing.
///
/// A request ID string in the format "test-request-{suffix}".
pub fn mock_request_id(suffix: &str) -> String {
    format!("test-request-{}", suffix)
}
