//! Model invocation and completion decoding.
//!
//! The actual network call is abstracted behind [`ModelInvoker`] so the
//! Lambda can plug in the Bedrock client while tests substitute a stub.

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::error::{Fault, Result};

/// Service error codes that mean the model service itself failed.
const SERVER_SIDE_CODES: &[&str] = &["InternalServerError", "InternalServerException"];

/// Failure reported by a [`ModelInvoker`].
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The service answered with a structured error.
    #[error("model service returned {code}: {message}")]
    Service { code: String, message: String },

    /// The request never produced a service answer (dispatch, timeout, ...).
    #[error("model invocation failed")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl InvocationError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        InvocationError::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        InvocationError::Transport(err.into())
    }
}

/// Capability that sends a payload to a text-generation model.
///
/// Implementations must be safe to share across concurrent invocations.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Invoke `model_id` with a JSON `payload`, returning the raw response body.
    async fn invoke(
        &self,
        model_id: &str,
        payload: &str,
    ) -> std::result::Result<Vec<u8>, InvocationError>;
}

#[derive(Debug, Deserialize)]
struct CompletionsBody {
    completions: Vec<Completion>,
}

#[derive(Debug, Deserialize)]
struct Completion {
    data: CompletionData,
}

#[derive(Debug, Deserialize)]
struct CompletionData {
    text: String,
}

/// Decode a model response body and join its completion texts with `\n`.
pub fn decode_completions(body: &[u8]) -> anyhow::Result<String> {
    let decoded: CompletionsBody =
        serde_json::from_slice(body).context("failed to decode model response body")?;

    let texts: Vec<String> = decoded
        .completions
        .into_iter()
        .map(|completion| completion.data.text)
        .collect();

    Ok(texts.join("\n"))
}

/// Invoke the model once and normalize its output or failure.
///
/// Service errors are classified by code: server-side codes become
/// [`Fault::Server`], every other code [`Fault::Client`]. Transport failures
/// and undecodable responses are left unclassified.
pub async fn invoke_model(
    invoker: &dyn ModelInvoker,
    model_id: &str,
    payload: &str,
) -> Result<String> {
    let body = match invoker.invoke(model_id, payload).await {
        Ok(body) => body,
        Err(InvocationError::Service { code, message }) => {
            return Err(if SERVER_SIDE_CODES.contains(&code.as_str()) {
                Fault::server(payload, message)
            } else {
                Fault::client(payload, message)
            });
        }
        Err(err @ InvocationError::Transport(_)) => {
            return Err(Fault::Unclassified(anyhow::Error::new(err)));
        }
    };

    debug!(model_id, response_bytes = body.len(), "model responded");

    Ok(decode_completions(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FaultKind;
    use std::sync::Mutex;

    struct Scripted {
        reply: Mutex<Option<std::result::Result<Vec<u8>, InvocationError>>>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl Scripted {
        fn new(reply: std::result::Result<Vec<u8>, InvocationError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelInvoker for Scripted {
        async fn invoke(
            &self,
            model_id: &str,
            payload: &str,
        ) -> std::result::Result<Vec<u8>, InvocationError> {
            self.seen
                .lock()
                .unwrap()
                .push((model_id.to_string(), payload.to_string()));
            self.reply.lock().unwrap().take().expect("single call")
        }
    }

    fn completions(texts: &[&str]) -> Vec<u8> {
        let items: Vec<_> = texts
            .iter()
            .map(|t| serde_json::json!({ "data": { "text": t } }))
            .collect();
        serde_json::json!({ "completions": items }).to_string().into_bytes()
    }

    #[test]
    fn decode_joins_segments_in_order() {
        let text = decode_completions(&completions(&["a", "b", "c"])).unwrap();
        assert_eq!(text, "a\nb\nc");
    }

    #[test]
    fn decode_empty_completions_is_empty_string() {
        assert_eq!(decode_completions(&completions(&[])).unwrap(), "");
    }

    #[test]
    fn decode_rejects_unexpected_shape() {
        assert!(decode_completions(br#"{"outputs": []}"#).is_err());
        assert!(decode_completions(b"not json").is_err());
    }

    #[tokio::test]
    async fn forwards_model_id_and_payload() {
        let invoker = Scripted::new(Ok(completions(&["hello"])));
        let text = invoke_model(&invoker, "ai21.j2-mid-v1", r#"{"prompt":"hi"}"#)
            .await
            .unwrap();

        assert_eq!(text, "hello");
        let seen = invoker.seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[("ai21.j2-mid-v1".to_string(), r#"{"prompt":"hi"}"#.to_string())]
        );
    }

    #[tokio::test]
    async fn internal_server_error_code_is_server_fault() {
        let invoker = Scripted::new(Err(InvocationError::service(
            "InternalServerError",
            "try again later",
        )));
        let err = invoke_model(&invoker, "m", "payload").await.unwrap_err();
        assert_eq!(err.kind(), FaultKind::Server);
        assert_eq!(err.input(), Some("payload"));
        assert!(err.to_string().starts_with("try again later"));
    }

    #[tokio::test]
    async fn modeled_internal_server_exception_is_server_fault() {
        let invoker = Scripted::new(Err(InvocationError::service(
            "InternalServerException",
            "oops",
        )));
        let err = invoke_model(&invoker, "m", "payload").await.unwrap_err();
        assert_eq!(err.kind(), FaultKind::Server);
    }

    #[tokio::test]
    async fn other_codes_are_client_faults() {
        for code in ["ValidationException", "AccessDeniedException", "ThrottlingException"] {
            let invoker = Scripted::new(Err(InvocationError::service(code, "rejected")));
            let err = invoke_model(&invoker, "m", "payload").await.unwrap_err();
            assert_eq!(err.kind(), FaultKind::Client, "{code}");
            assert_eq!(err.public_message(), "client error. rejected");
        }
    }

    #[tokio::test]
    async fn transport_failure_is_unclassified() {
        let invoker = Scripted::new(Err(InvocationError::transport("connection reset")));
        let err = invoke_model(&invoker, "m", "payload").await.unwrap_err();
        assert_eq!(err.kind(), FaultKind::Unclassified);
    }

    #[tokio::test]
    async fn malformed_response_is_unclassified() {
        let invoker = Scripted::new(Ok(b"{}".to_vec()));
        let err = invoke_model(&invoker, "m", "payload").await.unwrap_err();
        assert_eq!(err.kind(), FaultKind::Unclassified);
    }
}
