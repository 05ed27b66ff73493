//! Amazon Bedrock implementation of [`ModelInvoker`].

use std::fmt::Debug;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_bedrockruntime::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use tracing::error;

use textgen_lib::{InvocationError, ModelInvoker};

/// Code reported when the service error carries no code of its own.
const UNKNOWN_CODE: &str = "Unknown";

/// Bedrock runtime client wrapped as a [`ModelInvoker`].
///
/// The SDK client is cheap to clone and safe for concurrent use, so one
/// instance serves every invocation of the process.
#[derive(Debug, Clone)]
pub struct BedrockInvoker {
    client: Client,
}

impl BedrockInvoker {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the standard AWS environment (region, credentials).
    ///
    /// SDK-level retries are disabled: each invocation makes exactly one
    /// attempt against the model service.
    pub async fn from_env() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(RetryConfig::disabled())
            .load()
            .await;
        Self::new(Client::new(&config))
    }

    /// Region the client was configured for, if any.
    pub fn region(&self) -> Option<String> {
        self.client.config().region().map(|r| r.to_string())
    }
}

#[async_trait]
impl ModelInvoker for BedrockInvoker {
    async fn invoke(&self, model_id: &str, payload: &str) -> Result<Vec<u8>, InvocationError> {
        let output = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(payload.as_bytes().to_vec()))
            .send()
            .await
            .map_err(|e| {
                error!(model_id, error = %e, "Bedrock invoke_model failed");
                classify_sdk_error(e)
            })?;

        Ok(output.body.into_inner())
    }
}

/// Split SDK failures into service answers (with a code) and everything else.
fn classify_sdk_error<E, R>(err: SdkError<E, R>) -> InvocationError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    match err {
        SdkError::ServiceError(service) => {
            let inner = service.err();
            InvocationError::service(
                inner.code().unwrap_or(UNKNOWN_CODE),
                inner.message().unwrap_or_default(),
            )
        }
        other => InvocationError::transport(other),
    }
}
