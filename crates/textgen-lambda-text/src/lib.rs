//! AWS Lambda function generating text from a prompt.
//!
//! The handler resolves configuration, parses the API Gateway event, invokes
//! the model and always answers with an [`OutboundResponse`]. Every failure,
//! including a panic inside the pipeline, converges in [`handle_event`].

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use http::StatusCode;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, field, info, info_span, warn, Instrument, Span};

use textgen_lambda_shared::{get_runtime, init_runtime, init_tracing, OutboundResponse};
use textgen_lib::{invoke_model, process_env, EnvConfig, Fault, InboundRequest, ModelInvoker};

/// Entry point used by the Lambda runtime.
pub async fn run() -> Result<(), Error> {
    init_tracing();

    // Build the shared model client once (logs cold-start timing)
    let _runtime = init_runtime().await;

    lambda_runtime::run(service_fn(handler)).await
}

/// Lambda handler invoked per request.
pub async fn handler(event: LambdaEvent<Value>) -> Result<OutboundResponse, Error> {
    let (payload, context) = event.into_parts();

    let runtime = match get_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(request_id = %context.request_id, error = %e, "runtime unavailable");
            return Ok(fault_response(&Fault::Unclassified(e.into())));
        }
    };

    Ok(handle_event(&payload, &context.request_id, process_env(), runtime.invoker()).await)
}

/// Run the whole pipeline for one event and build its response.
///
/// `env` stands in for the process environment. Never fails: classified
/// faults, unclassified errors and panics all become a response.
pub async fn handle_event<I, K, V>(
    payload: &Value,
    request_id: &str,
    env: I,
    invoker: &dyn ModelInvoker,
) -> OutboundResponse
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let correlation_id = payload
        .pointer("/requestContext/requestId")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let span = info_span!(
        "invocation",
        request_id = %request_id,
        correlation_id = %correlation_id,
        service = field::Empty,
    );

    let outcome = AssertUnwindSafe(generate(payload, env, invoker).instrument(span.clone()))
        .catch_unwind()
        .await;

    let result = outcome.unwrap_or_else(|panic| {
        Err(Fault::Unclassified(anyhow::anyhow!(
            "handler panicked: {}",
            panic_message(panic.as_ref())
        )))
    });

    span.in_scope(|| match result {
        Ok(text) => {
            info!(response_chars = text.chars().count(), "text generated");
            OutboundResponse::new(StatusCode::OK, text)
        }
        Err(fault) => fault_response(&fault),
    })
}

/// Resolve configuration, parse the request and invoke the model.
async fn generate<I, K, V>(
    payload: &Value,
    env: I,
    invoker: &dyn ModelInvoker,
) -> textgen_lib::Result<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let config = EnvConfig::from_vars(env)?;
    if let Some(service) = config.service_name.as_deref() {
        Span::current().record("service", service);
    }

    let request = InboundRequest::from_event(payload)?;

    info!(
        model_id = %config.model_id,
        prompt_chars = request.prompt.chars().count(),
        "invoking model"
    );

    invoke_model(invoker, &config.model_id, &request.to_body()).await
}

/// Log a fault at the level its kind deserves and build the response.
fn fault_response(fault: &Fault) -> OutboundResponse {
    match fault {
        Fault::Client { input, .. } => {
            warn!(input = %input, error = %fault, "client error");
        }
        Fault::Server { input, .. } => {
            error!(input = %input, error = %fault, "server error");
        }
        Fault::Unclassified(err) => {
            error!(error = ?err, "unhandled error");
        }
    }

    OutboundResponse::from_status_code(fault.status_code(), fault.public_message())
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}
