//! Tracing initialization for Lambda functions.
//!
//! Configures JSON-formatted tracing output suitable for CloudWatch Logs.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default level used when neither `RUST_LOG` nor `LOG_LEVEL` is set.
const DEFAULT_LEVEL: &str = "info";

/// Initialize tracing with JSON formatting for CloudWatch Logs.
///
/// This should be called once at the start of the Lambda `main` function,
/// before calling `lambda_runtime::run()`.
///
/// The filter comes from `RUST_LOG` when set, otherwise from the deployment's
/// `LOG_LEVEL` variable (e.g. `INFO`), otherwise `info`.
///
/// # Example
///
/// ```no_run
/// use textgen_lambda_shared::init_tracing;
///
/// #[tokio::main]
/// async fn main() -> Result<(), lambda_runtime::Error> {
///     init_tracing();
///     // ... rest of Lambda setup
///     Ok(())
/// }
/// ```
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(default_directive(std::env::var("LOG_LEVEL").ok().as_deref()))
    });

    // Configure JSON formatting for CloudWatch
    let fmt_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_level(true)
        .with_current_span(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Map a `LOG_LEVEL` value onto an `EnvFilter` directive.
fn default_directive(log_level: Option<&str>) -> String {
    match log_level.map(str::trim) {
        Some(level) if !level.is_empty() => match level.to_ascii_lowercase().as_str() {
            "critical" | "fatal" => "error".to_string(),
            "warning" => "warn".to_string(),
            other => other.to_string(),
        },
        _ => DEFAULT_LEVEL.to_string(),
    }
}
