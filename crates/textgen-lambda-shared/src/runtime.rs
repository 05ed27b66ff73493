//! Process-wide Lambda runtime state.
//!
//! The model client is created once at cold start and shared read-only by
//! every invocation handled by the process. Per-request state never lives
//! here.
//!
//! # Cold-Start Performance
//!
//! Initialization logs `init_ms` (time to resolve AWS configuration and build
//! the client) together with the configured region.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::OnceCell;
use tracing::{error, info};

use textgen_lib::ModelInvoker;

use crate::bedrock::BedrockInvoker;

/// Lazily-initialized Lambda runtime state.
static RUNTIME: OnceCell<LambdaRuntime> = OnceCell::const_new();

/// Error during runtime access or initialization.
#[derive(Debug, Clone)]
pub struct InitError {
    pub message: String,
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lambda initialization failed: {}", self.message)
    }
}

impl std::error::Error for InitError {}

/// Initialized Lambda runtime holding the shared model invoker.
pub struct LambdaRuntime {
    invoker: Arc<dyn ModelInvoker>,
}

impl std::fmt::Debug for LambdaRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LambdaRuntime").finish_non_exhaustive()
    }
}

impl LambdaRuntime {
    /// Wrap an already-constructed invoker.
    pub fn new(invoker: Arc<dyn ModelInvoker>) -> Self {
        Self { invoker }
    }

    /// Access the shared invoker.
    pub fn invoker(&self) -> &dyn ModelInvoker {
        self.invoker.as_ref()
    }
}

/// Initialize the runtime with a Bedrock client built from the environment.
///
/// Subsequent calls return the instance created by the first one.
pub async fn init_runtime() -> &'static LambdaRuntime {
    RUNTIME
        .get_or_init(|| async {
            let start = Instant::now();
            info!("initializing Lambda runtime");

            let invoker = BedrockInvoker::from_env().await;
            let region = invoker.region();

            info!(
                init_ms = start.elapsed().as_millis(),
                region = region.as_deref().unwrap_or("<unset>"),
                "Lambda runtime initialization complete"
            );

            LambdaRuntime::new(Arc::new(invoker))
        })
        .await
}

/// Install a caller-provided runtime, e.g. one backed by a stub invoker.
///
/// Fails if a runtime was already initialized.
pub fn install_runtime(runtime: LambdaRuntime) -> Result<&'static LambdaRuntime, InitError> {
    RUNTIME.set(runtime).map_err(|_| InitError {
        message: "runtime already initialized".to_string(),
    })?;
    get_runtime()
}

/// Get the initialized runtime.
pub fn get_runtime() -> Result<&'static LambdaRuntime, InitError> {
    RUNTIME.get().ok_or_else(|| {
        error!("Lambda runtime accessed before initialization");
        InitError {
            message: "runtime not initialized; call init_runtime() first".to_string(),
        }
    })
}
