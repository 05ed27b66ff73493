//! Environment-derived configuration.
//!
//! Configuration is resolved from a mapping of variable names to values. The
//! Lambda passes the process environment; tests pass explicit pairs so they
//! never mutate global state.

use std::collections::BTreeMap;

use crate::error::{Fault, Result};

/// Name of the variable holding the model identifier.
pub const ENV_MODEL_ID: &str = "MODEL_ID";

/// Service name used for log enrichment, as set by the deployment.
pub const ENV_SERVICE_NAME: &str = "POWERTOOLS_SERVICE_NAME";

/// Fallback service name variable.
pub const ENV_SERVICE_NAME_FALLBACK: &str = "SERVICE_NAME";

const MISSING_VARS_MESSAGE: &str = "Required environment variables are not set.";

/// Immutable configuration for a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// Bedrock model identifier, e.g. `ai21.j2-mid-v1`.
    pub model_id: String,
    /// Optional service name attached to log entries.
    pub service_name: Option<String>,
}

impl EnvConfig {
    /// Resolve configuration from arbitrary `(name, value)` pairs.
    ///
    /// A missing or empty `MODEL_ID` is a server fault whose offending input
    /// is a JSON snapshot of every variable supplied, credentials masked.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let model_id = match vars.get(ENV_MODEL_ID) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => return Err(Fault::server(snapshot(&vars), MISSING_VARS_MESSAGE)),
        };

        let service_name = vars
            .get(ENV_SERVICE_NAME)
            .or_else(|| vars.get(ENV_SERVICE_NAME_FALLBACK))
            .filter(|name| !name.is_empty())
            .cloned();

        Ok(Self {
            model_id,
            service_name,
        })
    }
}

/// Snapshot of the process environment as UTF-8 pairs.
///
/// Non-UTF-8 names or values are converted lossily instead of panicking.
pub fn process_env() -> Vec<(String, String)> {
    std::env::vars_os()
        .map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        })
        .collect()
}

/// Placeholder written over credential values in snapshots.
const REDACTED: &str = "<redacted>";

/// Serialize every variable, masking the values of credential-like names.
fn snapshot(vars: &BTreeMap<String, String>) -> String {
    let masked: BTreeMap<&str, &str> = vars
        .iter()
        .map(|(k, v)| {
            let value = if is_sensitive(k) { REDACTED } else { v.as_str() };
            (k.as_str(), value)
        })
        .collect();

    // A map of strings always serializes.
    serde_json::to_string(&masked).unwrap_or_default()
}

fn is_sensitive(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    upper == "AWS_ACCESS_KEY_ID"
        || ["SECRET", "TOKEN", "PASSWORD", "CREDENTIAL"]
            .iter()
            .any(|marker| upper.contains(marker))
}
