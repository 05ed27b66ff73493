//! textgen library entry points.
//!
//! This crate holds the decision logic of the text generation endpoint:
//! resolving configuration from the environment, parsing the inbound prompt,
//! invoking the model through an injected [`ModelInvoker`], and classifying
//! every failure into a [`Fault`]. Higher-level consumers (the Lambda crates)
//! should only depend on the functions exported here instead of reimplementing
//! behavior.
//!

#![deny(warnings)]

pub mod config;
pub mod encoding;
pub mod error;
pub mod invoker;
pub mod request;

pub use config::{process_env, EnvConfig, ENV_MODEL_ID};
pub use encoding::{ascii_json_string, single_field_object};
pub use error::{Fault, FaultKind, Result};
pub use invoker::{decode_completions, invoke_model, InvocationError, ModelInvoker};
pub use request::InboundRequest;
