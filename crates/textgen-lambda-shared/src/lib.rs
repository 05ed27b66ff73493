//! Shared infrastructure for the textgen AWS Lambda function.
//!
//! This crate provides the AWS-facing pieces the handler composes:
//!
//! - [`init_runtime`]: Cold-start construction of the shared Bedrock client
//! - [`BedrockInvoker`]: [`textgen_lib::ModelInvoker`] backed by Amazon Bedrock
//! - [`init_tracing`]: JSON-formatted tracing for CloudWatch Logs
//! - [`OutboundResponse`]: API Gateway proxy response with the fixed CORS headers
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides a stub invoker and event fixtures for
//! Lambda handler testing. Enable the `test-utils` feature to access it from
//! dependent crates.

#![deny(warnings)]

mod bedrock;
mod response;
mod runtime;
mod tracing_init;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use bedrock::BedrockInvoker;
pub use response::{OutboundResponse, ResponseHeaders};
pub use runtime::{get_runtime, init_runtime, install_runtime, InitError, LambdaRuntime};
pub use tracing_init::init_tracing;
