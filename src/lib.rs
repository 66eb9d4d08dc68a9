//! Probe a handful of HTTP endpoints and print the responses.
//!
//! The binary is a thin wrapper around [`commands::run`]; the library is
//! exposed so integration tests can drive the prober against a local server.

pub mod cli_args;
pub mod commands;
pub mod config;
pub mod environment;
pub mod error;
pub mod probe;
pub mod report;
pub mod suite;

pub use cli_args::{CallArgs, Cli, Commands, GlobalArgs};
pub use error::AppError;
pub use probe::{
    BaseUrl, Method, Payload, ProbeError, ProbeResponse, Prober, ProberOptions, RequestDescriptor,
    ResponseBody,
};
pub use suite::{DEFAULT_USER_ID, default_suite, run_suite};
