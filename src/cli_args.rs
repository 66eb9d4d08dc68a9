//! Command-line argument structures.
//!
//! Isolates clap derivations so `main.rs` and `commands.rs` stay focused on
//! runtime logic.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::probe::Method;

/// Probe HTTP endpoints and print the responses.
#[derive(Parser, Debug)]
#[command(name = "endpoint-probe", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    /// Defaults to `suite` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the default admin and OTP probes in order
    Suite,
    /// Probe a single endpoint
    Call(CallArgs),
}

/// Global options that apply to every sub-command (e.g. `--base-url`).
#[derive(Parser, Deserialize, Serialize, Default, Debug, OrthoConfig, Clone, PartialEq, Eq)]
#[ortho_config(prefix = "PROBE")]
pub struct GlobalArgs {
    /// Origin that probe paths are appended to
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,
    /// User identifier sent to the OTP endpoints
    #[arg(long, value_name = "ID", global = true)]
    pub user_id: Option<String>,
    /// Write a JSON-lines transcript of every probe to this file
    #[arg(long, global = true)]
    pub transcript: Option<PathBuf>,
    /// HTTP request timeout in seconds (unlimited when unset)
    #[arg(long, value_name = "SECS", global = true)]
    pub http_timeout: Option<u64>,
    /// HTTP connection timeout in seconds (unlimited when unset)
    #[arg(long, value_name = "SECS", global = true)]
    pub connect_timeout: Option<u64>,
}

impl GlobalArgs {
    /// Merge another instance into `self`, overwriting only fields that are
    /// set in `other`.
    ///
    /// CLI flags have higher priority than configuration sources.
    pub fn merge(&mut self, other: Self) {
        self.base_url = other.base_url.or_else(|| self.base_url.take());
        self.user_id = other.user_id.or_else(|| self.user_id.take());
        self.transcript = other.transcript.or_else(|| self.transcript.take());
        self.http_timeout = other.http_timeout.or(self.http_timeout);
        self.connect_timeout = other.connect_timeout.or(self.connect_timeout);
    }
}

/// Parameters accepted by the `call` sub-command.
#[derive(Parser, Deserialize, Serialize, Debug, OrthoConfig, Clone, Default)]
#[command(name = "call")]
#[ortho_config(prefix = "PROBE")]
pub struct CallArgs {
    /// Path appended to the base URL, e.g. `/otp/verify`
    #[arg(required = true)]
    // Clap marks the argument as required so parsing yields `Some(value)`. The
    // `Option` lets config merging run before the path is known.
    pub path: Option<String>,
    /// Label printed before the request
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,
    /// HTTP method to use
    #[arg(short = 'X', long, value_enum, ignore_case = true)]
    pub method: Option<Method>,
    /// JSON body field for POST requests, repeatable
    #[arg(short = 'd', long = "data", value_name = "KEY=VALUE")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<String>,
}
