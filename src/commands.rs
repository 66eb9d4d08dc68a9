//! Command execution helpers for `endpoint-probe`.
//!
//! This module owns the runtime flow for each subcommand: resolving
//! configuration, building the prober, and writing the report to stdout.

use std::io::Write;
use std::time::Duration;

use log::warn;

use crate::cli_args::{CallArgs, Cli, Commands, GlobalArgs};
use crate::config::{load_call_args, load_global};
use crate::error::AppError;
use crate::probe::{BaseUrl, Method, Payload, ProbeResponse, Prober, ProberOptions, RequestDescriptor};
use crate::suite::{DEFAULT_USER_ID, default_suite, run_suite};

/// Label used by `call` when `--name` is not given.
pub const DEFAULT_CALL_NAME: &str = "Custom Request";

fn prober_options(global: &GlobalArgs) -> ProberOptions {
    ProberOptions {
        request_timeout: global.http_timeout.map(Duration::from_secs),
        connect_timeout: global.connect_timeout.map(Duration::from_secs),
        transcript: global.transcript.clone(),
    }
}

/// Create a [`Prober`], falling back to no transcript on failure.
fn build_prober(global: &GlobalArgs) -> Result<Prober, AppError> {
    let base = global
        .base_url
        .as_deref()
        .map_or_else(BaseUrl::default, BaseUrl::from);
    let options = prober_options(global);
    let has_transcript = options.transcript.is_some();
    match Prober::with_options(base.clone(), options.clone()) {
        Ok(p) => Ok(p),
        Err(e) if has_transcript => {
            warn!("failed to create transcript: {e}");
            let options = ProberOptions {
                transcript: None,
                ..options
            };
            Prober::with_options(base, options).map_err(Into::into)
        }
        Err(e) => Err(e.into()),
    }
}

/// Split `KEY=VALUE` pairs into a payload.
///
/// # Errors
///
/// Returns [`AppError::InvalidData`] for a pair with no `=` or an empty key.
pub fn parse_payload(pairs: &[String]) -> Result<Option<Payload>, AppError> {
    if pairs.is_empty() {
        return Ok(None);
    }
    let mut payload = Payload::new();
    for pair in pairs {
        match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                payload.insert(key.to_string(), value.to_string());
            }
            _ => return Err(AppError::InvalidData(pair.as_str().into())),
        }
    }
    Ok(Some(payload))
}

/// Turn merged `call` arguments into a request.
///
/// # Errors
///
/// Returns [`AppError::MissingPath`] when no source supplied a path, or
/// [`AppError::InvalidData`] for a malformed `--data` pair.
pub fn call_descriptor(args: CallArgs) -> Result<RequestDescriptor, AppError> {
    let path = args.path.ok_or(AppError::MissingPath)?;
    let payload = parse_payload(&args.data)?;
    Ok(RequestDescriptor {
        name: args
            .name
            .unwrap_or_else(|| DEFAULT_CALL_NAME.to_string()),
        method: args.method.unwrap_or(Method::Get),
        path,
        payload,
    })
}

/// Run the default suite against the configured origin.
///
/// # Errors
///
/// Returns an [`AppError`] only when the prober cannot be built.
pub async fn run_suite_command<W: Write>(
    global: &GlobalArgs,
    out: &mut W,
) -> Result<Vec<Option<ProbeResponse>>, AppError> {
    let prober = build_prober(global)?;
    let user_id = global.user_id.as_deref().unwrap_or(DEFAULT_USER_ID);
    Ok(run_suite(&prober, out, &default_suite(user_id)).await)
}

/// Run a single ad-hoc probe.
///
/// # Errors
///
/// Returns an [`AppError`] when the request is malformed or the prober
/// cannot be built. Request failures are reported, not returned.
pub async fn run_call_command<W: Write>(
    global: &GlobalArgs,
    args: CallArgs,
    out: &mut W,
) -> Result<Option<ProbeResponse>, AppError> {
    let req = call_descriptor(args)?;
    let prober = build_prober(global)?;
    Ok(run_suite(&prober, out, std::slice::from_ref(&req))
        .await
        .pop()
        .flatten())
}

/// Resolve configuration for `cli` and run the selected command.
///
/// # Errors
///
/// Returns an [`AppError`] for configuration or startup failures. Probe
/// outcomes never produce an error.
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<(), AppError> {
    let global = load_global(cli.global)?;
    match cli.command.unwrap_or(Commands::Suite) {
        Commands::Suite => {
            run_suite_command(&global, out).await?;
        }
        Commands::Call(args) => {
            let args = load_call_args(args)?;
            run_call_command(&global, args, out).await?;
        }
    }
    Ok(())
}
