//! Configuration loading helpers.
//!
//! Every command reads the same configuration file. `PROBE_CONFIG_PATH` names
//! it explicitly; otherwise [`ConfigDiscovery`] takes the first file found
//! among `$XDG_CONFIG_HOME/probe/config.toml`, the system XDG directories,
//! `~/.config/probe/config.toml`, `~/.probe.toml` and `./.probe.toml`.
//!
//! Global options are read from the top level of that file, then `PROBE_*`
//! variables, then CLI flags. `call` options are read from its `[cmds.call]`
//! table, then `PROBE_CMDS_CALL_*` variables, then CLI flags.

use std::env;
use std::path::Path;
use std::sync::Arc;

use figment::Figment;
use figment::providers::Env;
use ortho_config::{ConfigDiscovery, OrthoConfig, OrthoError, load_config_file, sanitized_provider};

use crate::cli_args::{CallArgs, GlobalArgs};
use crate::environment;
use crate::error::AppError;

/// Variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "PROBE_CONFIG_PATH";

/// Dotfile searched for in the home and working directories.
pub const DEFAULT_CONFIG_FILE: &str = ".probe.toml";

/// Directory name used under the XDG configuration directories.
const APP_NAME: &str = "probe";

/// Table holding the `call` sub-command's defaults.
const CALL_TABLE: &str = "cmds.call";

/// Locate and parse the configuration file.
///
/// An explicit `PROBE_CONFIG_PATH` disables discovery, so a missing file at
/// that path means no file at all. Must run with the environment lock held.
fn config_file() -> Result<Figment, Arc<OrthoError>> {
    let found = match env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => load_config_file(Path::new(&path))?,
        _ => ConfigDiscovery::builder(APP_NAME)
            .dotfile_name(DEFAULT_CONFIG_FILE)
            .build()
            .load_first()?,
    };
    Ok(found.unwrap_or_else(Figment::new))
}

/// Load global options from file and environment, then apply `cli` on top.
///
/// A missing configuration file is not an error.
///
/// # Errors
///
/// Returns [`AppError::ConfigFile`] when the file cannot be parsed and
/// [`AppError::Config`] when a value has the wrong type (for example a
/// non-numeric `PROBE_HTTP_TIMEOUT`).
pub fn load_global(cli: GlobalArgs) -> Result<GlobalArgs, AppError> {
    // Discovery and `Env` both scan the process environment; hold the lock so
    // the snapshot is consistent with concurrent test mutations.
    let mut merged = environment::with_lock(|| -> Result<GlobalArgs, AppError> {
        Ok(config_file()?
            .merge(Env::prefixed(GlobalArgs::prefix()).ignore(&["config_path"]))
            .extract::<GlobalArgs>()?)
    })?;
    merged.merge(cli);
    Ok(merged)
}

/// Merge `call` arguments over the `[cmds.call]` table and
/// `PROBE_CMDS_CALL_*` variables.
///
/// Fields left unset everywhere stay `None`; a missing `path` is reported by
/// the caller.
///
/// # Errors
///
/// Returns [`AppError::ConfigFile`] when the file cannot be parsed and
/// [`AppError::Config`] when a merged value has the wrong type.
pub fn load_call_args(cli: CallArgs) -> Result<CallArgs, AppError> {
    let cli_layer = sanitized_provider(&cli)?;
    let env_prefix = format!("{}CMDS_CALL_", CallArgs::prefix());
    environment::with_lock(|| -> Result<CallArgs, AppError> {
        Ok(config_file()?
            .focus(CALL_TABLE)
            .merge(Env::prefixed(&env_prefix).split("__"))
            .merge(cli_layer)
            .extract::<CallArgs>()?)
    })
}
