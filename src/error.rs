//! Errors that stop the tool before any probe runs.

use std::sync::Arc;

use thiserror::Error;

use crate::probe::ProbeError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),
    #[error("configuration error: {0}")]
    ConfigFile(#[from] Arc<ortho_config::OrthoError>),
    #[error("invalid --data `{0}`: expected KEY=VALUE")]
    InvalidData(Box<str>),
    #[error("missing path for `call`")]
    MissingPath,
    #[error(transparent)]
    Probe(#[from] ProbeError),
}
