//! Failures a single probe can run into.

use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

use super::types::Method;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("invalid URL `{url}`")]
    InvalidUrl {
        url: Box<str>,
        #[source]
        source: url::ParseError,
    },
    #[error("{method} {url} failed")]
    Request {
        method: Method,
        url: Box<str>,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read response body from {url} (status {status})")]
    Body {
        url: Box<str>,
        status: u16,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to create transcript {}", path.display())]
    Transcript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Render an error and every source beneath it, separated by `": "`.
///
/// `reqwest` keeps the interesting part (connection refused, DNS failure)
/// in the source chain, so printing only the top level hides it.
#[must_use]
pub fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // hyper and reqwest sometimes repeat the inner message verbatim.
        if !out.ends_with(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}
