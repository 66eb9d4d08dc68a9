//! HTTP prober: send one request and report what came back.
//!
//! [`Prober::send`] performs the request and returns a typed result.
//! [`Prober::probe`] wraps it, printing a report block and folding every
//! failure into `None` so a run of probes never stops early.

mod body;
mod error;
mod transcript;
mod types;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use log::{debug, warn};

use crate::report;

pub use self::body::{ProbeResponse, ResponseBody, TEXT_PREVIEW_CHARS, truncate_chars};
pub use self::error::{ProbeError, describe};
pub use self::types::{BaseUrl, DEFAULT_BASE_URL, Method, Payload, RequestDescriptor};


/// Value sent in the `User-Agent` header.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Optional knobs for building a [`Prober`].
///
/// The default leaves both timeouts unset, so a request may block until the
/// server answers or the connection drops.
#[derive(Debug, Clone, Default)]
pub struct ProberOptions {
    /// Total time allowed for each request.
    pub request_timeout: Option<Duration>,
    /// Time allowed to establish a connection.
    pub connect_timeout: Option<Duration>,
    /// Append a JSON line per probe to this file.
    pub transcript: Option<PathBuf>,
}

/// Issues probes against a single base URL.
pub struct Prober {
    client: reqwest::Client,
    base: BaseUrl,
    transcript: Option<Mutex<BufWriter<File>>>,
}

impl Prober {
    /// Create a prober with no timeouts and no transcript.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Client`] if the HTTP client cannot be built.
    pub fn new(base: impl Into<BaseUrl>) -> Result<Self, ProbeError> {
        Self::with_options(base, ProberOptions::default())
    }

    /// Create a prober with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Client`] if the HTTP client cannot be built, or
    /// [`ProbeError::Transcript`] if the transcript file cannot be created.
    pub fn with_options(
        base: impl Into<BaseUrl>,
        options: ProberOptions,
    ) -> Result<Self, ProbeError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build().map_err(ProbeError::Client)?;
        let transcript = match options.transcript {
            Some(path) => match File::create(&path) {
                Ok(file) => Some(Mutex::new(BufWriter::new(file))),
                Err(source) => return Err(ProbeError::Transcript { path, source }),
            },
            None => None,
        };
        Ok(Self {
            client,
            base: base.into(),
            transcript,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    /// Perform the request described by `req`.
    ///
    /// Any status code, including 4xx and 5xx, counts as a response.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::InvalidUrl`] when the joined URL does not parse,
    /// [`ProbeError::Request`] when the request cannot be completed, and
    /// [`ProbeError::Body`] when the body cannot be read.
    pub async fn send(&self, req: &RequestDescriptor) -> Result<ProbeResponse, ProbeError> {
        let raw = self.base.join(&req.path);
        let url = url::Url::parse(&raw).map_err(|source| ProbeError::InvalidUrl {
            url: raw.clone().into_boxed_str(),
            source,
        })?;

        if req.method == Method::Get && req.payload.is_some() {
            debug!("ignoring payload for GET {raw}");
        }
        debug!("sending {} {raw}", req.method);

        let mut request = self.client.request(req.method.into(), url);
        if let Some(payload) = req.body() {
            request = request.json(payload);
        }
        let response = request.send().await.map_err(|source| ProbeError::Request {
            method: req.method,
            url: raw.clone().into_boxed_str(),
            source,
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|source| ProbeError::Body {
            url: raw.clone().into_boxed_str(),
            status,
            source,
        })?;
        debug!("{} {raw} answered {status} with {} bytes", req.method, text.len());

        Ok(ProbeResponse {
            status,
            body: ResponseBody::from_text(text),
        })
    }

    /// Send `req`, writing a report block to `out`.
    ///
    /// Returns `None` when no response was obtained. Never fails: request
    /// errors become an `Error:` line and output errors are logged.
    pub async fn probe<W: Write>(
        &self,
        out: &mut W,
        req: &RequestDescriptor,
    ) -> Option<ProbeResponse> {
        if let Err(e) = report::write_attempt(out, req) {
            warn!("failed to write probe header for {}: {e}", req.name);
        }
        let result = self.send(req).await;
        self.record(req, &result);
        match result {
            Ok(resp) => {
                if let Err(e) = report::write_response(out, &resp) {
                    warn!("failed to write response for {}: {e}", req.name);
                }
                Some(resp)
            }
            Err(err) => {
                if let Err(e) = report::write_failure(out, &describe(&err)) {
                    warn!("failed to write error for {}: {e}", req.name);
                }
                None
            }
        }
    }
}
