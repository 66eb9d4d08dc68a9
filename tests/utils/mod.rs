//! Test utilities for running a local stub HTTP server.
//!
//! The stub records every request it receives and answers through a
//! replaceable responder, so tests can simulate the backend's admin and OTP
//! endpoints without network access.
#![allow(dead_code, reason = "helpers are shared across test binaries")]

use assert_cmd::prelude::*;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, StatusCode, body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use std::io::ErrorKind;
use std::{
    net::SocketAddr,
    process::Command,
    sync::{Arc, Mutex},
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// A request as seen by the stub server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path plus query string.
    pub path: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Recorded {
    /// Parse the request body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

/// Shared responder invoked for each incoming request.
pub type Responder = Arc<Mutex<Box<dyn FnMut(&Recorded) -> Response<Full<Bytes>> + Send>>>;

/// A running stub server.
pub struct StubServer {
    pub addr: SocketAddr,
    responder: Responder,
    requests: Arc<Mutex<Vec<Recorded>>>,
    join: JoinHandle<()>,
    stop: oneshot::Sender<()>,
}

impl StubServer {
    /// Origin suitable for `--base-url`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Replace the responder.
    pub fn respond_with<F>(&self, f: F)
    where
        F: FnMut(&Recorded) -> Response<Full<Bytes>> + Send + 'static,
    {
        *self.responder.lock().expect("lock responder") = Box::new(f);
    }

    /// Requests received so far, in arrival order.
    pub fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().expect("lock requests").clone()
    }

    /// Signal the server to stop and await shutdown.
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        let _ = self.join.await;
    }
}

/// Start a stub server on an ephemeral local port.
///
/// Until a responder is installed every request gets a plain-text 404.
///
/// # Errors
///
/// Returns an error if the server fails to bind to a local port.
#[expect(
    clippy::integer_division_remainder_used,
    reason = "tokio::select! uses % internally"
)]
pub async fn start_stub() -> Result<StubServer, std::io::Error> {
    let responder: Responder = Arc::new(Mutex::new(Box::new(|_req| {
        text_response(StatusCode::NOT_FOUND, "No handler")
    })));
    let requests = Arc::new(Mutex::new(Vec::new()));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, mut rx) = oneshot::channel();

    let responder_clone = Arc::clone(&responder);
    let requests_clone = Arc::clone(&requests);
    let join = tokio::spawn(async move {
        loop {
            tokio::select! {
                res = listener.accept() => match res {
                    Ok((stream, _)) => {
                        let io = TokioIo::new(stream);
                        let responder = Arc::clone(&responder_clone);
                        let requests = Arc::clone(&requests_clone);
                        let service = service_fn(move |req: Request<Incoming>| {
                            let responder = Arc::clone(&responder);
                            let requests = Arc::clone(&requests);
                            async move {
                                let (parts, body) = req.into_parts();
                                let body = body.collect().await.map(|b| b.to_bytes()).unwrap_or_default();
                                let recorded = Recorded {
                                    method: parts.method.to_string(),
                                    path: parts
                                        .uri
                                        .path_and_query()
                                        .map_or_else(|| parts.uri.path().to_string(), ToString::to_string),
                                    content_type: parts
                                        .headers
                                        .get(hyper::header::CONTENT_TYPE)
                                        .and_then(|v| v.to_str().ok())
                                        .map(str::to_string),
                                    body,
                                };
                                let resp = {
                                    let mut f = responder.lock().expect("lock responder in service");
                                    (f)(&recorded)
                                };
                                requests.lock().expect("lock requests in service").push(recorded);
                                Ok::<_, std::convert::Infallible>(resp)
                            }
                        });
                        tokio::spawn(async move {
                            let _ = http1::Builder::new().serve_connection(io, service).await;
                        });
                    }
                    Err(e) => {
                        eprintln!("accept error: {e}");
                        match e.kind() {
                            ErrorKind::ConnectionAborted
                            | ErrorKind::ConnectionReset
                            | ErrorKind::Interrupted
                            | ErrorKind::WouldBlock => {}
                            _ => break,
                        }
                    }
                },
                _ = &mut rx => break,
            }
        }
    });

    Ok(StubServer {
        addr,
        responder,
        requests,
        join,
        stop: tx,
    })
}

/// Build a JSON response with `status`.
///
/// # Panics
///
/// Panics if the response cannot be constructed.
pub fn json_response(status: StatusCode, body: &serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::from(body.to_string()))
        .expect("build JSON response")
}

/// Build a plain-text or HTML response with `status`.
///
/// # Panics
///
/// Panics if the response cannot be constructed.
pub fn text_response(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Full::from(body.to_string()))
        .expect("build text response")
}

/// Answer like the OTP backend would for a user with no linked Telegram
/// account and no admin access code.
pub fn backend_responder(req: &Recorded) -> Response<Full<Bytes>> {
    match (req.method.as_str(), req.path.as_str()) {
        ("GET", "/admin/dashboard") => text_response(
            StatusCode::FORBIDDEN,
            "<h1>Forbidden</h1><p>Invalid or missing access code.</p>",
        ),
        ("POST", "/otp/link-token") => json_response(
            StatusCode::OK,
            &serde_json::json!({ "deepLink": "https://t.me/probe_bot?start=0123abcd" }),
        ),
        ("POST", "/otp/request-otp") => json_response(
            StatusCode::BAD_REQUEST,
            &serde_json::json!({ "error": "Telegram account not linked" }),
        ),
        _ => text_response(StatusCode::NOT_FOUND, "Not Found"),
    }
}

/// Origin on which nothing is listening.
///
/// Binds an ephemeral port and releases it immediately so connections are
/// refused.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

/// Create an `endpoint-probe` command isolated from the caller's
/// configuration.
///
/// The command runs inside `dir` with `HOME` and `XDG_CONFIG_HOME` pointing
/// there too, so a `.probe.toml` written in `dir` is the only configuration
/// file it sees.
///
/// # Panics
///
/// Panics if the binary cannot be located.
pub fn probe_cmd(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("endpoint-probe").expect("binary");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("XDG_CONFIG_DIRS")
        .env_remove("PROBE_CONFIG_PATH")
        .env_remove("PROBE_BASE_URL")
        .env_remove("PROBE_USER_ID")
        .env_remove("PROBE_TRANSCRIPT")
        .env_remove("PROBE_HTTP_TIMEOUT")
        .env_remove("PROBE_CONNECT_TIMEOUT")
        .env_remove("PROBE_CMDS_CALL_PATH")
        .env_remove("PROBE_CMDS_CALL_NAME")
        .env_remove("PROBE_CMDS_CALL_METHOD")
        .env_remove("RUST_LOG");
    cmd
}
