//! Plain-text report lines printed around each probe.
//!
//! Every writer takes a generic [`Write`] so the exact layout can be unit
//! tested without capturing stdout.

use std::io::{self, Write};

use crate::probe::{BaseUrl, ProbeResponse, RequestDescriptor, ResponseBody};

/// Rule printed under the target banner.
pub const HEADER_RULE: &str = "==============================";

/// Separator closing each probe block.
pub const PROBE_SEPARATOR: &str = "--------------------";

/// Write the banner naming the probed origin.
///
/// # Errors
///
/// Returns any error raised by `out`.
pub fn write_target<W: Write>(out: &mut W, base: &BaseUrl) -> io::Result<()> {
    writeln!(out, "Target Server: {base}")?;
    writeln!(out, "{HEADER_RULE}")
}

/// Announce a probe before the request is sent.
///
/// The writer is flushed so the line is visible while the request blocks.
///
/// # Errors
///
/// Returns any error raised by `out`.
pub fn write_attempt<W: Write>(out: &mut W, req: &RequestDescriptor) -> io::Result<()> {
    writeln!(out, "Testing {} ({} {})...", req.name, req.method, req.path)?;
    out.flush()
}

/// Write the status and rendered body of a response, then the separator.
///
/// # Errors
///
/// Returns any error raised by `out`.
pub fn write_response<W: Write>(out: &mut W, resp: &ProbeResponse) -> io::Result<()> {
    writeln!(out, "  Status Code: {}", resp.status)?;
    let label = match resp.body {
        ResponseBody::Json(_) => "Response",
        ResponseBody::Text(_) => "Response (Text)",
    };
    writeln!(out, "  {label}: {}", resp.body.render())?;
    writeln!(out, "{PROBE_SEPARATOR}")
}

/// Write a failure message, then the separator.
///
/// # Errors
///
/// Returns any error raised by `out`.
pub fn write_failure<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "  Error: {message}")?;
    writeln!(out, "{PROBE_SEPARATOR}")
}
