//! Transcript logging for probes.

use log::warn;
use serde_json::json;

use super::{ProbeError, ProbeResponse, Prober, RequestDescriptor, describe};

/// Maximum number of characters of a response body kept per transcript line.
const BODY_SNIPPET_LEN: usize = 500;

impl Prober {
    /// Append the request and its outcome to the transcript if enabled.
    pub(super) fn record(
        &self,
        req: &RequestDescriptor,
        result: &Result<ProbeResponse, ProbeError>,
    ) {
        let Some(t) = &self.transcript else {
            return;
        };
        let mut entry = json!({
            "name": req.name,
            "method": req.method,
            "url": self.base.join(&req.path),
            "request": req.body(),
        });
        if let Some(obj) = entry.as_object_mut() {
            match result {
                Ok(resp) => {
                    obj.insert("status".into(), json!(resp.status));
                    obj.insert(
                        "response".into(),
                        json!(resp.body.excerpt(BODY_SNIPPET_LEN)),
                    );
                }
                Err(err) => {
                    obj.insert("error".into(), json!(describe(err)));
                }
            }
        }

        use std::io::Write as _;
        match t.lock() {
            Ok(mut f) => {
                if let Err(e) = writeln!(f, "{entry}") {
                    warn!("failed to write transcript for {}: {e}", req.name);
                    return;
                }
                if let Err(e) = f.flush() {
                    warn!("failed to flush transcript for {}: {e}", req.name);
                }
            }
            Err(e) => warn!("failed to lock transcript for {}: {e}", req.name),
        }
    }
}
