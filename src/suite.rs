//! The fixed sequence of probes run by default.

use std::io::Write;

use log::{info, warn};

use crate::probe::{Payload, ProbeResponse, Prober, RequestDescriptor};
use crate::report;

/// Test user identifier sent to the OTP endpoints.
pub const DEFAULT_USER_ID: &str = "test_agent_01";

/// Endpoint whose response may carry a Telegram deep link.
const LINK_TOKEN_PATH: &str = "/otp/link-token";

fn user_payload(user_id: &str) -> Payload {
    Payload::from([("userId".to_string(), user_id.to_string())])
}

/// Build the default probes for `user_id`, in execution order.
///
/// The admin dashboard is probed without an access code, so the server is
/// expected to refuse it; the status is printed either way.
#[must_use]
pub fn default_suite(user_id: &str) -> Vec<RequestDescriptor> {
    vec![
        RequestDescriptor::get("Admin Dashboard", "/admin/dashboard"),
        RequestDescriptor::post("Link Token", LINK_TOKEN_PATH, user_payload(user_id)),
        RequestDescriptor::post("Request OTP", "/otp/request-otp", user_payload(user_id)),
    ]
}

/// Deep link issued by the link-token endpoint, whatever the probe is called.
fn deep_link<'a>(req: &RequestDescriptor, outcome: Option<&'a ProbeResponse>) -> Option<&'a str> {
    if req.path != LINK_TOKEN_PATH {
        return None;
    }
    outcome.and_then(|r| r.json_str("deepLink"))
}

/// Print the target banner and run `requests` one after another.
///
/// Each probe completes before the next starts. The outcomes are returned
/// in the same order as `requests`.
pub async fn run_suite<W: Write>(
    prober: &Prober,
    out: &mut W,
    requests: &[RequestDescriptor],
) -> Vec<Option<ProbeResponse>> {
    if let Err(e) = report::write_target(out, prober.base_url()) {
        warn!("failed to write target banner: {e}");
    }
    let mut outcomes = Vec::with_capacity(requests.len());
    for req in requests {
        let outcome = prober.probe(out, req).await;
        if let Some(link) = deep_link(req, outcome.as_ref()) {
            info!("link token issued: {link}");
        }
        outcomes.push(outcome);
    }
    outcomes
}
