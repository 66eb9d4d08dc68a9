//! Request-side types used by the prober.

use std::collections::BTreeMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Origin probed when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://unknown-lib-backend.onrender.com";

/// HTTP verbs the prober knows how to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Upper-case verb as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
        }
    }
}

/// JSON body sent with a POST request.
pub type Payload = BTreeMap<String, String>;

/// Origin against which every probe path is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append `path` verbatim.
    ///
    /// No separator is inserted and nothing is escaped, so `"/x"` against
    /// `"http://h"` yields `"http://h/x"` while `"x"` yields `"http://hx"`.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}{path}", self.0)
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self(DEFAULT_BASE_URL.to_string())
    }
}

impl From<&str> for BaseUrl {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BaseUrl {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to issue and label one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Human-readable label printed before the request.
    pub name: String,
    pub method: Method,
    /// Appended to the base URL without validation.
    pub path: String,
    /// Serialised as the JSON body for POST; ignored for GET.
    pub payload: Option<Payload>,
}

impl RequestDescriptor {
    /// Describe a bodiless GET request.
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: Method::Get,
            path: path.into(),
            payload: None,
        }
    }

    /// Describe a POST request carrying `payload` as JSON.
    pub fn post(name: impl Into<String>, path: impl Into<String>, payload: Payload) -> Self {
        Self {
            name: name.into(),
            method: Method::Post,
            path: path.into(),
            payload: Some(payload),
        }
    }

    /// Payload that will actually be put on the wire.
    #[must_use]
    pub fn body(&self) -> Option<&Payload> {
        match self.method {
            Method::Post => self.payload.as_ref(),
            Method::Get => None,
        }
    }
}
