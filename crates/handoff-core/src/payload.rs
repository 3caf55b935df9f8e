//! Download job payload handed to the companion.
//!
//! The JSON shape (`url`, `is_stream`, `cookies`, `referrer`, `user_agent`) is what
//! the companion's delivery endpoint accepts.

use serde::{Deserialize, Serialize};

/// User agent sent when the producer does not supply one.
pub const DEFAULT_USER_AGENT: &str = concat!("handoff/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("invalid target URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("unsupported URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),
    #[error("failed to encode payload: {0}")]
    Encode(String),
}

/// Flat, serializable description of one download job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPayload {
    #[serde(rename = "url")]
    pub target_url: String,
    /// Semicolon-joined `name=value` pairs, ready for a `Cookie` header.
    #[serde(rename = "cookies")]
    pub cookie_header: String,
    pub referrer: String,
    pub user_agent: String,
    #[serde(default)]
    pub is_stream: bool,
}

impl JobPayload {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            cookie_header: String::new(),
            referrer: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            is_stream: false,
        }
    }

    pub fn with_cookies<'a, I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.cookie_header = cookie_header(pairs);
        self
    }

    /// Page URL wins over the explicit referrer; both missing yields "".
    pub fn with_referrer(mut self, page_url: Option<&str>, referrer: Option<&str>) -> Self {
        self.referrer = resolve_referrer(page_url, referrer);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_stream(mut self, is_stream: bool) -> Self {
        self.is_stream = is_stream;
        self
    }

    /// The target must be an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), PayloadError> {
        let parsed = url::Url::parse(&self.target_url).map_err(|e| PayloadError::InvalidUrl {
            url: self.target_url.clone(),
            reason: e.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(PayloadError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Validate and encode as the JSON request body.
    pub fn to_json(&self) -> Result<Vec<u8>, PayloadError> {
        self.validate()?;
        serde_json::to_vec(self).map_err(|e| PayloadError::Encode(e.to_string()))
    }
}

/// Join cookie pairs into a single `Cookie` header value (`a=1; b=2`).
pub fn cookie_header<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

fn resolve_referrer(page_url: Option<&str>, referrer: Option<&str>) -> String {
    page_url
        .filter(|s| !s.is_empty())
        .or(referrer.filter(|s| !s.is_empty()))
        .unwrap_or("")
        .to_string()
}
