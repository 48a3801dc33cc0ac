use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "⚠️ ERROR: Gemini API Key is missing!\n\
         Set your API key in environment variables using:\n\
         export {var}='your-api-key-here'"
    )]
    MissingApiKey { var: &'static str },

    #[error("invalid bind address {addr}: {source}")]
    BindAddr {
        addr: String,
        source: std::net::AddrParseError,
    },
}

/// Anything that goes wrong between building a prompt and getting text back.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("request failed: {}", with_causes(.0))]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("malformed provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

impl GenerationError {
    /// Transport failures from the HTTP client. Client-side timeouts are folded
    /// into `Timeout` so they read the same as the requester's own deadline.
    pub fn transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            GenerationError::Timeout(timeout)
        } else {
            GenerationError::Http(err)
        }
    }

    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Http(_) => "http",
            GenerationError::Api { .. } => "api",
            GenerationError::Decode(_) => "decode",
            GenerationError::Timeout(_) => "timeout",
        }
    }
}

// reqwest keeps the interesting part (refused, dns, tls) in the source chain.
fn with_causes(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !out.contains(&cause_msg) {
            out.push_str(": ");
            out.push_str(&cause_msg);
        }
        source = cause.source();
    }
    out
}

pub type Result<T> = std::result::Result<T, GenerationError>;
