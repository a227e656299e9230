//! Upstream HTTP API clients.
//!
//! Thin request/response wrappers around the external collaborators:
//! NASA (APOD, Mars rover photos), Google Gemini Vision, the ThongSo
//! hospital API, and the two CRUD backends. Every client owns a
//! `reqwest::Client` and maps failures into [`ServiceError`].

pub mod gemini;
pub mod hospital;
pub mod nasa;
pub mod treatments_api;
pub mod users_api;

use thiserror::Error;

/// Error taxonomy for upstream calls: transport failures, non-2xx
/// statuses (with the code preserved for per-action messaging), and
/// unexpected response shapes.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("missing API key: {0}")]
    MissingKey(&'static str),

    #[error("unexpected response shape: {0}")]
    Decode(String),
}

impl ServiceError {
    /// The HTTP status code, when the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Build a default HTTP client with a sane timeout for upstream calls.
pub fn default_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
