//! Error type shared by every pipeline component.

use std::fmt;

use thiserror::Error;

/// Remote collaborator a request was sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Quote,
    Hosting,
    Instagram,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::Quote => "quote API",
            Service::Hosting => "image host",
            Service::Instagram => "Instagram Graph API",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// A remote call failed in transport or was rejected by the service.
    #[error("{service} error: {message}")]
    Upstream { service: Service, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn upstream(service: Service, message: impl Into<String>) -> Self {
        Error::Upstream {
            service,
            message: message.into(),
        }
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Pull the most useful message out of a remote error body.
///
/// Groq, Cloudinary and the Graph API all wrap failures as
/// `{"error": {"message": ...}}`. Anything else falls back to the raw
/// body, then to the status line.
pub fn remote_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let error = value.get("error");
        if let Some(msg) = error
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return format!("{status}: {msg}");
        }
        if let Some(msg) = error.and_then(|e| e.as_str()) {
            return format!("{status}: {msg}");
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {body}")
    }
}
