pub mod instagram;

use async_trait::async_trait;

use crate::error::Result;
use crate::quote::Quote;

/// Server-side handle for a post that has not been published yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaContainer {
    pub id: String,
}

/// Body returned by the publish call.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMedia {
    /// Identifier of the live post, when the service reported one.
    pub id: Option<String>,
    pub raw: serde_json::Value,
}

impl PublishedMedia {
    pub fn from_body(raw: serde_json::Value) -> Self {
        let id = match raw.get("id") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Self { id, raw }
    }
}

/// Two-step publishing: create a container for an image, then publish it.
#[async_trait]
pub trait MediaPublisher: Send + Sync {
    async fn create_container(&self, image_url: &str, caption: &Quote) -> Result<MediaContainer>;
    async fn publish(&self, container: MediaContainer) -> Result<PublishedMedia>;
}
