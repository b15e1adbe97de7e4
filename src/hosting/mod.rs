pub mod cloudinary;

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Public URL of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedImage {
    pub url: String,
}

/// Uploads local images somewhere the Graph API can fetch them from.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, path: &Path) -> Result<HostedImage>;
}
