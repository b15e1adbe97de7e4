use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info};

use super::{HostedImage, ImageHost};
use crate::config::{CloudinaryConfig, SignatureAlgorithm};
use crate::error::{Error, Result, Service, remote_message};

/// Signed uploads to Cloudinary's image upload API.
pub struct CloudinaryHost {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryHost {
    pub fn new(client: reqwest::Client, config: CloudinaryConfig) -> Self {
        Self { client, config }
    }

    /// Upload options, excluding `file`, `api_key` and `signature`.
    fn upload_params(&self, timestamp: u64) -> Vec<(&'static str, String)> {
        vec![
            ("access_mode", "public".to_string()),
            ("folder", self.config.folder.clone()),
            ("timestamp", timestamp.to_string()),
            ("transformation", self.config.transformation.clone()),
            ("type", "upload".to_string()),
        ]
    }

    fn fail(message: String) -> Error {
        error!(service = %Service::Hosting, error = %message, "cloudinary upload error");
        Error::upstream(Service::Hosting, message)
    }
}

/// Cloudinary request signature: params sorted by key, joined as
/// `k=v&k=v`, secret appended, hex digest.
pub fn sign(params: &[(&str, String)], secret: &str, algorithm: SignatureAlgorithm) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let payload = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let to_sign = format!("{payload}{secret}");

    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(to_sign.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(to_sign.as_bytes())),
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, path: &Path) -> Result<HostedImage> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "quote.jpg".to_string());

        let params = self.upload_params(unix_now());
        let signature = sign(
            &params,
            &self.config.api_secret,
            self.config.signature_algorithm,
        );

        let file = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/jpeg")
            .map_err(|e| Self::fail(e.to_string()))?;

        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key, value);
        }

        let url = self.config.upload_url();
        debug!(%url, folder = %self.config.folder, "uploading image");

        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Self::fail(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Self::fail(e.to_string()))?;
        if !status.is_success() {
            return Err(Self::fail(remote_message(status, &body)));
        }

        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| Self::fail(format!("unexpected upload response: {e}")))?;
        let url = parsed
            .secure_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Self::fail("upload response has no secure_url".to_string()))?;

        info!(image_url = %url, "cloudinary upload successful");
        Ok(HostedImage { url })
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}
