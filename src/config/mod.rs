//! Runtime configuration, read once from the process environment.
//!
//! Each component receives only its own section. Endpoint bases default to
//! the production services and are plain fields so tests can point them at
//! a mock server.

use std::path::PathBuf;
use std::time::Duration;

use crate::consts::{
    CLOUDINARY_API_BASE, CLOUDINARY_FOLDER, CLOUDINARY_TRANSFORMATION, DEFAULT_MODEL,
    GRAPH_API_BASE, GRAPH_TIMEOUT, GROQ_CHAT_URL,
};
use crate::error::{Error, Result};

/// Digest used to sign Cloudinary upload parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(Error::Config(format!(
                "unsupported CLOUDINARY_SIGNATURE_ALGORITHM: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuoteConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
    pub folder: String,
    pub transformation: String,
    pub signature_algorithm: SignatureAlgorithm,
}

impl CloudinaryConfig {
    /// `{api_base}/v1_1/{cloud_name}/image/upload`
    pub fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.api_base.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

#[derive(Debug, Clone)]
pub struct InstagramConfig {
    pub account_id: String,
    pub access_token: String,
    /// Versioned Graph base, e.g. `https://graph.facebook.com/v24.0`.
    pub graph_base: String,
    pub timeout: Duration,
}

impl InstagramConfig {
    pub fn media_url(&self) -> String {
        format!("{}/{}/media", self.graph_base.trim_end_matches('/'), self.account_id)
    }

    pub fn publish_url(&self) -> String {
        format!(
            "{}/{}/media_publish",
            self.graph_base.trim_end_matches('/'),
            self.account_id
        )
    }
}

/// Everything the pipeline needs to run once.
#[derive(Debug, Clone)]
pub struct Config {
    pub quote: QuoteConfig,
    pub cloudinary: CloudinaryConfig,
    pub instagram: InstagramConfig,
    /// Font file override (`QUOTEGRAM_FONT`).
    pub font: Option<PathBuf>,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    ///
    /// All missing required variables are reported in one error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        let mut require = |key: &'static str| match get(key) {
            Some(value) => value,
            None => {
                missing.push(key);
                String::new()
            }
        };

        let groq_key = require("GROQ_API_KEY");
        let cloud_name = require("CLOUDINARY_CLOUD_NAME");
        let cloud_key = require("CLOUDINARY_API_KEY");
        let cloud_secret = require("CLOUDINARY_API_SECRET");
        let account_id = require("IG_ID");
        let access_token = require("ACCESS_TOKEN");

        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing environment variables: {}",
                missing.join(", ")
            )));
        }

        let signature_algorithm = match get("CLOUDINARY_SIGNATURE_ALGORITHM") {
            Some(value) => SignatureAlgorithm::parse(&value)?,
            None => SignatureAlgorithm::default(),
        };

        Ok(Self {
            quote: QuoteConfig {
                api_key: groq_key,
                endpoint: GROQ_CHAT_URL.to_string(),
                model: get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            },
            cloudinary: CloudinaryConfig {
                cloud_name,
                api_key: cloud_key,
                api_secret: cloud_secret,
                api_base: CLOUDINARY_API_BASE.to_string(),
                folder: CLOUDINARY_FOLDER.to_string(),
                transformation: CLOUDINARY_TRANSFORMATION.to_string(),
                signature_algorithm,
            },
            instagram: InstagramConfig {
                account_id,
                access_token,
                graph_base: GRAPH_API_BASE.to_string(),
                timeout: GRAPH_TIMEOUT,
            },
            font: get("QUOTEGRAM_FONT").map(PathBuf::from),
        })
    }
}
