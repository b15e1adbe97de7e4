use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{MediaContainer, MediaPublisher, PublishedMedia};
use crate::config::InstagramConfig;
use crate::error::{Error, Result, Service, remote_message};
use crate::quote::Quote;

/// Instagram content publishing through the Graph API.
///
/// The access token travels as a request parameter on both calls, never
/// as an `Authorization` header.
pub struct InstagramPublisher {
    client: reqwest::Client,
    config: InstagramConfig,
}

impl InstagramPublisher {
    pub fn new(client: reqwest::Client, config: InstagramConfig) -> Self {
        Self { client, config }
    }

    fn publish_url(&self, container: &MediaContainer) -> Result<Url> {
        Url::parse_with_params(
            &self.config.publish_url(),
            [
                ("creation_id", container.id.as_str()),
                ("access_token", self.config.access_token.as_str()),
            ],
        )
        .map_err(|e| Error::Config(format!("invalid Graph API url: {e}")))
    }

    fn fail(context: &str, message: String) -> Error {
        error!(service = %Service::Instagram, error = %message, "{context}");
        Error::upstream(Service::Instagram, message)
    }
}

#[async_trait]
impl MediaPublisher for InstagramPublisher {
    async fn create_container(&self, image_url: &str, caption: &Quote) -> Result<MediaContainer> {
        const CONTEXT: &str = "error creating image object";

        let body = CreateMediaRequest {
            image_url,
            caption: caption.as_str(),
            access_token: &self.config.access_token,
        };

        debug!(%image_url, "creating Instagram media object");
        let resp = self
            .client
            .post(self.config.media_url())
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::fail(CONTEXT, e.to_string()))?;

        // Anything below 400 is accepted, redirects included.
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Self::fail(CONTEXT, e.to_string()))?;
        if status.as_u16() >= 400 {
            return Err(Self::fail(CONTEXT, remote_message(status, &text)));
        }

        debug!(response = %text, "media creation response");
        let id = serde_json::from_str::<CreateMediaResponse>(&text)
            .ok()
            .and_then(|r| r.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Self::fail(CONTEXT, format!("response has no container id: {text}")))?;

        info!(creation_id = %id, "media container created");
        Ok(MediaContainer { id })
    }

    async fn publish(&self, container: MediaContainer) -> Result<PublishedMedia> {
        const CONTEXT: &str = "error publishing media";

        let url = self.publish_url(&container)?;
        debug!(creation_id = %container.id, "publishing media container");

        let resp = self
            .client
            .post(url)
            .timeout(self.config.timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body("{}")
            .send()
            .await
            .map_err(|e| Self::fail(CONTEXT, e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Self::fail(CONTEXT, e.to_string()))?;
        if !status.is_success() {
            return Err(Self::fail(CONTEXT, remote_message(status, &text)));
        }

        let raw: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| Self::fail(CONTEXT, format!("unexpected publish response: {e}")))?;
        let published = PublishedMedia::from_body(raw);

        info!(post_id = ?published.id, "media published");
        Ok(published)
    }
}

#[derive(Serialize)]
struct CreateMediaRequest<'a> {
    image_url: &'a str,
    caption: &'a str,
    access_token: &'a str,
}

#[derive(Deserialize)]
struct CreateMediaResponse {
    #[serde(default, deserialize_with = "id_as_string")]
    id: Option<String>,
}

/// Graph ids are strings, but accept bare numbers too.
fn id_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
