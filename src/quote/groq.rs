use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{Quote, QuoteSource};
use crate::config::QuoteConfig;
use crate::consts::{QUOTE_PROMPT, QUOTE_WORD_LIMIT};
use crate::error::{Error, Result, Service, remote_message};

/// Asks a Groq-hosted chat model for a motivational quote.
pub struct GroqQuoteSource {
    client: reqwest::Client,
    config: QuoteConfig,
}

impl GroqQuoteSource {
    pub fn new(client: reqwest::Client, config: QuoteConfig) -> Self {
        Self { client, config }
    }

    fn build_request(&self) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: QUOTE_PROMPT,
            }],
        }
    }

    /// Pull `choices[0].message.content` out of a completion body.
    fn extract_content(body: &str) -> Result<String> {
        let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
            Error::upstream(
                Service::Quote,
                format!("unexpected completion response: {e}"),
            )
        })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                Error::upstream(Service::Quote, "completion response has no message content")
            })
    }

    fn fail(message: String) -> Error {
        Self::logged(Error::upstream(Service::Quote, message))
    }

    fn logged(err: Error) -> Error {
        error!(error = %err, "error generating quote");
        err
    }
}

#[async_trait]
impl QuoteSource for GroqQuoteSource {
    async fn next_quote(&self) -> Result<Quote> {
        debug!(model = %self.config.model, endpoint = %self.config.endpoint, "requesting quote");

        let resp = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&self.build_request())
            .send()
            .await
            .map_err(|e| Self::fail(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Self::fail(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::fail(remote_message(status, &body)));
        }

        let content = Self::extract_content(&body).map_err(Self::logged)?;
        let quote = Quote::parse(&content)
            .ok_or_else(|| Self::fail("model returned an empty quote".to_string()))?;

        if quote.word_count() > QUOTE_WORD_LIMIT {
            warn!(words = quote.word_count(), "quote is longer than requested");
        }
        info!(quote = %quote, "generated quote");
        Ok(quote)
    }
}

// --- API types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> GroqQuoteSource {
        GroqQuoteSource::new(
            reqwest::Client::new(),
            QuoteConfig {
                api_key: "gsk-test".into(),
                endpoint: "http://localhost/chat".into(),
                model: "llama-3.1-8b-instant".into(),
            },
        )
    }

    #[test]
    fn request_has_single_user_message() {
        let source = source();
        let json = serde_json::to_value(source.build_request()).unwrap();
        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], QUOTE_PROMPT);
    }

    #[test]
    fn extract_first_choice() {
        let body = r#"{"choices": [
            {"message": {"role": "assistant", "content": "First"}},
            {"message": {"role": "assistant", "content": "Second"}}
        ]}"#;
        assert_eq!(GroqQuoteSource::extract_content(body).unwrap(), "First");
    }

    #[test]
    fn extract_missing_choices_fails() {
        let err = GroqQuoteSource::extract_content(r#"{"id": "x"}"#).unwrap_err();
        assert!(err.to_string().contains("no message content"));
    }

    #[test]
    fn extract_missing_content_fails() {
        let body = r#"{"choices": [{"message": {"role": "assistant"}}]}"#;
        assert!(GroqQuoteSource::extract_content(body).is_err());
    }

    #[test]
    fn extract_non_json_fails() {
        let err = GroqQuoteSource::extract_content("<html>").unwrap_err();
        assert!(err.is_upstream());
    }
}
