//! The posting pipeline: quote → image → upload → container → publish.
//!
//! A plain sequence of fallible steps. The first failure ends the run;
//! nothing is retried, resumed or cleaned up.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{Event, EventBus};
use crate::hosting::ImageHost;
use crate::hosting::cloudinary::CloudinaryHost;
use crate::quote::QuoteSource;
use crate::quote::groq::GroqQuoteSource;
use crate::render::QuoteRenderer;
use crate::render::typeface::Typeface;
use crate::social::MediaPublisher;
use crate::social::instagram::InstagramPublisher;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    GenerateQuote,
    RenderImage,
    UploadImage,
    CreateMedia,
    PublishMedia,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::GenerateQuote,
        Stage::RenderImage,
        Stage::UploadImage,
        Stage::CreateMedia,
        Stage::PublishMedia,
    ];

    /// 1-based position, for "[2/5]" style progress.
    pub fn number(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0) + 1
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::GenerateQuote => "generating quote",
            Stage::RenderImage => "rendering image",
            Stage::UploadImage => "uploading image",
            Stage::CreateMedia => "creating Instagram media object",
            Stage::PublishMedia => "publishing to Instagram",
        };
        f.write_str(label)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResult {
    pub success: bool,
    pub post_id: Option<String>,
    pub quote: String,
    pub image_url: String,
}

/// Wires a quote source, renderer, image host and publisher into one run.
pub struct Pipeline {
    quotes: Box<dyn QuoteSource>,
    renderer: QuoteRenderer,
    host: Box<dyn ImageHost>,
    publisher: Box<dyn MediaPublisher>,
    output: PathBuf,
    events: EventBus,
}

impl Pipeline {
    pub fn new(
        quotes: Box<dyn QuoteSource>,
        renderer: QuoteRenderer,
        host: Box<dyn ImageHost>,
        publisher: Box<dyn MediaPublisher>,
        output: PathBuf,
    ) -> Self {
        Self {
            quotes,
            renderer,
            host,
            publisher,
            output,
            events: EventBus::default(),
        }
    }

    /// Production wiring: Groq, Cloudinary and Instagram sharing one HTTP client.
    pub fn from_config(config: &Config, typeface: Arc<dyn Typeface>, output: PathBuf) -> Self {
        let client = reqwest::Client::new();
        Self::new(
            Box::new(GroqQuoteSource::new(client.clone(), config.quote.clone())),
            QuoteRenderer::new(typeface),
            Box::new(CloudinaryHost::new(client.clone(), config.cloudinary.clone())),
            Box::new(InstagramPublisher::new(client, config.instagram.clone())),
            output,
        )
    }

    /// Follow stage progress of subsequent runs.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Run every stage once, in order.
    pub async fn run(&self) -> Result<PostResult> {
        let quote = self
            .step(Stage::GenerateQuote, self.quotes.next_quote(), |q| {
                q.to_string()
            })
            .await?;

        let renderer = self.renderer.clone();
        let output = self.output.clone();
        let caption = quote.clone();
        let image = self
            .step(
                Stage::RenderImage,
                async move {
                    tokio::task::spawn_blocking(move || renderer.render_to(&caption, &output))
                        .await
                        .unwrap_or_else(|e| Err(Error::Task(e)))
                },
                |img| format!("saved as {}", img.path.display()),
            )
            .await?;

        let hosted = self
            .step(Stage::UploadImage, self.host.upload(&image.path), |h| {
                h.url.clone()
            })
            .await?;

        let container = self
            .step(
                Stage::CreateMedia,
                self.publisher.create_container(&hosted.url, &quote),
                |c| format!("creation id {}", c.id),
            )
            .await?;

        let published = self
            .step(
                Stage::PublishMedia,
                self.publisher.publish(container),
                |p| match &p.id {
                    Some(id) => format!("post id {id}"),
                    None => "published".to_string(),
                },
            )
            .await?;

        info!(post_id = ?published.id, "successfully posted to Instagram");
        Ok(PostResult {
            success: true,
            post_id: published.id,
            quote: quote.into_inner(),
            image_url: hosted.url,
        })
    }

    async fn step<T, F, D>(&self, stage: Stage, work: F, describe: D) -> Result<T>
    where
        F: Future<Output = Result<T>>,
        D: FnOnce(&T) -> String,
    {
        self.events.emit(Event::StageStarted { stage });
        match work.await {
            Ok(value) => {
                let detail = describe(&value);
                self.events.emit(Event::StageCompleted { stage, detail });
                Ok(value)
            }
            Err(e) => {
                error!(%stage, error = %e, "pipeline stage failed");
                self.events.emit(Event::Failed {
                    stage,
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }
}
