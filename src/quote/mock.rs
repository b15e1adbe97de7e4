use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Quote, QuoteSource};
use crate::error::{Error, Result, Service};

/// A scripted quote source for tests and offline runs.
/// Returns the configured quote and counts how often it was asked.
pub struct StaticQuoteSource {
    quote: String,
    calls: AtomicUsize,
}

impl StaticQuoteSource {
    pub fn new(quote: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for StaticQuoteSource {
    async fn next_quote(&self) -> Result<Quote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Quote::parse(&self.quote)
            .ok_or_else(|| Error::upstream(Service::Quote, "StaticQuoteSource: empty quote"))
    }
}
