//! Project-wide constants.

use std::time::Duration;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Groq's OpenAI-compatible chat completion endpoint.
pub const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default chat model when `GROQ_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// The single user message sent to the model.
pub const QUOTE_PROMPT: &str = "Give me a short unique motivational quote (max 15 words). \
                                Return only the quote without any quotation marks.";

/// Quotes longer than this are still posted, but logged.
pub const QUOTE_WORD_LIMIT: usize = 15;

pub const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";
pub const CLOUDINARY_FOLDER: &str = "instagram_posts";
pub const CLOUDINARY_TRANSFORMATION: &str = "q_auto:good,f_jpg";

/// Versioned Graph API base, without the account segment.
pub const GRAPH_API_BASE: &str = "https://graph.facebook.com/v24.0";

/// Applies to both Graph calls. Quote and upload calls have no timeout.
pub const GRAPH_TIMEOUT: Duration = Duration::from_secs(30);

pub const CANVAS_SIZE: u32 = 1080;
pub const FONT_SIZE: f32 = 60.0;
pub const LINE_HEIGHT: f32 = 70.0;
/// Horizontal room left free around the text block.
pub const TEXT_MARGIN: f32 = 100.0;
pub const SHADOW_OFFSET: f32 = 3.0;
pub const SHADOW_ALPHA: f32 = 0.5;
pub const JPEG_QUALITY: u8 = 95;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default output path for the rendered image.
pub const DEFAULT_OUTPUT: &str = "./quote.jpg";

/// Sans-serif fonts tried, in order, when no font is configured.
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// File names looked up in the user's font directory.
pub const USER_FONT_NAMES: &[&str] = &["Arial.ttf", "arial.ttf", "DejaVuSans.ttf"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consts_are_non_empty() {
        assert!(!AUTHOR.is_empty());
        assert!(!HOMEPAGE.is_empty());
        assert!(!REPO.is_empty());
        assert!(!DEFAULT_MODEL.is_empty());
    }

    #[test]
    fn consts_from_cargo_toml() {
        assert!(AUTHOR.contains("Assaf Sapir"));
        assert!(REPO.contains("github.com/assapir/quotegram"));
    }

    #[test]
    fn prompt_asks_for_bare_short_quote() {
        assert!(QUOTE_PROMPT.contains("max 15 words"));
        assert!(QUOTE_PROMPT.contains("without any quotation marks"));
    }

    #[test]
    fn text_fits_canvas() {
        assert!(TEXT_MARGIN < CANVAS_SIZE as f32);
        assert!(LINE_HEIGHT > FONT_SIZE);
    }

    #[test]
    fn default_log_filter_shows_info_events() {
        assert_eq!(DEFAULT_LOG_FILTER, "info");
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn graph_base_is_versioned() {
        assert!(GRAPH_API_BASE.ends_with("/v24.0"));
    }
}
