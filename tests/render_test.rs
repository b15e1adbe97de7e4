use std::sync::Arc;

use quotegram::consts::{CANVAS_SIZE, LINE_HEIGHT};
use quotegram::quote::mock::StaticQuoteSource;
use quotegram::quote::{Quote, QuoteSource};
use quotegram::render::typeface::BlockTypeface;
use quotegram::render::{Gradient, QuoteRenderer, line_centers};

fn renderer() -> QuoteRenderer {
    QuoteRenderer::new(Arc::new(BlockTypeface))
}

const SAMPLES: &[&str] = &[
    "Stay focused and never give up",
    "Small steps every day add up to big results over time my friend",
    "Believe in yourself and all that you are because inside you is greatness",
    "Go",
    "Courage is not the absence of fear but the triumph over it every day",
];

#[test]
fn wrapped_lines_fit_unless_single_word() {
    let renderer = renderer();
    let long_word = "a".repeat(40);
    let with_long_word = format!("tiny {long_word} end");
    let mut inputs: Vec<&str> = SAMPLES.to_vec();
    inputs.push(&with_long_word);

    for text in inputs {
        for line in renderer.wrap(text) {
            let fits = renderer.measure(&line) <= renderer.max_line_width();
            let single_word = !line.contains(' ');
            assert!(fits || single_word, "line {line:?} from {text:?} overflows");
        }
    }
}

#[test]
fn wrapping_preserves_words_in_order() {
    let renderer = renderer();
    for text in SAMPLES {
        let rejoined = renderer.wrap(text).join(" ");
        assert_eq!(rejoined, *text);
    }
}

#[test]
fn oversized_word_is_not_split() {
    let renderer = renderer();
    let word = "x".repeat(50);
    let lines = renderer.wrap(&format!("a {word} b"));
    assert_eq!(lines, vec!["a".to_string(), word, "b".to_string()]);
}

#[test]
fn fifteen_word_quotes_stay_on_canvas() {
    let renderer = renderer();
    let fifteen = "motivation ".repeat(15);
    let lines = renderer.wrap(fifteen.trim());
    let centers = line_centers(lines.len(), CANVAS_SIZE as f32, LINE_HEIGHT);

    let first = centers[0];
    let last = *centers.last().unwrap();
    assert!(first > 0.0 && first < CANVAS_SIZE as f32);
    assert!(last > 0.0 && last < CANVAS_SIZE as f32);
}

#[test]
fn random_gradients_are_valid_colors() {
    for _ in 0..20 {
        let g = Gradient::random();
        // Every channel is a u8; the blend between them must stay bounded too.
        for y in [0, 540, 1079] {
            let c = g.color_at(y, CANVAS_SIZE);
            for i in 0..3 {
                let lo = g.top[i].min(g.bottom[i]);
                let hi = g.top[i].max(g.bottom[i]);
                assert!((lo..=hi).contains(&c[i]));
            }
        }
    }
}

#[tokio::test]
async fn mocked_quote_renders_jpeg_to_requested_path() {
    let source = StaticQuoteSource::new("Stay focused and never give up");
    let quote = source.next_quote().await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested-name.jpg");
    let image = renderer().render_to(&quote, &path).unwrap();

    assert_eq!(image.path, path);
    assert!(!image.jpeg.is_empty());
    assert_eq!(std::fs::read(&path).unwrap(), image.jpeg);

    let decoded = image::load_from_memory(&image.jpeg).unwrap();
    assert_eq!(decoded.width(), 1080);
    assert_eq!(decoded.height(), 1080);
}

#[test]
fn render_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quote.jpg");
    std::fs::write(&path, b"stale").unwrap();

    let quote = Quote::parse("Fresh start").unwrap();
    renderer().render_to(&quote, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_ne!(bytes, b"stale");
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn render_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("quote.jpg");
    let quote = Quote::parse("Nowhere to go").unwrap();
    assert!(renderer().render_to(&quote, &path).is_err());
}

#[test]
fn render_summary_serializes_path_quote_and_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quote.jpg");
    let quote = Quote::parse("Keep going").unwrap();
    let image = renderer().render_to(&quote, &path).unwrap();

    let json = serde_json::to_value(image.summary(&quote)).unwrap();
    assert_eq!(json["path"], path.display().to_string());
    assert_eq!(json["quote"], "Keep going");
    assert_eq!(json["bytes"], image.jpeg.len());
}
