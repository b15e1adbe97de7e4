//! Startup banner and end-of-run summary display.

use std::path::Path;

use crate::consts::{AUTHOR, HOMEPAGE, REPO};
use crate::pipeline::{PostResult, Stage};

/// Run configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub mode: &'a str,
    pub model: &'a str,
    pub account: &'a str,
    pub output: &'a Path,
}

/// Print the startup banner with run info.
pub fn print_banner(info: &BannerInfo) {
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║          Q U O T E G R A M            ║
   ║    one quote, one image, one post     ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   mode      {}
   model     {}
   account   {}
   output    {}
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.mode,
        info.model,
        info.account,
        info.output.display(),
    );
}

/// `[2/5] rendering image` style stage heading.
pub fn stage_line(stage: Stage) -> String {
    format!("[{}/{}] {}", stage.number(), Stage::ALL.len(), stage)
}

/// Print the result of a successful run.
pub fn print_result(result: &PostResult) {
    println!("\nSuccessfully posted to Instagram!");
    println!("   post id   {}", result.post_id.as_deref().unwrap_or("—"));
    println!("   quote     {}", result.quote);
    println!("   image     {}", result.image_url);
}

/// Print the terminal failure line.
pub fn print_failure(error: &dyn std::fmt::Display) {
    eprintln!("\nFailed: {error}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn print_banner_does_not_panic() {
        let info = BannerInfo {
            mode: "post",
            model: "llama-3.1-8b-instant",
            account: "1784",
            output: &PathBuf::from("./quote.jpg"),
        };
        print_banner(&info);
    }

    #[test]
    fn stage_line_numbers_stages() {
        assert_eq!(stage_line(Stage::GenerateQuote), "[1/5] generating quote");
        assert_eq!(stage_line(Stage::PublishMedia), "[5/5] publishing to Instagram");
    }

    #[test]
    fn print_result_without_post_id() {
        print_result(&PostResult {
            success: true,
            post_id: None,
            quote: "Keep going".into(),
            image_url: "https://img.example/q.jpg".into(),
        });
    }
}
