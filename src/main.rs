use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast;

use quotegram::banner::{BannerInfo, print_banner, print_failure, print_result, stage_line};
use quotegram::config::Config;
use quotegram::consts::{DEFAULT_LOG_FILTER, DEFAULT_OUTPUT};
use quotegram::events::Event;
use quotegram::pipeline::Pipeline;
use quotegram::quote::Quote;
use quotegram::render::QuoteRenderer;
use quotegram::render::typeface::FontdueTypeface;
use quotegram::spinner::Spinner;

#[derive(Parser)]
#[command(
    name = "quotegram",
    version,
    about = "Generate a motivational quote card and post it to Instagram."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Where to write the rendered JPEG (overwritten)
    #[arg(short, long, global = true, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// TrueType/OpenType font for the quote text
    #[arg(short, long, global = true, env = "QUOTEGRAM_FONT")]
    font: Option<PathBuf>,

    /// Print the final result as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate, render, upload and publish one post (default)
    Post,
    /// Render a quote card locally without touching the network
    Render {
        /// Quote text to render
        #[arg(short, long)]
        quote: String,

        /// Open the image in the default viewer afterwards
        #[arg(long, default_value_t = false)]
        open: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        None | Some(Command::Post) => handle_post(cli.output, cli.font, cli.json).await,
        Some(Command::Render { quote, open }) => {
            handle_render(&quote, cli.output, cli.font, open, cli.json)
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "run failed");
            print_failure(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn handle_post(output: PathBuf, font: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    let font = font.or_else(|| config.font.clone());
    let typeface = FontdueTypeface::discover(font.as_deref()).context("failed to load font")?;

    print_banner(&BannerInfo {
        mode: "post",
        model: &config.quote.model,
        account: &config.instagram.account_id,
        output: &output,
    });

    let pipeline = Pipeline::from_config(&config, Arc::new(typeface), output);
    let progress = tokio::spawn(show_progress(pipeline.subscribe()));

    let result = pipeline.run().await;
    // Dropping the pipeline closes the event channel and ends the listener.
    drop(pipeline);
    let _ = progress.await;

    let result = result?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn handle_render(
    text: &str,
    output: PathBuf,
    font: Option<PathBuf>,
    open: bool,
    json: bool,
) -> anyhow::Result<()> {
    let quote = Quote::parse(text).ok_or_else(|| anyhow!("quote is empty"))?;
    let typeface = FontdueTypeface::discover(font.as_deref()).context("failed to load font")?;
    let renderer = QuoteRenderer::new(Arc::new(typeface));

    let image = renderer
        .render_to(&quote, &output)
        .with_context(|| format!("failed to render {}", output.display()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&image.summary(&quote))?);
    } else {
        println!("Image saved as {}", image.path.display());
    }

    if open && let Err(e) = open::that(&image.path) {
        tracing::warn!(error = %e, "could not open image viewer");
    }
    Ok(())
}

/// Print stage headings and results, with a spinner while a stage runs.
async fn show_progress(mut rx: broadcast::Receiver<Event>) {
    let mut spinner: Option<Spinner> = None;
    loop {
        match rx.recv().await {
            Ok(Event::StageStarted { stage }) => {
                println!("\n{}", stage_line(stage));
                spinner = Some(Spinner::start(&stage.to_string()));
            }
            Ok(Event::StageCompleted { detail, .. }) => {
                let line = format!("   ✓ {detail}");
                match spinner.take() {
                    Some(s) => s.finish(&line).await,
                    None => println!("{line}"),
                }
            }
            Ok(Event::Failed { reason, .. }) => {
                let line = format!("   ✗ {reason}");
                match spinner.take() {
                    Some(s) => s.finish(&line).await,
                    None => println!("{line}"),
                }
            }
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    if let Some(s) = spinner {
        s.stop().await;
    }
}
