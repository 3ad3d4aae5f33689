//! CLI binary for occurock.
//!
//! A thin shim over the library crate: maps CLI flags to a
//! `ConversionConfig`, runs the conversion through the background
//! [`ConversionWorker`], and renders its events as a progress bar on the
//! foreground thread.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use occurock::{
    convert::{output_path, write_markdown},
    ConversionConfig, ConversionWorker, Settings, WorkerEvent, DEFAULT_MODEL,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a PDF; writes ./output/document.md by default
  occurock document.pdf

  # Choose the output directory
  occurock document.pdf -o ~/notes

  # Print the Markdown to stdout instead of a file
  occurock document.pdf --stdout

  # Full structured result as JSON
  occurock document.pdf --json > result.json

  # Pass the API key explicitly (also saved to settings.json)
  occurock --api-key sk-... document.pdf

ENVIRONMENT VARIABLES:
  MISTRAL_API_KEY    Mistral API key (overridden by --api-key)

SETTINGS:
  The API key and output folder persist in settings.json next to the
  executable. Persistence is best-effort: a read-only install still works,
  you just pass --api-key each time.
"#;

/// Convert PDF files to Markdown using the Mistral OCR API.
#[derive(Parser, Debug)]
#[command(
    name = "occurock",
    version,
    about = "Convert PDF files to Markdown using the Mistral OCR API",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Directory the Markdown file is written to (default from settings.json).
    #[arg(short, long = "output-dir", env = "OCCUROCK_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Mistral API key. Saved to settings.json for next time (best-effort).
    #[arg(long, env = "MISTRAL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// OCR model identifier.
    #[arg(long, env = "OCCUROCK_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Request timeout in seconds.
    #[arg(long, env = "OCCUROCK_TIMEOUT", default_value_t = 300)]
    timeout: u64,

    /// Print Markdown to stdout instead of writing a file.
    #[arg(long)]
    stdout: bool,

    /// Output the full structured result as JSON (implies --stdout).
    #[arg(long, env = "OCCUROCK_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "OCCUROCK_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OCCUROCK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long, env = "OCCUROCK_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Settings ─────────────────────────────────────────────────────────
    let settings_path = Settings::default_path();
    let mut settings = Settings::load(&settings_path);

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| (!settings.api_key.is_empty()).then(|| settings.api_key.clone()))
        .context(
            "No API key. Pass --api-key, set MISTRAL_API_KEY, or add it to settings.json.",
        )?;

    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.output_folder));

    // Mirror the key (and any chosen folder) back to settings, best-effort.
    if cli.api_key.is_some() {
        settings.api_key = api_key.clone();
        settings.output_folder = output_dir.to_string_lossy().into_owned();
        settings.store(&settings_path);
    }

    // ── Build config and run ─────────────────────────────────────────────
    let config = ConversionConfig::builder()
        .api_key(api_key)
        .model(cli.model.clone())
        .timeout_secs(cli.timeout)
        .build()
        .context("Invalid configuration")?;

    let bar = show_progress.then(make_bar);

    let worker = ConversionWorker::new();
    let rx = worker
        .spawn(cli.input.clone(), config)
        .context("Could not start conversion")?;

    // Foreground thread: the only place display state is touched.
    let mut outcome = None;
    for event in rx {
        match event {
            WorkerEvent::Progress { percent, message } => {
                if let Some(ref bar) = bar {
                    bar.set_position(u64::from(percent));
                    bar.set_message(message);
                }
            }
            WorkerEvent::Done(output) => outcome = Some(Ok(output)),
            WorkerEvent::Failed(message) => outcome = Some(Err(message)),
        }
    }
    if let Some(ref bar) = bar {
        bar.finish_and_clear();
    }

    let output = match outcome {
        Some(Ok(output)) => output,
        Some(Err(message)) => {
            eprintln!("{} {}", red("✗"), message);
            std::process::exit(1);
        }
        None => bail!("Worker ended without reporting a result"),
    };

    // ── Deliver the result ───────────────────────────────────────────────
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else if cli.stdout {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.markdown.as_bytes())
            .context("Failed to write to stdout")?;
        if !output.markdown.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    } else {
        let out_path = output_path(&cli.input, &output_dir);
        write_markdown(&out_path, &output.markdown)
            .with_context(|| format!("Failed to write {}", out_path.display()))?;

        if !cli.quiet {
            eprintln!(
                "{}  {} pages, {} images  {}ms  →  {}",
                green("✔"),
                output.stats.page_count,
                output.stats.image_count,
                dim(&output.stats.total_duration_ms.to_string()),
                bold(&out_path.display().to_string()),
            );
        }
    }

    Ok(())
}

/// A percent-based bar: the workflow reports four fixed checkpoints.
fn make_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} [{bar:42.green/238}] {pos:>3}%  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_message("Starting…");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
