//! CLI binary for receipt2csv.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig`, runs one extraction, and reports the outcome.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use receipt2csv::config::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use receipt2csv::{extract_to_file, ExtractionConfig, ReceiptError};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract one receipt
  receipt2csv receipt.pdf receipt.csv

  # Pass the key explicitly
  receipt2csv -k sk-ant-... receipt.pdf receipt.csv

  # Use a different model and a custom instruction
  receipt2csv --model claude-sonnet-4-20250514 --system-prompt prompt.txt receipt.pdf out.csv

EXIT STATUS:
  0  CSV written
  1  no API key, the API call failed, or the input/output file could not be used

ENVIRONMENT VARIABLES:
  ANTHROPIC_API_KEY       API key (used when --api-key is not given)
  ANTHROPIC_MODEL         Override model ID
  ANTHROPIC_BASE_URL      Override API root (proxies, local stubs)
  RUST_LOG                Override log filter (e.g. receipt2csv=debug)
"#;

/// Extract receipt line items from a PDF into CSV using Claude.
#[derive(Parser, Debug)]
#[command(
    name = "receipt2csv",
    version,
    about = "Extract receipt data from a Wolt PDF to CSV via Claude",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the input PDF file.
    input: PathBuf,

    /// Path to write the extracted CSV (replaced if it exists).
    output: PathBuf,

    /// Anthropic API key.
    #[arg(short = 'k', long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model ID.
    #[arg(long, env = "ANTHROPIC_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Max output tokens.
    #[arg(long, env = "RECEIPT2CSV_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Sampling temperature (0.0–1.0).
    #[arg(long, env = "RECEIPT2CSV_TEMPERATURE", default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// API root URL.
    #[arg(long, env = "ANTHROPIC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Path to a text file containing a custom extraction prompt.
    #[arg(long, env = "RECEIPT2CSV_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Request timeout in seconds (default: none).
    #[arg(long, env = "RECEIPT2CSV_TIMEOUT")]
    timeout: Option<u64>,

    /// Disable the spinner.
    #[arg(long, env = "RECEIPT2CSV_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress logs and the spinner (errors and the final status line still print).
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    // The key check comes first: nothing is read or sent without one.
    let mut config = match build_config(&cli) {
        Ok(config) => config,
        Err(ReceiptError::MissingApiKey) => {
            eprintln!("Error: {}", ReceiptError::MissingApiKey);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).context("Invalid configuration"),
    };

    if let Some(ref path) = cli.system_prompt {
        config.system_prompt = Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {:?}", path))?,
        );
    }

    // ── Run extraction ───────────────────────────────────────────────────
    let spinner = (!cli.quiet && !cli.no_progress).then(|| start_spinner(&config.model));
    let result = extract_to_file(&cli.input, &cli.output, &config).await;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    match result {
        Ok(stats) => {
            tracing::info!(
                "{} tokens in / {} tokens out, {}ms",
                stats.input_tokens,
                stats.output_tokens,
                stats.duration_ms
            );
            println!("Saved extracted CSV to {}", cli.output.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(ReceiptError::Service(e)) => {
            eprintln!("Failed to extract CSV: {e}");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).context("Extraction failed"),
    }
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli) -> Result<ExtractionConfig, ReceiptError> {
    ExtractionConfig::builder()
        .api_key_opt(cli.api_key.clone())
        .model(cli.model.clone())
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .base_url(cli.base_url.clone())
        .request_timeout_secs(cli.timeout)
        .build()
}

/// Spinner on stderr while the single request is in flight.
fn start_spinner(model: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("Extracting");
    bar.set_message(format!("waiting for {model}…"));
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
