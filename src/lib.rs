//! # receipt2csv
//!
//! Turn a PDF receipt into CSV by handing it to the Anthropic Messages API.
//!
//! The crate does no PDF parsing of its own. The file is base64-encoded,
//! sent once together with a fixed extraction prompt, and whatever text the
//! model returns is written out verbatim.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input   read the file into memory
//!  ├─ 2. Encode  bytes → base64 document block
//!  ├─ 3. Call    one POST /v1/messages, no retry
//!  └─ 4. Output  concatenate reply fragments → CSV file
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use receipt2csv::{extract_to_file, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder()
//!         .api_key(std::env::var("ANTHROPIC_API_KEY")?)
//!         .build()?;
//!     let stats = extract_to_file("receipt.pdf", "receipt.csv", &config).await?;
//!     eprintln!("tokens: {} in / {} out", stats.input_tokens, stats.output_tokens);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `receipt2csv` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ApiKey, ExtractionConfig, ExtractionConfigBuilder};
pub use error::{ReceiptError, ServiceError};
pub use extract::{extract, extract_to_file};
pub use output::{ExtractionOutput, ExtractionReply, ExtractionStats, Fragment, ReplyContent, Usage};
pub use pipeline::llm::{AnthropicClient, ExtractionRequest, ExtractionService};
