//! Extraction entry points.
//!
//! [`extract`] runs read → encode → call and returns the reply in memory;
//! [`extract_to_file`] additionally writes the CSV text to disk. Neither
//! retries: one request per run.

use crate::config::ExtractionConfig;
use crate::error::ReceiptError;
use crate::output::{ExtractionOutput, ExtractionStats};
use crate::pipeline::llm::{AnthropicClient, ExtractionRequest, ExtractionService};
use crate::pipeline::{encode, input};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Extract CSV text from a receipt file.
///
/// # Errors
/// - [`ReceiptError::InputRead`] if the file can't be read
/// - [`ReceiptError::Service`] if the remote call fails for any reason
pub async fn extract(
    input_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ReceiptError> {
    let start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting extraction: {}", input_path.display());

    // ── Step 1: Read ─────────────────────────────────────────────────────
    let bytes = input::read_input(input_path).await?;

    // ── Step 2: Encode ───────────────────────────────────────────────────
    let document = encode::encode_document(&bytes);
    let encoded_bytes = document.data.len();
    let request = ExtractionRequest::new(document, config);

    // ── Step 3: Call the service ─────────────────────────────────────────
    let service = resolve_service(config)?;
    let reply = service.extract(&request).await?;

    if reply.stop_reason.as_deref() == Some("max_tokens") {
        warn!(
            "Reply hit the {} token limit; the CSV is probably truncated",
            config.max_tokens
        );
    }

    // ── Step 4: Flatten fragments ────────────────────────────────────────
    let csv = reply.content.to_text();

    let stats = ExtractionStats {
        input_bytes: bytes.len(),
        encoded_bytes,
        input_tokens: reply.usage.input_tokens,
        output_tokens: reply.usage.output_tokens,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Extraction complete: {} chars, {} tokens in / {} tokens out, {}ms",
        csv.len(),
        stats.input_tokens,
        stats.output_tokens,
        stats.duration_ms
    );

    Ok(ExtractionOutput { csv, reply, stats })
}

/// Extract and write the CSV text to `output_path`.
///
/// Existing content at `output_path` is replaced. The text goes to a fresh
/// temp file in the same directory and is renamed into place, so a failed
/// call or a failed write never leaves a half-written destination and no
/// other file is touched. Missing parent directories are created.
pub async fn extract_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, ReceiptError> {
    let output = extract(input_path, config).await?;
    write_output(output_path.as_ref(), &output.csv).await?;
    Ok(output.stats)
}

/// Replace the contents of `path` with `text` (UTF-8).
pub async fn write_output(path: &Path, text: &str) -> Result<(), ReceiptError> {
    let path = path.to_path_buf();
    let text = text.to_owned();

    tokio::task::spawn_blocking(move || write_output_blocking(&path, &text))
        .await
        .map_err(|e| ReceiptError::Internal(format!("output writer panicked: {e}")))?
}

fn write_output_blocking(path: &Path, text: &str) -> Result<(), ReceiptError> {
    let write_err = |e: std::io::Error| ReceiptError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(write_err)?;
            parent
        }
        None => Path::new("."),
    };

    // The temp file is deleted on drop, including when `persist` fails.
    let mut tmp = NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// Use the injected service if there is one, otherwise the Anthropic client.
fn resolve_service(config: &ExtractionConfig) -> Result<Arc<dyn ExtractionService>, ReceiptError> {
    if let Some(ref service) = config.service {
        return Ok(Arc::clone(service));
    }
    Ok(Arc::new(AnthropicClient::new(config)?))
}
