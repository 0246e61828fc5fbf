//! Input loading: read the receipt file into memory.
//!
//! The bytes are sent as-is. A missing `%PDF` header or an oversized file is
//! logged but never rejected here; the service is the one that decides what
//! it accepts.

use crate::error::ReceiptError;
use std::path::Path;
use tracing::{debug, warn};

/// Largest PDF the Messages API documents accepting.
pub const SERVICE_PDF_LIMIT_BYTES: usize = 32 * 1024 * 1024;

/// Read the whole input file.
pub async fn read_input(path: &Path) -> Result<Vec<u8>, ReceiptError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ReceiptError::InputRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    if !looks_like_pdf(&bytes) {
        warn!(
            "{} does not start with a %PDF header; sending it anyway",
            path.display()
        );
    }
    if bytes.len() > SERVICE_PDF_LIMIT_BYTES {
        warn!(
            "{} is {} bytes, above the service's {} byte PDF limit",
            path.display(),
            bytes.len(),
            SERVICE_PDF_LIMIT_BYTES
        );
    }

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Check the PDF magic bytes.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}
