//! Document encoding: raw bytes → base64 `EncodedDocument`.
//!
//! The Messages API takes documents as base64 inside the JSON request body.
//! Standard alphabet with padding, the same bytes always give the same string.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Media type declared for every receipt.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A document ready to embed in a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedDocument {
    pub media_type: String,
    /// Standard base64 of the file contents.
    pub data: String,
}

/// Base64-encode a receipt for the request body.
pub fn encode_document(bytes: &[u8]) -> EncodedDocument {
    let data = STANDARD.encode(bytes);
    debug!("Encoded document → {} bytes base64", data.len());

    EncodedDocument {
        media_type: PDF_MEDIA_TYPE.to_string(),
        data,
    }
}
