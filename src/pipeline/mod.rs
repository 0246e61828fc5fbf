//! Pipeline stages for receipt extraction.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ llm
//! (read)    (base64)  (Messages API)
//! ```
//!
//! 1. [`input`]  — read the receipt file into memory
//! 2. [`encode`] — base64-wrap the bytes for the JSON request body
//! 3. [`llm`]    — the service seam and the Anthropic client; the only stage
//!    with network I/O

pub mod encode;
pub mod input;
pub mod llm;
