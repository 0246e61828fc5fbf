//! Service interaction: build the Messages API request and call it.
//!
//! [`ExtractionService`] is the seam between the pipeline and the network.
//! [`AnthropicClient`] is the production implementation; tests and library
//! users can inject their own through
//! [`crate::config::ExtractionConfigBuilder::service`].
//!
//! ## Request Layout
//!
//! ```text
//! POST {base_url}/v1/messages
//! x-api-key: …
//! anthropic-version: 2023-06-01
//!
//! { model, max_tokens, temperature,
//!   system:   <instruction prompt>,
//!   messages: [ { role: "user",
//!                 content: [ { type: "document",
//!                              source: { type: "base64",
//!                                        media_type: "application/pdf",
//!                                        data: … } } ] } ] }
//! ```
//!
//! The call is made exactly once. Failures surface as [`ServiceError`].

use crate::config::{ApiKey, ExtractionConfig, ANTHROPIC_VERSION};
use crate::error::{ReceiptError, ServiceError};
use crate::output::{ExtractionReply, ReplyContent, Usage};
use crate::pipeline::encode::EncodedDocument;
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Something that turns an encoded receipt plus instructions into reply text.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionReply, ServiceError>;
}

/// One outbound request, assembled once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    pub document: EncodedDocument,
    pub system_prompt: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ExtractionRequest {
    pub fn new(document: EncodedDocument, config: &ExtractionConfig) -> Self {
        let system_prompt = config
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        Self {
            document,
            system_prompt,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: [ContentBlock<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock<'a> {
    Document { source: DocumentSource<'a> },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum DocumentSource<'a> {
    Base64 { media_type: &'a str, data: &'a str },
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Value,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    message: String,
}

// ── Anthropic client ─────────────────────────────────────────────────────

/// [`ExtractionService`] backed by the Anthropic Messages API.
pub struct AnthropicClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: ApiKey,
}

impl AnthropicClient {
    /// Build a client from the run configuration.
    pub fn new(config: &ExtractionConfig) -> Result<Self, ReceiptError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ReceiptError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: messages_endpoint(&config.base_url),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ExtractionService for AnthropicClient {
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionReply, ServiceError> {
        debug!("POST {} (model {})", self.endpoint, request.model);

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&build_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!("HTTP {} with {} byte body", status, body.len());

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }
        parse_reply(&body)
    }
}

fn messages_endpoint(base_url: &str) -> String {
    format!("{}/v1/messages", base_url.trim_end_matches('/'))
}

fn build_body(request: &ExtractionRequest) -> MessagesRequest<'_> {
    MessagesRequest {
        model: &request.model,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        system: &request.system_prompt,
        messages: [Message {
            role: "user",
            content: [ContentBlock::Document {
                source: DocumentSource::Base64 {
                    media_type: &request.document.media_type,
                    data: &request.document.data,
                },
            }],
        }],
    }
}

/// Decode a successful Messages API body.
fn parse_reply(body: &[u8]) -> Result<ExtractionReply, ServiceError> {
    let parsed: MessagesResponse = serde_json::from_slice(body)
        .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

    Ok(ExtractionReply {
        content: ReplyContent::from_value(parsed.content),
        usage: parsed.usage,
        model: parsed.model,
        stop_reason: parsed.stop_reason,
    })
}

/// Turn a non-success response into an error, preferring the API's own message.
fn api_error(status: u16, body: &[u8]) -> ServiceError {
    let message = match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(ApiErrorBody {
            error: ApiErrorDetail {
                kind: Some(kind),
                message,
            },
        }) => format!("{kind}: {message}"),
        Ok(ApiErrorBody { error }) => error.message,
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                "empty response body".to_string()
            } else {
                text
            }
        }
    };
    ServiceError::Api { status, message }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encode::encode_document;
    use serde_json::json;

    fn config() -> ExtractionConfig {
        ExtractionConfig::builder().api_key("test-key").build().unwrap()
    }

    #[test]
    fn request_uses_default_prompt_and_config() {
        let req = ExtractionRequest::new(encode_document(b"%PDF"), &config());
        assert_eq!(req.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(req.model, crate::config::DEFAULT_MODEL);
        assert_eq!(req.max_tokens, 20_000);
    }

    #[test]
    fn request_honours_prompt_override() {
        let config = ExtractionConfig::builder()
            .api_key("k")
            .system_prompt("just CSV please")
            .build()
            .unwrap();
        let req = ExtractionRequest::new(encode_document(b"x"), &config);
        assert_eq!(req.system_prompt, "just CSV please");
    }

    #[test]
    fn body_carries_document_block() {
        let req = ExtractionRequest::new(encode_document(b"ab"), &config());
        let body = serde_json::to_value(build_body(&req)).unwrap();

        assert_eq!(body["model"], crate::config::DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 20_000);
        assert_eq!(body["temperature"], 1.0);
        assert_eq!(body["system"], DEFAULT_SYSTEM_PROMPT);
        assert_eq!(
            body["messages"],
            json!([{
                "role": "user",
                "content": [{
                    "type": "document",
                    "source": {
                        "type": "base64",
                        "media_type": "application/pdf",
                        "data": "YWI="
                    }
                }]
            }])
        );
    }

    #[test]
    fn endpoint_joins_base_url() {
        assert_eq!(
            messages_endpoint("https://api.anthropic.com"),
            "https://api.anthropic.com/v1/messages"
        );
        assert_eq!(
            messages_endpoint("http://127.0.0.1:9/"),
            "http://127.0.0.1:9/v1/messages"
        );
    }

    #[test]
    fn client_endpoint_comes_from_config() {
        let config = ExtractionConfig::builder()
            .api_key("k")
            .base_url("http://localhost:4010")
            .build()
            .unwrap();
        let client = AnthropicClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:4010/v1/messages");
    }

    #[test]
    fn parse_reply_reads_content_and_usage() {
        let body = json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-7-sonnet-20250219",
            "content": [
                {"type": "text", "text": "ReceiptID,Seller\n"},
                {"type": "text", "text": "42,Pizza Place\n"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 1500, "output_tokens": 80}
        });
        let reply = parse_reply(body.to_string().as_bytes()).unwrap();
        assert_eq!(reply.content.to_text(), "ReceiptID,Seller\n42,Pizza Place\n");
        assert_eq!(reply.usage.input_tokens, 1500);
        assert_eq!(reply.usage.output_tokens, 80);
        assert_eq!(reply.stop_reason.as_deref(), Some("end_turn"));
    }

    #[test]
    fn parse_reply_rejects_garbage() {
        let err = parse_reply(b"<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidResponse(_)));
    }

    #[test]
    fn api_error_prefers_service_message() {
        let body = json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        });
        let err = api_error(401, body.to_string().as_bytes());
        assert_eq!(
            err,
            ServiceError::Api {
                status: 401,
                message: "authentication_error: invalid x-api-key".into()
            }
        );
    }

    #[test]
    fn api_error_falls_back_to_raw_body() {
        assert_eq!(
            api_error(502, b"  upstream down \n"),
            ServiceError::Api {
                status: 502,
                message: "upstream down".into()
            }
        );
        assert_eq!(
            api_error(500, b""),
            ServiceError::Api {
                status: 500,
                message: "empty response body".into()
            }
        );
    }
}
