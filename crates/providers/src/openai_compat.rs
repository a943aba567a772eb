//! OpenAI-compatible provider implementation.
//!
//! Works with: Groq, OpenAI, OpenRouter, Ollama, vLLM, Together AI, and any
//! endpoint exposing `/v1/chat/completions`.
//!
//! Supports:
//! - Chat completions (non-streaming and streaming SSE)
//! - JSON mode (`response_format: {"type": "json_object"}`)
//! - Health checks via `/models`

use std::time::Duration;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};
use voyager_core::error::ProviderError;
use voyager_core::message::Turn;
use voyager_core::provider::*;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client")
}

/// Timeouts get their own variant; everything else is a network error.
fn request_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else {
        ProviderError::Network(e.to_string())
    }
}

/// An OpenAI-compatible LLM provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: http_client(DEFAULT_TIMEOUT),
        }
    }

    /// Replace the per-request timeout (default 120 s).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }

    /// Create a Groq provider (convenience constructor).
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self::new("groq", "https://api.groq.com/openai/v1", api_key)
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    /// Create an Ollama provider (convenience constructor).
    pub fn ollama(base_url: Option<&str>) -> Self {
        Self::new(
            "ollama",
            base_url.unwrap_or("http://localhost:11434/v1"),
            "ollama", // Ollama doesn't need a real key
        )
    }

    /// Convert turns to the chat-completions message format.
    fn to_api_messages(messages: &[Turn]) -> Vec<serde_json::Value> {
        messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": m.role.as_str(),
                    "content": m.content,
                })
            })
            .collect()
    }

    /// Build the request body shared by `complete` and `stream`.
    fn build_body(request: &ProviderRequest, stream: bool) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.temperature,
            "stream": stream,
        });

        if stream {
            body["stream_options"] = serde_json::json!({ "include_usage": true });
        }

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if request.response_format == ResponseFormat::JsonObject {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        body
    }

    /// Map non-200 statuses to provider errors.
    async fn check_status(
        response: reqwest::Response,
        context: &str,
    ) -> std::result::Result<reqwest::Response, ProviderError> {
        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status == 404 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ModelNotFound(error_body));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "{context}");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl voyager_core::Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::build_body(&request, false);

        debug!(
            provider = %self.name,
            model = %request.model,
            json_mode = request.response_format == ResponseFormat::JsonObject,
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let response = Self::check_status(response, "Provider returned error").await?;

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice =
            api_response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::ApiError {
                    status_code: 200,
                    message: "No choices in response".into(),
                })?;

        let usage = api_response.usage.map(Usage::from);

        Ok(ProviderResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
            model: api_response.model,
        })
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(request_error)?;

        Ok(response.status().is_success())
    }

    async fn stream(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ChunkReceiver, ProviderError> {
        // JSON mode is answered whole
        if request.response_format == ResponseFormat::JsonObject {
            let response = self.complete(request).await?;
            let (tx, rx) = mpsc::channel(1);
            let _ = tx
                .send(Ok(StreamChunk {
                    content: Some(response.content),
                    done: true,
                    usage: response.usage,
                }))
                .await;
            return Ok(rx);
        }

        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::build_body(&request, true);

        debug!(provider = %self.name, model = %request.model, "Sending streaming request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let response = Self::check_status(response, "Provider streaming error").await?;

        let (tx, rx) = mpsc::channel(64);
        let provider_name = self.name.clone();

        let body = response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| match request_error(e) {
                ProviderError::Network(reason) => ProviderError::StreamInterrupted(reason),
                other => other,
            })
        });
        tokio::spawn(pump_sse(body, tx, provider_name));

        Ok(rx)
    }
}

fn final_chunk(usage: Option<Usage>) -> StreamChunk {
    StreamChunk {
        content: None,
        done: true,
        usage,
    }
}

/// Read an SSE body and forward its chunks until `[DONE]` or the usage chunk.
///
/// A body that ends before either marker is reported as interrupted, so a
/// partial answer never looks finished.
async fn pump_sse<S, B>(
    mut byte_stream: S,
    tx: mpsc::Sender<std::result::Result<StreamChunk, ProviderError>>,
    provider_name: String,
) where
    S: Stream<Item = std::result::Result<B, ProviderError>> + Unpin,
    B: AsRef<[u8]>,
{
    let mut buffer = SseBuffer::default();

    while let Some(chunk_result) = byte_stream.next().await {
        let bytes = match chunk_result {
            Ok(b) => b,
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                return;
            }
        };

        buffer.push(bytes.as_ref());

        while let Some(event) = buffer.next_event() {
            match event {
                SseEvent::Done => {
                    let _ = tx.send(Ok(final_chunk(None))).await;
                    return;
                }
                SseEvent::Data(data) => match serde_json::from_str::<StreamResponse>(&data) {
                    Ok(stream_resp) => {
                        if let Some(choice) = stream_resp.choices.first()
                            && let Some(content) = &choice.delta.content
                            && !content.is_empty()
                        {
                            let chunk = StreamChunk {
                                content: Some(content.clone()),
                                done: false,
                                usage: None,
                            };
                            if tx.send(Ok(chunk)).await.is_err() {
                                return; // receiver dropped
                            }
                        }

                        // Usage arrives in the last chunk (stream_options)
                        if let Some(usage) = stream_resp.usage {
                            let _ = tx.send(Ok(final_chunk(Some(usage.into())))).await;
                            return;
                        }
                    }
                    Err(e) => {
                        trace!(
                            provider = %provider_name,
                            data = %data,
                            error = %e,
                            "Ignoring unparseable SSE chunk"
                        );
                    }
                },
            }
        }
    }

    warn!(provider = %provider_name, "Stream ended without [DONE]");
    let _ = tx
        .send(Err(ProviderError::StreamInterrupted(
            "stream ended without [DONE]".into(),
        )))
        .await;
}

// --- SSE line handling ---

/// One meaningful SSE line.
#[derive(Debug, PartialEq, Eq)]
enum SseEvent {
    Data(String),
    Done,
}

/// Accumulates raw bytes and yields complete `data:` lines.
///
/// Bytes are only decoded once a full line is buffered, so a UTF-8
/// character split across network reads stays intact.
#[derive(Default)]
struct SseBuffer {
    buffer: Vec<u8>,
}

impl SseBuffer {
    fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Next complete event, skipping blank lines, comments, and other fields.
    fn next_event(&mut self) -> Option<SseEvent> {
        while let Some(line_end) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=line_end).collect();
            let line = match String::from_utf8(raw) {
                Ok(line) => line,
                Err(e) => {
                    trace!(error = %e, "Skipping non-UTF-8 SSE line");
                    continue;
                }
            };
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            if let Some(data) = line.strip_prefix("data:") {
                let data = data.trim();
                if data == "[DONE]" {
                    return Some(SseEvent::Done);
                }
                return Some(SseEvent::Data(data.to_string()));
            }
        }
        None
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl From<ApiUsage> for Usage {
    fn from(u: ApiUsage) -> Self {
        Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }
    }
}

// --- Streaming SSE types ---

/// A single SSE `data: {...}` chunk from a streaming response.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
    #[serde(default)]
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}
