//! Streaming client for OpenAI-compatible chat completion APIs.
//!
//! Requests are sent with `stream: true`; the SSE response body is parsed on
//! a background task and decoded events are handed back through a channel,
//! so the UI can render deltas as they arrive.

use dioxus::logger::tracing::warn;
use futures::StreamExt as _;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

pub struct LlmClient {
    api_url: String,
    api_key: String,
    http: reqwest::Client,
}

/// --- REQUEST SIDE ---

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        content: String,
    },
    User {
        content: Vec<ContentPart>,
    },
    Assistant {
        content: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// --- STREAMING RESPONSE SIDE ---

#[derive(Debug, Deserialize)]
pub struct StreamEvent {
    pub id: Option<String>,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub delta: Delta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Delta {
    pub role: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ModelEntry {
    pub id: String,
}

impl LlmClient {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            api_url,
            api_key,
            http: reqwest::Client::new(),
        }
    }

    /// Lists the models the provider exposes.
    pub async fn models(&self) -> anyhow::Result<ModelsResponse> {
        let mut req = self.http.get(format!("{}/models", self.api_url));
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }
        let res = req.send().await?;
        anyhow::ensure!(
            res.status().is_success(),
            "model listing failed: {}",
            res.status()
        );
        Ok(res.json().await?)
    }

    /// Starts a streaming completion and returns a channel of decoded events.
    ///
    /// The channel closes when the provider sends `[DONE]`, the connection
    /// drops, or the receiver is dropped (which cancels the request).
    pub async fn stream(
        &self,
        model: &str,
        messages: &[Message],
    ) -> anyhow::Result<mpsc::UnboundedReceiver<StreamEvent>> {
        let res = self
            .http
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "model": model,
                "stream": true,
                "messages": messages,
            }))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            anyhow::bail!("chat request failed: {status} - {body}");
        }

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut stream = res.bytes_stream();
            let mut buf = SseBuffer::default();
            'read: while let Some(item) = stream.next().await {
                let chunk = match item {
                    Ok(c) => c,
                    Err(e) => {
                        warn!("response stream ended early: {e:?}");
                        break;
                    }
                };
                for data in buf.push(&String::from_utf8_lossy(&chunk)) {
                    if data == "[DONE]" {
                        break 'read;
                    }
                    match serde_json::from_str::<StreamEvent>(&data) {
                        Ok(event) => {
                            if tx.send(event).is_err() {
                                break 'read;
                            }
                        }
                        Err(e) => warn!("skipping malformed stream event: {e:?}"),
                    }
                }
            }
        });

        Ok(rx)
    }
}

/// Reassembles SSE `data:` payloads from chunks that may split lines.
#[derive(Debug, Default)]
pub struct SseBuffer {
    partial: String,
}

impl SseBuffer {
    /// Feeds a chunk and returns every complete `data:` payload it finished.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.partial.push_str(chunk);
        let mut out = Vec::new();
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(data) = line.strip_prefix("data:") {
                out.push(data.trim_start().to_string());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payloads_split_across_chunks_are_reassembled() {
        let mut buf = SseBuffer::default();
        assert!(buf.push("data: {\"id\":").is_empty());
        let out = buf.push("\"a\"}\n");
        assert_eq!(out, vec!["{\"id\":\"a\"}".to_string()]);
    }

    #[test]
    fn multiple_lines_in_one_chunk() {
        let mut buf = SseBuffer::default();
        let out = buf.push("data: one\n\ndata: two\ndata: [DONE]\n");
        assert_eq!(out, vec!["one", "two", "[DONE]"]);
    }

    #[test]
    fn crlf_and_non_data_lines_are_ignored() {
        let mut buf = SseBuffer::default();
        let out = buf.push(": keepalive\r\nevent: ping\r\ndata: x\r\n");
        assert_eq!(out, vec!["x"]);
    }

    #[test]
    fn trailing_partial_line_is_held_back() {
        let mut buf = SseBuffer::default();
        assert!(buf.push("data: not finished yet").is_empty());
        assert_eq!(buf.push("\n"), vec!["not finished yet"]);
    }
}
