//! REST client for the ComfyUI job-submission endpoint.
//!
//! Wraps the single `/prompt` call this service needs using [`reqwest`].
//! A non-success response is terminal -- there is no retry.

use serde::Deserialize;
use v2v_core::error::GenerationError;

/// HTTP client for a single ComfyUI instance.
pub struct ComfyUIClient {
    client: reqwest::Client,
    api_url: String,
}

/// Response returned by the ComfyUI `/prompt` endpoint after
/// successfully queuing a workflow.
#[derive(Debug, Deserialize)]
pub struct QueueResponse {
    /// Server-assigned identifier for the queued prompt.
    pub prompt_id: String,
    /// Position in the execution queue.
    #[serde(default)]
    pub number: i32,
}

/// Errors from the ComfyUI REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ComfyUIClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// ComfyUI returned a non-2xx status code.
    #[error("ComfyUI API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl From<ComfyUIClientError> for GenerationError {
    fn from(err: ComfyUIClientError) -> Self {
        GenerationError::Submission(err.to_string())
    }
}

impl ComfyUIClient {
    /// Create a new client for a ComfyUI instance.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:8188`.
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    /// Base HTTP API URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Submit a workflow for execution.
    ///
    /// Sends a `POST /prompt` request with the given workflow JSON and
    /// client ID.  Returns the server-assigned `prompt_id` and queue
    /// position.
    pub async fn queue_prompt(
        &self,
        workflow: &serde_json::Value,
        client_id: &str,
    ) -> Result<QueueResponse, ComfyUIClientError> {
        let body = serde_json::json!({
            "prompt": workflow,
            "client_id": client_id,
        });

        let response = self
            .client
            .post(format!("{}/prompt", self.api_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ComfyUIClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<QueueResponse>().await?)
    }
}
