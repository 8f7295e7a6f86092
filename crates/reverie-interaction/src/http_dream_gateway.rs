//! HttpDreamGateway - REST implementation of the remote gateway.
//!
//! Routes:
//! - `GET    /dreams/{user_id}`             list dreams
//! - `GET    /dreams/{user_id}/{dream_id}`  single dream
//! - `POST   /dreams`                       create and interpret
//! - `DELETE /dreams/{dream_id}`            delete
//! - `GET    /dreams/{user_id}/patterns`    pattern analysis
//! - `GET    /dreams/{dream_id}/chat`       chat history
//! - `POST   /dreams/{dream_id}/chat`       follow-up question
//! - `GET    /health`                       liveness

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use reverie_core::chat::ChatMessage;
use reverie_core::config::ClientConfig;
use reverie_core::dream::{Dream, DreamId, NewDream, PatternAnalysis};
use reverie_core::{DreamGateway, Identity, ReverieError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gateway that talks to the dream service over HTTP + JSON.
#[derive(Clone)]
pub struct HttpDreamGateway {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    dream_id: DreamId,
    message: &'a str,
}

/// FastAPI-style error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl HttpDreamGateway {
    /// Creates a gateway for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ReverieError::config(format!("Invalid API URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ReverieError::config(format!(
                "API URL '{}' cannot be used as a base",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReverieError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.api_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ReverieError::config(format!("API URL '{}' cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends the request and turns transport failures and non-2xx statuses
    /// into `RemoteUnavailable`.
    async fn dispatch(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ReverieError::remote(format!("{} timed out", what))
            } else {
                ReverieError::remote(format!("{} failed: {}", what, e))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!("{} returned {}: {}", what, status, body);
        Err(ReverieError::remote(format!(
            "{} returned {}: {}",
            what,
            status,
            error_detail(&body)
        )))
    }

    async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        let body = response
            .text()
            .await
            .map_err(|e| ReverieError::remote(format!("{} body could not be read: {}", what, e)))?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("{} returned malformed JSON: {}", what, e);
            ReverieError::from(e)
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], what: &str) -> Result<T> {
        let url = self.endpoint(segments)?;
        tracing::debug!("GET {}", url);
        let response = self.dispatch(self.client.get(url), what).await?;
        Self::decode(response, what).await
    }
}

/// Extracts the human part of an error body, falling back to the raw text.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => "no details".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl DreamGateway for HttpDreamGateway {
    async fn list_dreams(&self, identity: &Identity) -> Result<Vec<Dream>> {
        self.get_json(&["dreams", identity.as_str()], "List dreams")
            .await
    }

    async fn get_dream(&self, identity: &Identity, dream_id: DreamId) -> Result<Dream> {
        let id = dream_id.to_string();
        self.get_json(&["dreams", identity.as_str(), &id], "Get dream")
            .await
    }

    async fn create_dream(&self, request: &NewDream) -> Result<Dream> {
        let url = self.endpoint(&["dreams"])?;
        tracing::debug!("POST {}", url);
        let response = self
            .dispatch(self.client.post(url).json(request), "Create dream")
            .await?;
        Self::decode(response, "Create dream").await
    }

    async fn delete_dream(&self, dream_id: DreamId) -> Result<()> {
        let url = self.endpoint(&["dreams", &dream_id.to_string()])?;
        tracing::debug!("DELETE {}", url);
        self.dispatch(self.client.delete(url), "Delete dream")
            .await?;
        Ok(())
    }

    async fn pattern_analysis(&self, identity: &Identity) -> Result<PatternAnalysis> {
        self.get_json(&["dreams", identity.as_str(), "patterns"], "Pattern analysis")
            .await
    }

    async fn chat_history(&self, dream_id: DreamId) -> Result<Vec<ChatMessage>> {
        let id = dream_id.to_string();
        self.get_json(&["dreams", &id, "chat"], "Chat history")
            .await
    }

    async fn send_chat_message(&self, dream_id: DreamId, message: &str) -> Result<()> {
        let url = self.endpoint(&["dreams", &dream_id.to_string(), "chat"])?;
        tracing::debug!("POST {}", url);
        let body = ChatRequest { dream_id, message };
        self.dispatch(self.client.post(url).json(&body), "Send chat message")
            .await?;
        Ok(())
    }

    async fn health(&self) -> Result<()> {
        let url = self.endpoint(&["health"])?;
        self.dispatch(self.client.get(url), "Health check").await?;
        Ok(())
    }
}
