//! Typed HTTP client for the tracker API
//!
//! One method per endpoint; server error bodies are surfaced with their
//! status so the CLI can tell "not found" from "server down". Nothing is
//! retried.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use ureq::Agent;

use crate::api::types::{
    AppendHistoryBody, CreateStreamerBody, DeleteResponse, ErrorBody, HistoryRowResponse,
    StreamerMetaResponse, StreamerResponse, UpdateStreamerBody,
};
use crate::services::StreamerStats;

use super::ClientError;

/// HTTP 请求超时时间
const HTTP_TIMEOUT_SECS: u64 = 10;

pub struct ApiClient {
    agent: Agent,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:8080/api`
    pub fn new(base_url: &str) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            // Error bodies carry the server's message; read them ourselves
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config() -> Self {
        Self::new(&crate::config::get_config().client.api_base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn read_response<T: DeserializeOwned>(
        mut resp: ureq::http::Response<ureq::Body>,
    ) -> Result<T, ClientError> {
        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let message = resp
                .body_mut()
                .read_json::<ErrorBody>()
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            return Err(ClientError::Server { status, message });
        }

        resp.body_mut()
            .read_json::<T>()
            .map_err(|e| ClientError::Transport(format!("Invalid response body: {}", e)))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .agent
            .get(self.url(path))
            .call()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Self::read_response(resp)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .agent
            .post(self.url(path))
            .send_json(body)
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Self::read_response(resp)
    }

    fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .agent
            .put(self.url(path))
            .send_json(body)
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Self::read_response(resp)
    }

    // ============ Endpoints ============

    /// `GET /streamers`
    pub fn list_streamers(&self) -> Result<Vec<StreamerResponse>, ClientError> {
        self.get_json("/streamers")
    }

    /// `GET /streamers/{id}`
    pub fn get_streamer(&self, id: &str) -> Result<StreamerResponse, ClientError> {
        self.get_json(&format!("/streamers/{}", id))
    }

    /// `POST /streamers`
    pub fn create_streamer(
        &self,
        name: &str,
        platform: &str,
        initial_count: i64,
    ) -> Result<StreamerResponse, ClientError> {
        self.post_json(
            "/streamers",
            &CreateStreamerBody {
                name: name.to_string(),
                platform: platform.to_string(),
                initial_count,
            },
        )
    }

    /// `PUT /streamers/{id}`
    pub fn update_streamer(
        &self,
        id: &str,
        name: &str,
        platform: &str,
    ) -> Result<StreamerMetaResponse, ClientError> {
        self.put_json(
            &format!("/streamers/{}", id),
            &UpdateStreamerBody {
                name: name.to_string(),
                platform: platform.to_string(),
            },
        )
    }

    /// `DELETE /streamers/{id}`
    pub fn delete_streamer(&self, id: &str) -> Result<DeleteResponse, ClientError> {
        let resp = self
            .agent
            .delete(self.url(&format!("/streamers/{}", id)))
            .call()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Self::read_response(resp)
    }

    /// `POST /streamers/{id}/subscribers`
    pub fn append_history(
        &self,
        id: &str,
        count: i64,
        timestamp: i64,
    ) -> Result<HistoryRowResponse, ClientError> {
        self.post_json(
            &format!("/streamers/{}/subscribers", id),
            &AppendHistoryBody { count, timestamp },
        )
    }

    /// `GET /streamers/{id}/stats`
    pub fn streamer_stats(&self, id: &str) -> Result<StreamerStats, ClientError> {
        self.get_json(&format!("/streamers/{}/stats", id))
    }

    /// `GET /health`
    pub fn health(&self) -> Result<serde_json::Value, ClientError> {
        self.get_json("/health")
    }
}
