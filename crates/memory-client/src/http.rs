//! reqwest-backed implementation of [`MemoryApi`].

use memory_types::{EntityInput, MemoryApi, MemoryApiError, ObservationInput};
use reqwest::{Method, Url};

/// Address the memory service listens on by default.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3721";

/// Client for the memory service HTTP API.
///
/// Cloning is cheap: the underlying reqwest client is reference-counted.
#[derive(Debug, Clone)]
pub struct MemoryClient {
    client: reqwest::Client,
    base_url: Url,
}

impl MemoryClient {
    /// Client for a specific base address, e.g. `http://localhost:3721`.
    pub fn with_base_url(base_url: &str) -> Result<Self, MemoryApiError> {
        let base_url = Url::parse(base_url).map_err(|e| MemoryApiError::Url(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(MemoryApiError::Url(format!(
                "{base_url} cannot carry a path"
            )));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Base address from `MEMORY_API_URL`, falling back to the local default.
    pub fn from_env() -> Result<Self, MemoryApiError> {
        let url =
            std::env::var("MEMORY_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(&url)
    }

    /// Base URL with the given path segments appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot-be-a-base URLs are rejected at construction
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// One HTTP exchange: optional JSON body out, parsed JSON value back.
    ///
    /// Non-2xx responses become [`MemoryApiError::Status`] carrying the
    /// status code and raw body text. No retries, no timeout handling.
    async fn request<B>(
        &self,
        url: Url,
        method: Method,
        body: Option<&B>,
    ) -> Result<serde_json::Value, MemoryApiError>
    where
        B: serde::Serialize + Sync + ?Sized,
    {
        tracing::debug!(%method, %url, "memory API request");
        let mut req = self
            .client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            req = req.json(body);
        }
        let res = req
            .send()
            .await
            .map_err(|e| MemoryApiError::Transport(e.to_string()))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| MemoryApiError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(MemoryApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text).map_err(|e| MemoryApiError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl MemoryApi for MemoryClient {
    async fn add_observation(
        &self,
        input: &ObservationInput,
    ) -> Result<serde_json::Value, MemoryApiError> {
        input.validate()?;
        let payload = serde_json::json!({
            "entity_name": input.entity_name,
            "content": input.content,
            "source": input.resolved_source(),
        });
        self.request(
            self.endpoint(&["memory", "observation"]),
            Method::POST,
            Some(&payload),
        )
        .await
    }

    async fn create_entity(
        &self,
        input: &EntityInput,
    ) -> Result<serde_json::Value, MemoryApiError> {
        input.validate()?;
        self.request(self.endpoint(&["memory", "entity"]), Method::POST, Some(input))
            .await
    }

    async fn get_graph(&self, entity_name: &str) -> Result<serde_json::Value, MemoryApiError> {
        if entity_name.is_empty() {
            return Err(MemoryApiError::MissingField("entity_name"));
        }
        self.request::<serde_json::Value>(
            self.endpoint(&["memory", "graph", entity_name]),
            Method::GET,
            None,
        )
        .await
    }

    async fn search_entities(&self, query: &str) -> Result<serde_json::Value, MemoryApiError> {
        if query.is_empty() {
            return Err(MemoryApiError::MissingField("query"));
        }
        let mut url = self.endpoint(&["memory", "search"]);
        url.query_pairs_mut().append_pair("q", query);
        self.request::<serde_json::Value>(url, Method::GET, None)
            .await
    }
}
