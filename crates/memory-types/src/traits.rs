//! MemoryApi trait and error type.

use crate::{EntityInput, ObservationInput};
use async_trait::async_trait;

/// Client-side view of the memory service endpoints.
///
/// Every call is one self-contained request; implementations hold no shared
/// mutable state, so concurrent callers need no coordination.
#[async_trait]
pub trait MemoryApi: Send + Sync {
    /// POST /memory/observation.
    async fn add_observation(
        &self,
        input: &ObservationInput,
    ) -> Result<serde_json::Value, MemoryApiError>;

    /// POST /memory/entity.
    async fn create_entity(
        &self,
        input: &EntityInput,
    ) -> Result<serde_json::Value, MemoryApiError>;

    /// GET /memory/graph/{entity_name}.
    async fn get_graph(&self, entity_name: &str) -> Result<serde_json::Value, MemoryApiError>;

    /// GET /memory/search?q={query}.
    async fn search_entities(&self, query: &str) -> Result<serde_json::Value, MemoryApiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MemoryApiError {
    /// Required input field absent or empty; raised before any network call.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// Non-2xx response, carrying the status code and raw body text.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid JSON response: {0}")]
    Decode(String),
    #[error("invalid base URL: {0}")]
    Url(String),
}
