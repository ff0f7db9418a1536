//! Request payloads for the memory service endpoints.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::MemoryApiError;

/// Source tag applied to observations that do not carry one.
pub const DEFAULT_OBSERVATION_SOURCE: &str = "claude-skill";

/// Payload for POST /memory/observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationInput {
    pub entity_name: String,
    pub content: String,
    /// Falls back to [`DEFAULT_OBSERVATION_SOURCE`] when absent or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ObservationInput {
    pub fn new(entity_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            content: content.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Required fields must be present and non-empty.
    pub fn validate(&self) -> Result<(), MemoryApiError> {
        if self.entity_name.is_empty() {
            return Err(MemoryApiError::MissingField("entity_name"));
        }
        if self.content.is_empty() {
            return Err(MemoryApiError::MissingField("content"));
        }
        Ok(())
    }

    /// Source tag that actually goes on the wire.
    pub fn resolved_source(&self) -> &str {
        match self.source.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => DEFAULT_OBSERVATION_SOURCE,
        }
    }
}

/// Payload for POST /memory/entity.
///
/// Serializes back to exactly the caller's object: fields beyond `name` and
/// `type` are carried in `extra` and flattened on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityInput {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl EntityInput {
    pub fn new(name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            extra: HashMap::new(),
        }
    }

    /// Attach an extra field, passed through to the service unmodified.
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Required fields must be present and non-empty.
    pub fn validate(&self) -> Result<(), MemoryApiError> {
        if self.name.is_empty() {
            return Err(MemoryApiError::MissingField("name"));
        }
        if self.entity_type.is_empty() {
            return Err(MemoryApiError::MissingField("type"));
        }
        Ok(())
    }
}
