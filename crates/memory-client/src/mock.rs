//! Mock MemoryApi for tests: records calls, returns canned JSON, no network.

use memory_types::{EntityInput, MemoryApi, MemoryApiError, ObservationInput};
use serde_json::{json, Value};
use std::sync::Mutex;

/// A call observed by [`MockMemoryApi`], with the payload as it would go on
/// the wire (observation `source` already resolved).
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    AddObservation {
        entity_name: String,
        content: String,
        source: String,
    },
    CreateEntity(Value),
    GetGraph {
        entity_name: String,
    },
    SearchEntities {
        query: String,
    },
}

/// In-process stand-in for the memory service. Applies the same input
/// validation as the real client.
#[derive(Debug, Default)]
pub struct MockMemoryApi {
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl MemoryApi for MockMemoryApi {
    async fn add_observation(
        &self,
        input: &ObservationInput,
    ) -> Result<Value, MemoryApiError> {
        input.validate()?;
        self.record(RecordedCall::AddObservation {
            entity_name: input.entity_name.clone(),
            content: input.content.clone(),
            source: input.resolved_source().to_string(),
        });
        Ok(json!({"status": "ok"}))
    }

    async fn create_entity(&self, input: &EntityInput) -> Result<Value, MemoryApiError> {
        input.validate()?;
        let payload =
            serde_json::to_value(input).map_err(|e| MemoryApiError::Decode(e.to_string()))?;
        self.record(RecordedCall::CreateEntity(payload));
        Ok(json!({"status": "ok", "name": input.name}))
    }

    async fn get_graph(&self, entity_name: &str) -> Result<Value, MemoryApiError> {
        if entity_name.is_empty() {
            return Err(MemoryApiError::MissingField("entity_name"));
        }
        self.record(RecordedCall::GetGraph {
            entity_name: entity_name.to_string(),
        });
        Ok(json!({"entity": entity_name, "relations": []}))
    }

    async fn search_entities(&self, query: &str) -> Result<Value, MemoryApiError> {
        if query.is_empty() {
            return Err(MemoryApiError::MissingField("query"));
        }
        self.record(RecordedCall::SearchEntities {
            query: query.to_string(),
        });
        Ok(json!({"query": query, "results": []}))
    }
}
