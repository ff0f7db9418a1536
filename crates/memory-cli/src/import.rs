//! Conversation export import.
//!
//! Replays Claude/ChatGPT conversation exports into the memory service: each
//! conversation becomes an entity of type `conversation`, each message an
//! observation attached to it. Two export shapes are recognized:
//!
//! - mapping exports: `{"title", "mapping": {node_id: {"message": ...}}}`
//!   where text lives in `message.content.parts`; tagged source `claude`;
//! - chat_messages exports: `{"name", "chat_messages": [...]}` where each
//!   message's `message`/`content` may be a string, a `{parts}`/`{text}`
//!   object, or a list, and a null or empty `message` falls through to
//!   `content`; tagged source `chatgpt`.
//!
//! Conversations in neither shape are skipped; blank message texts are
//! dropped.

use memory_types::{EntityInput, MemoryApi, MemoryApiError, ObservationInput};
use serde_json::Value;

/// One message extracted from an export.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedMessage {
    pub role: String,
    pub content: String,
}

/// One conversation extracted from an export.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedConversation {
    pub title: String,
    /// Export flavor tag, used as the observation source.
    pub source: String,
    pub messages: Vec<ImportedMessage>,
}

/// Result of parsing an export file.
#[derive(Debug, Default)]
pub struct ParsedExport {
    pub conversations: Vec<ImportedConversation>,
    /// Array entries in neither recognized shape.
    pub skipped: usize,
}

/// Totals after replaying an export into the service.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportReport {
    pub conversations: usize,
    pub observations: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("export must be a JSON array of conversations")]
    NotAnArray,
    #[error(transparent)]
    Api(#[from] MemoryApiError),
}

/// Parse an export document (a JSON array of conversations).
pub fn parse_export(doc: &Value) -> Result<ParsedExport, ImportError> {
    let entries = doc.as_array().ok_or(ImportError::NotAnArray)?;
    let mut parsed = ParsedExport::default();
    for entry in entries {
        if let Some(conv) = parse_conversation(entry) {
            parsed.conversations.push(conv);
        } else {
            parsed.skipped += 1;
        }
    }
    Ok(parsed)
}

/// Replay parsed conversations through the API.
pub async fn run_import(
    api: &dyn MemoryApi,
    conversations: &[ImportedConversation],
) -> Result<ImportReport, MemoryApiError> {
    let mut report = ImportReport::default();
    for conv in conversations {
        let entity = EntityInput::new(&conv.title, "conversation")
            .with_field("source", Value::String(conv.source.clone()));
        api.create_entity(&entity).await?;
        report.conversations += 1;
        for msg in &conv.messages {
            let obs = ObservationInput::new(
                &conv.title,
                format!("{}: {}", msg.role, msg.content),
            )
            .with_source(&conv.source);
            api.add_observation(&obs).await?;
            report.observations += 1;
        }
        tracing::debug!(title = %conv.title, messages = conv.messages.len(), "imported conversation");
    }
    Ok(report)
}

fn parse_conversation(conv: &Value) -> Option<ImportedConversation> {
    if conv.get("mapping").is_some() {
        parse_mapping_conversation(conv)
    } else if conv.get("chat_messages").is_some() {
        parse_chat_messages_conversation(conv)
    } else {
        None
    }
}

fn title_or_untitled(v: Option<&Value>) -> String {
    match v.and_then(Value::as_str) {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => "Untitled".to_string(),
    }
}

fn parse_mapping_conversation(conv: &Value) -> Option<ImportedConversation> {
    let mapping = conv.get("mapping")?.as_object()?;
    let title = title_or_untitled(conv.get("title"));
    let mut messages = Vec::new();
    for node in mapping.values() {
        let Some(message) = node.get("message") else {
            continue;
        };
        let Some(content) = message.get("content") else {
            continue;
        };
        if content.get("content_type").and_then(Value::as_str) != Some("text") {
            continue;
        }
        let Some(parts) = content.get("parts") else {
            continue;
        };
        let text = match parts {
            Value::Array(items) => items
                .iter()
                .map(value_as_text)
                .collect::<Vec<_>>()
                .join("\n"),
            other => value_as_text(other),
        };
        if text.trim().is_empty() {
            continue;
        }
        let role = message
            .pointer("/author/role")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        messages.push(ImportedMessage {
            role,
            content: text,
        });
    }
    Some(ImportedConversation {
        title,
        source: "claude".to_string(),
        messages,
    })
}

fn parse_chat_messages_conversation(conv: &Value) -> Option<ImportedConversation> {
    let chat_messages = conv.get("chat_messages")?.as_array()?;
    let title = title_or_untitled(conv.get("name"));
    let mut messages = Vec::new();
    for msg in chat_messages {
        // a null or empty `message` falls through to `content`
        let content = msg
            .get("message")
            .filter(|v| !is_blank(v))
            .or_else(|| msg.get("content"));
        let text = match content {
            Some(Value::Object(obj)) => match (obj.get("parts"), obj.get("text")) {
                (Some(Value::Array(items)), _) => items
                    .iter()
                    .map(value_as_text)
                    .collect::<Vec<_>>()
                    .join("\n"),
                (Some(other), _) => value_as_text(other),
                (None, Some(text)) => value_as_text(text),
                (None, None) => Value::Object(obj.clone()).to_string(),
            },
            Some(Value::Array(items)) => items
                .iter()
                .map(value_as_text)
                .collect::<Vec<_>>()
                .join("\n"),
            Some(Value::Null) | None => String::new(),
            Some(other) => value_as_text(other),
        };
        if text.trim().is_empty() {
            continue;
        }
        let role = msg
            .get("role")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        messages.push(ImportedMessage {
            role,
            content: text,
        });
    }
    Some(ImportedConversation {
        title,
        source: "chatgpt".to_string(),
        messages,
    })
}

/// Null, empty strings, and empty containers count as absent content.
fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(obj) => obj.is_empty(),
        _ => false,
    }
}

/// String content verbatim; anything else via its JSON rendering.
fn value_as_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
