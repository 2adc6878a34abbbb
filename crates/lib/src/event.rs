//! Canonical inbound event and the plain webhook/socket frame shapes.
//!
//! Webhook bodies and socket frames are `{ "type", "data": { "text", .. } }` and
//! need no part extraction; JSON-RPC requests reach the same [`InboundEvent`]
//! through the normalizer.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::handler::HandlerResult;

/// Session id used when neither the request nor the connection supplies one.
pub const DEFAULT_SESSION_ID: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Message,
}

/// One request, independent of the protocol it arrived on. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub kind: EventKind,
    /// May be empty when the caller sent nothing usable.
    pub text: String,
    pub session_id: Option<String>,
}

impl InboundEvent {
    pub fn message(text: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            kind: EventKind::Message,
            text: text.into(),
            session_id,
        }
    }

    /// Accept a webhook/socket event as-is; there are no nested parts to resolve.
    pub fn from_webhook(event: WebhookEvent, session_id: String) -> Self {
        Self::message(event.data.text, Some(session_id))
    }
}

/// Webhook body / socket frame: `{ "type": "message", "data": { "text": .. } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub typ: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEventData {
    pub text: String,
    /// Extra caller fields are accepted and ignored.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reply on the webhook/socket path: the handler's result, unwrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventReply {
    #[serde(rename = "type")]
    pub typ: String,
    pub data: HandlerResult,
}

impl EventReply {
    pub fn message(data: HandlerResult) -> Self {
        Self {
            typ: "message".to_string(),
            data,
        }
    }
}

/// `{ "type": "error", "data": { "message" } }` for webhook failures and socket frames.
pub fn error_frame(message: impl Into<String>) -> Value {
    json!({ "type": "error", "data": { "message": message.into() } })
}

/// First frame on a new socket connection.
pub fn status_frame(message: &str, session_id: &str) -> Value {
    json!({ "type": "status", "data": { "message": message, "session_id": session_id } })
}

/// Session id the caller named: query value, then header. Blank values are skipped.
pub fn explicit_session_id(query: Option<&str>, header: Option<&str>) -> Option<String> {
    [query, header]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Session id precedence: explicit query value, then header, then the
/// per-connection id, then [`DEFAULT_SESSION_ID`]. Blank values are skipped.
pub fn resolve_session_id(
    query: Option<&str>,
    header: Option<&str>,
    connection: Option<&str>,
) -> String {
    explicit_session_id(query, header)
        .or_else(|| explicit_session_id(connection, None))
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string())
}
