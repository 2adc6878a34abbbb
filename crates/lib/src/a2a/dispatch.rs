//! Request orchestration: validate → normalize → handler → assemble.
//!
//! JSON-RPC callers always get a well-formed response: validation failures
//! are 400s that never reach the handler, handler failures are folded into a
//! completed task with an explanatory summary, and anything else is a 500
//! `InternalError` carrying the best id recovered from the raw body.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::Value;

use super::assemble::{assemble, event_reply};
use super::error::RpcError;
use super::normalize::normalize;
use super::protocol::{RpcEnvelope, RpcId, RpcResponse};
use super::validate::{probe_id, validate};
use crate::event::{EventReply, InboundEvent};
use crate::handler::{Handler, HandlerError, HandlerResult};

/// Response body plus the HTTP status it should go out with.
#[derive(Debug, Clone)]
pub struct RpcReply {
    pub status: StatusCode,
    pub body: RpcResponse,
}

impl RpcReply {
    fn error(err: RpcError, id: RpcId) -> Self {
        Self {
            status: err.http_status(),
            body: err.into_response(id),
        }
    }
}

/// Summary used in place of the handler's when it fails on the JSON-RPC path.
pub fn degraded_summary(err: &HandlerError) -> String {
    format!("Error processing request: {}", err)
}

#[derive(Clone)]
pub struct Dispatcher {
    handler: Arc<dyn Handler>,
}

impl Dispatcher {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    /// Handle one JSON-RPC request body.
    pub async fn handle_rpc(&self, body: &[u8], session_id: Option<String>) -> RpcReply {
        let raw: Value = match serde_json::from_slice(body) {
            Ok(v) => v,
            Err(e) => return RpcReply::error(RpcError::Parse(e.to_string()), RpcId::Null),
        };
        let known_id = probe_id(&raw);

        let envelope = match validate(&raw) {
            Ok(env) => env,
            Err(e) => {
                log::debug!("a2a: rejected request: {}", e);
                return RpcReply::error(e, known_id);
            }
        };

        match self.run_rpc(&envelope, session_id).await {
            Ok(body) => RpcReply {
                status: StatusCode::OK,
                body,
            },
            Err(e) => {
                log::warn!("a2a: {} failed: {}", envelope.method.as_str(), e);
                let e = match e {
                    RpcError::Internal(_) => e,
                    other => RpcError::Internal(other.to_string()),
                };
                RpcReply::error(e, known_id)
            }
        }
    }

    async fn run_rpc(
        &self,
        envelope: &RpcEnvelope,
        session_id: Option<String>,
    ) -> Result<RpcResponse, RpcError> {
        let event = normalize(envelope, session_id)?;
        log::info!(
            "a2a: {} | session={} | text='{}'",
            envelope.method.as_str(),
            event.session_id.as_deref().unwrap_or("-"),
            event.text
        );
        let result = match self.call_handler(&event).await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("a2a: handler failed, replying with degraded summary: {}", e);
                HandlerResult::summary(degraded_summary(&e))
            }
        };
        Ok(assemble(&result, envelope.id.clone()))
    }

    /// Handle one webhook body or socket frame. Handler failures propagate.
    pub async fn handle_event(&self, event: InboundEvent) -> Result<EventReply, HandlerError> {
        log::info!(
            "event received | session={} | text='{}'",
            event.session_id.as_deref().unwrap_or("-"),
            event.text
        );
        let result = self.call_handler(&event).await?;
        Ok(event_reply(result))
    }

    async fn call_handler(&self, event: &InboundEvent) -> Result<HandlerResult, HandlerError> {
        self.handler
            .process(&event.text, event.session_id.as_deref())
            .await
    }
}
