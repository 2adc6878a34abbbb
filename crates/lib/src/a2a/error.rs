//! JSON-RPC failures and their wire codes / HTTP statuses.

use axum::http::StatusCode;
use serde_json::json;

use super::protocol::{RpcErrorObject, RpcId, RpcResponse};

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RpcError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid Request: {0}")]
    InvalidRequest(String),
    #[error("Method not found: {0}")]
    MethodNotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RpcError {
    pub fn code(&self) -> i32 {
        match self {
            RpcError::Parse(_) => PARSE_ERROR,
            RpcError::InvalidRequest(_) => INVALID_REQUEST,
            RpcError::MethodNotFound(_) => METHOD_NOT_FOUND,
            RpcError::Internal(_) => INTERNAL_ERROR,
        }
    }

    /// Request/method problems are the caller's fault (400); the rest are ours (500).
    pub fn http_status(&self) -> StatusCode {
        match self {
            RpcError::Parse(_) | RpcError::InvalidRequest(_) | RpcError::MethodNotFound(_) => {
                StatusCode::BAD_REQUEST
            }
            RpcError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_object(&self) -> RpcErrorObject {
        let data = match self {
            RpcError::Internal(details) => Some(json!({ "details": details })),
            _ => None,
        };
        let message = match self {
            RpcError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        };
        RpcErrorObject {
            code: self.code(),
            message,
            data,
        }
    }

    pub fn into_response(self, id: RpcId) -> RpcResponse {
        RpcResponse::err(id, self.to_object())
    }
}
