//! JSON-RPC envelope checks that gate normalization.

use serde_json::Value;

use super::error::RpcError;
use super::protocol::{RpcEnvelope, RpcId, RpcMethod, JSONRPC_VERSION};

/// Best-known id of a body that may not be a valid envelope. Runs before and
/// independently of [`validate`] so every error response can echo an id.
pub fn probe_id(raw: &Value) -> RpcId {
    raw.get("id")
        .and_then(|v| serde_json::from_value::<RpcId>(v.clone()).ok())
        .unwrap_or(RpcId::Null)
}

/// Check version, id and method; on success params are left for the normalizer.
pub fn validate(raw: &Value) -> Result<RpcEnvelope, RpcError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| RpcError::InvalidRequest("request must be a JSON object".to_string()))?;

    if obj.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err(RpcError::InvalidRequest(
            "jsonrpc must be \"2.0\"".to_string(),
        ));
    }
    let id = match obj.get("id") {
        None => return Err(RpcError::InvalidRequest("id is required".to_string())),
        Some(v) => serde_json::from_value::<RpcId>(v.clone()).map_err(|_| {
            RpcError::InvalidRequest("id must be a string, number, or null".to_string())
        })?,
    };

    let name = obj
        .get("method")
        .and_then(Value::as_str)
        .ok_or_else(|| RpcError::InvalidRequest("method must be a string".to_string()))?;
    let method = RpcMethod::parse(name).ok_or_else(|| RpcError::MethodNotFound(name.to_string()))?;

    Ok(RpcEnvelope {
        id,
        method,
        params: obj.get("params").cloned().unwrap_or(Value::Null),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2a::error::{INVALID_REQUEST, METHOD_NOT_FOUND};
    use serde_json::json;

    #[test]
    fn accepts_supported_methods() {
        let env = validate(&json!({
            "jsonrpc": "2.0", "id": "r1", "method": "message/send", "params": {}
        }))
        .unwrap();
        assert_eq!(env.id, RpcId::from("r1"));
        assert_eq!(env.method, RpcMethod::MessageSend);

        let env = validate(&json!({ "jsonrpc": "2.0", "id": 3, "method": "execute" })).unwrap();
        assert_eq!(env.method, RpcMethod::Execute);
        assert!(env.params.is_null());
    }

    #[test]
    fn null_id_is_allowed() {
        let env = validate(&json!({ "jsonrpc": "2.0", "id": null, "method": "execute" })).unwrap();
        assert_eq!(env.id, RpcId::Null);
    }

    #[test]
    fn missing_id_or_wrong_version_is_invalid_request() {
        let bodies = [
            json!({ "jsonrpc": "2.0", "method": "message/send" }),
            json!({ "jsonrpc": "1.0", "id": 1, "method": "message/send" }),
            json!({ "jsonrpc": 2.0, "id": 1, "method": "message/send" }),
            json!({ "id": 1, "method": "message/send" }),
            json!({ "jsonrpc": "2.0", "id": true, "method": "message/send" }),
            json!({ "jsonrpc": "2.0", "id": 1 }),
            json!([1, 2, 3]),
        ];
        for body in bodies {
            let err = validate(&body).unwrap_err();
            assert_eq!(err.code(), INVALID_REQUEST, "body: {}", body);
        }
    }

    #[test]
    fn version_is_checked_before_method() {
        let err = validate(&json!({ "jsonrpc": "1.0", "id": 1, "method": "nope" })).unwrap_err();
        assert_eq!(err.code(), INVALID_REQUEST);
    }

    #[test]
    fn unsupported_method_is_named() {
        let err = validate(&json!({ "jsonrpc": "2.0", "id": 9, "method": "tasks/get" })).unwrap_err();
        assert_eq!(err.code(), METHOD_NOT_FOUND);
        assert!(err.to_string().contains("tasks/get"));
    }

    #[test]
    fn probe_id_recovers_what_it_can() {
        assert_eq!(probe_id(&json!({ "id": "abc", "jsonrpc": "1.0" })), RpcId::from("abc"));
        assert_eq!(probe_id(&json!({ "id": 12 })), RpcId::from(12));
        assert_eq!(probe_id(&json!({ "id": { "nested": true } })), RpcId::Null);
        assert_eq!(probe_id(&json!({})), RpcId::Null);
        assert_eq!(probe_id(&json!("just a string")), RpcId::Null);
    }
}
