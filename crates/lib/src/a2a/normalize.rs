//! JSON-RPC params → canonical [`InboundEvent`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::error::RpcError;
use super::extract::extract_text;
use super::protocol::{Message, RpcEnvelope, RpcMethod};
use crate::event::InboundEvent;

/// `message/send` params: a single message, or a history whose last entry is current.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendParams {
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
}

/// Either field of `execute` params may hold one message or a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    Many(Vec<Message>),
    One(Message),
}

impl OneOrMany {
    fn into_current(self) -> Option<Message> {
        match self {
            OneOrMany::Many(list) => list.into_iter().last(),
            OneOrMany::One(m) => Some(m),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecuteParams {
    #[serde(default)]
    pub messages: Option<OneOrMany>,
    #[serde(default)]
    pub message: Option<OneOrMany>,
}

/// Params decoded once per method.
#[derive(Debug, Clone)]
pub enum RpcParams {
    MessageSend(SendParams),
    Execute(ExecuteParams),
}

/// Absent/null params decode to the empty params type.
fn decode<T: DeserializeOwned + Default>(params: &Value) -> Result<T, RpcError> {
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params.clone())
        .map_err(|e| RpcError::Internal(format!("invalid params: {}", e)))
}

impl RpcParams {
    pub fn decode(method: RpcMethod, params: &Value) -> Result<Self, RpcError> {
        Ok(match method {
            RpcMethod::MessageSend => RpcParams::MessageSend(decode(params)?),
            RpcMethod::Execute => RpcParams::Execute(decode(params)?),
        })
    }

    /// The message to extract from, per method precedence.
    pub fn into_message(self) -> Option<Message> {
        match self {
            RpcParams::MessageSend(SendParams { message, messages }) => {
                message.or_else(|| messages.and_then(|list| list.into_iter().last()))
            }
            RpcParams::Execute(ExecuteParams { messages, message }) => {
                messages.or(message).and_then(OneOrMany::into_current)
            }
        }
    }
}

/// Select the current message and extract its text. "No valid message" becomes empty text.
pub fn normalize(
    envelope: &RpcEnvelope,
    session_id: Option<String>,
) -> Result<InboundEvent, RpcError> {
    let message = RpcParams::decode(envelope.method, &envelope.params)?.into_message();
    let text = extract_text(message.as_ref()).unwrap_or_default();
    Ok(InboundEvent::message(text, session_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2a::protocol::RpcId;
    use serde_json::json;

    fn text_msg(text: &str) -> Value {
        json!({ "role": "user", "parts": [{ "kind": "text", "text": text }] })
    }

    fn envelope(method: RpcMethod, params: Value) -> RpcEnvelope {
        RpcEnvelope {
            id: RpcId::from(1),
            method,
            params,
        }
    }

    #[test]
    fn send_prefers_single_message() {
        let env = envelope(
            RpcMethod::MessageSend,
            json!({ "message": text_msg("Lagos"), "messages": [text_msg("Abuja")] }),
        );
        assert_eq!(normalize(&env, None).unwrap().text, "Lagos");
    }

    #[test]
    fn send_falls_back_to_last_of_messages() {
        let env = envelope(
            RpcMethod::MessageSend,
            json!({ "messages": [text_msg("m1"), text_msg("m2")] }),
        );
        let event = normalize(&env, Some("s".to_string())).unwrap();
        assert_eq!(event.text, "m2");
        assert_eq!(event.session_id.as_deref(), Some("s"));
    }

    #[test]
    fn send_with_nothing_yields_empty_text() {
        for params in [json!({}), json!({ "messages": [] }), Value::Null] {
            let env = envelope(RpcMethod::MessageSend, params);
            assert_eq!(normalize(&env, None).unwrap().text, "");
        }
    }

    #[test]
    fn execute_single_message_used_directly() {
        let env = envelope(RpcMethod::Execute, json!({ "message": text_msg("Kigali") }));
        let params = RpcParams::decode(env.method, &env.params).unwrap();
        match &params {
            RpcParams::Execute(ExecuteParams { message: Some(OneOrMany::One(_)), .. }) => {}
            other => panic!("expected single message, got {:?}", other),
        }
        assert_eq!(normalize(&env, None).unwrap().text, "Kigali");
    }

    #[test]
    fn execute_prefers_messages_and_takes_last() {
        let env = envelope(
            RpcMethod::Execute,
            json!({
                "messages": [text_msg("old"), text_msg("new")],
                "message": text_msg("ignored")
            }),
        );
        assert_eq!(normalize(&env, None).unwrap().text, "new");
    }

    #[test]
    fn execute_message_list_takes_last() {
        let env = envelope(
            RpcMethod::Execute,
            json!({ "message": [text_msg("a"), text_msg("b")] }),
        );
        assert_eq!(normalize(&env, None).unwrap().text, "b");
    }

    #[test]
    fn execute_messages_as_single_object() {
        let env = envelope(RpcMethod::Execute, json!({ "messages": text_msg("Nairobi") }));
        assert_eq!(normalize(&env, None).unwrap().text, "Nairobi");
    }

    #[test]
    fn malformed_parts_do_not_hide_valid_text() {
        let env = envelope(
            RpcMethod::MessageSend,
            json!({ "message": {
                "role": "user",
                "parts": [{ "kind": "text" }, { "kind": "text", "text": "Lagos" }]
            }}),
        );
        assert_eq!(normalize(&env, None).unwrap().text, "Lagos");

        let env = envelope(
            RpcMethod::Execute,
            json!({ "messages": [{ "role": null, "parts": null }] }),
        );
        assert_eq!(normalize(&env, None).unwrap().text, "");
    }

    #[test]
    fn undecodable_params_are_internal() {
        let env = envelope(RpcMethod::MessageSend, json!({ "message": "just a string" }));
        let err = normalize(&env, None).unwrap_err();
        assert!(matches!(err, RpcError::Internal(_)));
    }
}
