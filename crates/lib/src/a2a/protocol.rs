//! A2A wire types (JSON-RPC 2.0 envelope, messages, parts, task result).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request id: string, number, or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(serde_json::Number),
    String(String),
    #[default]
    Null,
}

impl From<&str> for RpcId {
    fn from(s: &str) -> Self {
        RpcId::String(s.to_string())
    }
}

impl From<i64> for RpcId {
    fn from(n: i64) -> Self {
        RpcId::Number(n.into())
    }
}

/// Methods this agent answers. Anything else is `MethodNotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcMethod {
    MessageSend,
    Execute,
}

impl RpcMethod {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "message/send" => Some(RpcMethod::MessageSend),
            "execute" => Some(RpcMethod::Execute),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RpcMethod::MessageSend => "message/send",
            RpcMethod::Execute => "execute",
        }
    }
}

/// Validated request envelope. `params` is decoded per method by the normalizer.
#[derive(Debug, Clone)]
pub struct RpcEnvelope {
    pub id: RpcId,
    pub method: RpcMethod,
    pub params: Value,
}

/// One typed fragment of a message, tagged on `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text {
        #[serde(default, deserialize_with = "null_as_default")]
        text: String,
    },
    /// Data list; entries are loosely typed and only their `text` field is read.
    Data {
        #[serde(default)]
        data: Value,
    },
    /// File parts and future kinds; carried but never extracted.
    #[serde(other)]
    Other,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }
}

/// Missing and `null` both decode to the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn message_kind() -> String {
    "message".to_string()
}

/// A2A message: role plus ordered parts. Later parts win during extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default = "message_kind")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl Message {
    pub fn new(role: impl Into<String>, parts: Vec<Part>) -> Self {
        Self {
            kind: message_kind(),
            role: role.into(),
            parts,
            message_id: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new("user", vec![Part::text(text)])
    }

    /// Agent reply with a single text part and a fresh message id.
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            message_id: Some(uuid::Uuid::new_v4().to_string()),
            ..Self::new("agent", vec![Part::text(text)])
        }
    }
}

/// A2A task lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    Completed,
    Canceled,
    Failed,
    Rejected,
    AuthRequired,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    pub message: Message,
    /// RFC 3339 time the status was produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

fn task_kind() -> String {
    "task".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    #[serde(default = "task_kind")]
    pub kind: String,
    pub id: String,
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub artifacts: Vec<Value>,
    #[serde(default)]
    pub history: Vec<Message>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Either `result` or `error`, flattened into the response object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpcOutcome {
    Result(TaskResult),
    Error(RpcErrorObject),
}

/// Wire response: `{ "jsonrpc": "2.0", "id", "result" | "error" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: RpcId,
    #[serde(flatten)]
    pub outcome: RpcOutcome,
}

impl RpcResponse {
    pub fn ok(id: RpcId, result: TaskResult) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: RpcOutcome::Result(result),
        }
    }

    pub fn err(id: RpcId, error: RpcErrorObject) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: RpcOutcome::Error(error),
        }
    }

    pub fn result(&self) -> Option<&TaskResult> {
        match &self.outcome {
            RpcOutcome::Result(r) => Some(r),
            RpcOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&RpcErrorObject> {
        match &self.outcome {
            RpcOutcome::Error(e) => Some(e),
            RpcOutcome::Result(_) => None,
        }
    }
}
