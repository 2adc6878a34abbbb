//! A2A adapter: JSON-RPC validation, message normalization, task assembly and
//! the dispatcher that sequences them around the handler.

mod assemble;
mod dispatch;
mod error;
mod extract;
mod normalize;
mod protocol;
mod validate;

pub use assemble::{
    assemble, event_reply, resolve_summary, resolve_task_id, task_result, DEFAULT_CONTEXT_ID,
    DEFAULT_TASK_ID, NO_SUMMARY,
};
pub use dispatch::{degraded_summary, Dispatcher, RpcReply};
pub use error::{RpcError, INTERNAL_ERROR, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR};
pub use extract::{extract, extract_text, NO_VALID_MESSAGE};
pub use normalize::{normalize, ExecuteParams, OneOrMany, RpcParams, SendParams};
pub use protocol::{
    Message, Part, RpcEnvelope, RpcErrorObject, RpcId, RpcMethod, RpcOutcome, RpcResponse,
    TaskResult, TaskState, TaskStatus, JSONRPC_VERSION,
};
pub use validate::{probe_id, validate};
