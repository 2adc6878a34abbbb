//! Handler result → protocol-shaped response.

use super::protocol::{Message, RpcId, RpcResponse, TaskResult, TaskState, TaskStatus};
use crate::event::EventReply;
use crate::handler::HandlerResult;

pub const DEFAULT_TASK_ID: &str = "task-default";
pub const DEFAULT_CONTEXT_ID: &str = "aqi-agent-context";
pub const NO_SUMMARY: &str = "No summary returned";

/// Task id: the resolved location, else [`DEFAULT_TASK_ID`].
pub fn resolve_task_id(result: &HandlerResult) -> String {
    result
        .location
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_TASK_ID)
        .to_string()
}

/// Reply text: the summary, else [`NO_SUMMARY`].
pub fn resolve_summary(result: &HandlerResult) -> String {
    result
        .summary
        .clone()
        .unwrap_or_else(|| NO_SUMMARY.to_string())
}

/// Completed task whose status message and history are the single agent reply.
pub fn task_result(result: &HandlerResult) -> TaskResult {
    let reply = Message::agent(resolve_summary(result));
    TaskResult {
        kind: "task".to_string(),
        id: resolve_task_id(result),
        context_id: DEFAULT_CONTEXT_ID.to_string(),
        status: TaskStatus {
            state: TaskState::Completed,
            message: reply.clone(),
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
        },
        artifacts: Vec::new(),
        history: vec![reply],
    }
}

/// JSON-RPC success response echoing the request id.
pub fn assemble(result: &HandlerResult, id: RpcId) -> RpcResponse {
    RpcResponse::ok(id, task_result(result))
}

/// Webhook/socket reply: the handler result itself.
pub fn event_reply(result: HandlerResult) -> EventReply {
    EventReply::message(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2a::protocol::Part;

    #[test]
    fn completed_task_with_one_agent_message() {
        let result = HandlerResult {
            location: Some("Lagos".to_string()),
            aqi: Some(42),
            summary: Some("Air quality in Lagos is good (AQI 42).".to_string()),
        };
        let task = task_result(&result);
        assert_eq!(task.id, "Lagos");
        assert_eq!(task.context_id, DEFAULT_CONTEXT_ID);
        assert_eq!(task.status.state, TaskState::Completed);
        assert!(task.artifacts.is_empty());
        assert_eq!(task.history.len(), 1);
        assert_eq!(task.history[0].role, "agent");
        assert_eq!(
            task.history[0].parts,
            vec![Part::text("Air quality in Lagos is good (AQI 42).")]
        );
        assert_eq!(task.status.message, task.history[0]);
        assert!(task.status.timestamp.is_some());
    }

    #[test]
    fn fallbacks_for_missing_fields() {
        let task = task_result(&HandlerResult::default());
        assert_eq!(task.id, DEFAULT_TASK_ID);
        assert_eq!(task.history[0].parts, vec![Part::text(NO_SUMMARY)]);
    }

    #[test]
    fn response_echoes_id() {
        let res = assemble(&HandlerResult::summary("ok"), RpcId::from("req-7"));
        assert_eq!(res.id, RpcId::from("req-7"));
        assert!(res.error().is_none());
        assert_eq!(res.result().map(|r| r.history.len()), Some(1));
    }

    #[test]
    fn rpc_response_survives_a_wire_trip() {
        let res = assemble(
            &HandlerResult {
                location: Some("Abuja".to_string()),
                aqi: Some(88),
                summary: Some("Air quality in Abuja is moderate (AQI 88).".to_string()),
            },
            RpcId::from(5),
        );
        let wire = serde_json::to_string(&res).unwrap();
        let back: RpcResponse = serde_json::from_str(&wire).unwrap();
        assert_eq!(back.id, res.id);
        assert_eq!(back.result().map(|r| &r.id), res.result().map(|r| &r.id));
        assert_eq!(back.result().map(|r| &r.history), res.result().map(|r| &r.history));
        assert_eq!(back, res);
    }

    #[test]
    fn event_reply_wraps_result_directly() {
        let reply = event_reply(HandlerResult::summary("hi"));
        let v = serde_json::to_value(&reply).unwrap();
        assert_eq!(v["type"], "message");
        assert_eq!(v["data"]["summary"], "hi");
        assert!(v["data"]["location"].is_null());
    }
}
