//! Per-session conversation memory for the AQI agent.
//!
//! Sessions are keyed by the opaque session id the transport resolved and hold
//! only what follow-up questions need ("what about there?"). Memory lives for
//! the life of the process.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::event::DEFAULT_SESSION_ID;

/// Unique session identifier (opaque string).
pub type SessionId = String;

/// What the agent remembers about one session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub last_location: Option<String>,
}

/// In-memory store of session state.
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<SessionId, SessionState>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn key(id: Option<&str>) -> SessionId {
    id.filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SESSION_ID)
        .to_string()
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Last location resolved in this session, if any. `None` id maps to the default session.
    pub async fn last_location(&self, id: Option<&str>) -> Option<String> {
        self.inner
            .read()
            .await
            .get(&key(id))
            .and_then(|s| s.last_location.clone())
    }

    /// Remember the location for follow-up messages; creates the session if needed.
    pub async fn remember_location(&self, id: Option<&str>, location: impl Into<String>) {
        let mut g = self.inner.write().await;
        g.entry(key(id)).or_default().last_location = Some(location.into());
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
