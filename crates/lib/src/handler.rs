//! The single-turn text handler the adapter drives.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of one handler call. Serialized as-is on the webhook/socket path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandlerResult {
    pub location: Option<String>,
    pub aqi: Option<u16>,
    pub summary: Option<String>,
}

impl HandlerResult {
    pub fn summary(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("upstream service failed: {0}")]
    Upstream(String),
    #[error("{0}")]
    Other(String),
}

/// Turns normalized text into a result. Called once per request; may fail.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn process(
        &self,
        text: &str,
        session_id: Option<&str>,
    ) -> Result<HandlerResult, HandlerError>;
}
