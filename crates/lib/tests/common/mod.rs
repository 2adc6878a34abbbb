//! Shared test harness: serve the gateway router over a stub handler.

use airq::config::Config;
use airq::gateway::{router, GatewayState};
use airq::handler::{Handler, HandlerError, HandlerResult};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Text that makes [`Stub`] fail.
pub const FAIL_TEXT: &str = "boom";

/// Answers with a fixed location and echoes the text into the summary.
/// Records `(text, session_id)` for every call.
#[derive(Default)]
pub struct Stub {
    pub calls: Mutex<Vec<(String, Option<String>)>>,
}

impl Stub {
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Handler for Stub {
    async fn process(
        &self,
        text: &str,
        session_id: Option<&str>,
    ) -> Result<HandlerResult, HandlerError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), session_id.map(str::to_string)));
        if text == FAIL_TEXT {
            return Err(HandlerError::Upstream("station offline".to_string()));
        }
        Ok(HandlerResult {
            location: Some("Lagos".to_string()),
            aqi: Some(42),
            summary: Some(format!("echo: {}", text)),
        })
    }
}

/// Serve the router on an ephemeral port; returns the base address (`127.0.0.1:port`).
pub async fn serve(stub: Arc<Stub>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local_addr");
    let app = router(GatewayState::new(Config::default(), stub));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr.to_string()
}
