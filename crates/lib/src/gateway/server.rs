//! Gateway HTTP + WebSocket server (single port).

use crate::a2a::Dispatcher;
use crate::agent::AqiAgent;
use crate::aqi::WaqiClient;
use crate::config::{self, Config};
use crate::event::{
    error_frame, explicit_session_id, resolve_session_id, status_frame, InboundEvent, WebhookEvent,
};
use crate::handler::Handler;
use crate::llm::{GeminiClient, LocationModel};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Header clients may use instead of `?session_id=`.
pub const SESSION_HEADER: &str = "X-Session-ID";

const CONNECTED_MESSAGE: &str = "Connected to AQI Agent";

/// Shared state for the gateway (config and the dispatcher around the handler).
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    pub dispatcher: Dispatcher,
}

impl GatewayState {
    pub fn new(config: Config, handler: Arc<dyn Handler>) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Dispatcher::new(handler),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionQuery {
    session_id: Option<String>,
}

fn header_session(headers: &HeaderMap) -> Option<&str> {
    headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok())
}

/// Build the AQI agent from config. Missing keys are logged, not fatal: without a
/// Gemini key locations come from the message text only; without a WAQI token
/// every reading fails and the agent says so.
pub fn build_agent(config: &Config) -> AqiAgent {
    let waqi_token = config::resolve_waqi_token(config);
    if waqi_token.is_none() {
        log::warn!("WAQI_TOKEN not set in environment or config");
    }
    let locator: Option<Arc<dyn LocationModel>> = match config::resolve_gemini_api_key(config) {
        Some(key) => {
            let client = GeminiClient::new(
                key,
                config.agent.gemini_model.clone(),
                config.agent.gemini_base_url.clone(),
            );
            log::info!("location model: {}", client.model());
            let client: Arc<dyn LocationModel> = Arc::new(client);
            Some(client)
        }
        None => {
            log::warn!("GEMINI_API_KEY not set in environment or config; using text rules only");
            None
        }
    };
    let source = WaqiClient::new(waqi_token, config.agent.waqi_base_url.clone());
    AqiAgent::new(locator, Arc::new(source))
}

/// All routes on one router; tests serve this directly.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_http))
        .route("/webhook", post(webhook))
        .route("/a2a", post(a2a_rpc))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

/// Run the gateway server; binds to config.gateway.bind:config.gateway.port.
/// Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_gateway(config: Config) -> Result<()> {
    let agent = build_agent(&config);
    let bind_addr = format!("{}:{}", config.gateway.bind.trim(), config.gateway.port);
    let app = router(GatewayState::new(config, Arc::new(agent)));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// GET /: service banner with endpoint list.
async fn home() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Telex AQI Agent is running",
        "endpoints": {
            "health": "/health",
            "webhook": "/webhook",
            "websocket": "/ws",
            "a2a": "/a2a"
        }
    }))
}

/// GET /health returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "AQI Agent is running with WebSocket support",
        "port": state.config.gateway.port,
    }))
}

/// POST /webhook: `{type, data:{text}}` in, handler result out.
async fn webhook(
    State(state): State<GatewayState>,
    Query(query): Query<SessionQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let session_id = resolve_session_id(query.session_id.as_deref(), header_session(&headers), None);
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            log::warn!("webhook: invalid event: {}", e);
            return (StatusCode::BAD_REQUEST, Json(error_frame(format!("invalid event: {}", e))))
                .into_response();
        }
    };
    match state
        .dispatcher
        .handle_event(InboundEvent::from_webhook(event, session_id))
        .await
    {
        Ok(reply) => {
            log::info!("webhook: response: {}", reply.data.summary.as_deref().unwrap_or(""));
            (StatusCode::OK, Json(reply)).into_response()
        }
        Err(e) => {
            log::warn!("webhook: handler failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error_frame(e.to_string()))).into_response()
        }
    }
}

/// POST /a2a: JSON-RPC endpoint (`message/send`, `execute`).
async fn a2a_rpc(
    State(state): State<GatewayState>,
    Query(query): Query<SessionQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // No default here: the handler maps a missing session to its own default.
    let session_id = explicit_session_id(query.session_id.as_deref(), header_session(&headers));
    let reply = state.dispatcher.handle_rpc(&body, session_id).await;
    (reply.status, Json(reply.body)).into_response()
}

/// GET /ws upgrades to WebSocket. Session is `?session_id=` or a fresh id per connection.
async fn ws_handler(
    State(state): State<GatewayState>,
    Query(query): Query<SessionQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let connection_id = uuid::Uuid::new_v4().to_string();
    let session_id = resolve_session_id(query.session_id.as_deref(), None, Some(&connection_id));
    ws.on_upgrade(move |socket| handle_socket(socket, state, session_id))
}

async fn send_json(socket: &mut WebSocket, value: &impl serde::Serialize) -> bool {
    match serde_json::to_string(value) {
        Ok(text) => socket.send(Message::Text(text)).await.is_ok(),
        Err(e) => {
            log::warn!("ws: failed to encode frame: {}", e);
            false
        }
    }
}

/// One loop per connection: frames are handled one at a time, in order.
async fn handle_socket(mut socket: WebSocket, state: GatewayState, session_id: String) {
    log::info!("new WebSocket connection: {}", session_id);
    if !send_json(&mut socket, &status_frame(CONNECTED_MESSAGE, &session_id)).await {
        return;
    }

    while let Some(msg) = socket.recv().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                log::debug!("ws {}: receive error: {}", session_id, e);
                break;
            }
        };
        let event: WebhookEvent = match serde_json::from_str(&text) {
            Ok(e) => e,
            Err(e) => {
                if !send_json(&mut socket, &error_frame(format!("invalid event: {}", e))).await {
                    break;
                }
                continue;
            }
        };
        log::info!("ws message from session={}: {}", session_id, event.data.text);
        let sent = match state
            .dispatcher
            .handle_event(InboundEvent::from_webhook(event, session_id.clone()))
            .await
        {
            Ok(reply) => send_json(&mut socket, &reply).await,
            Err(e) => {
                log::warn!("ws {}: handler failed: {}", session_id, e);
                send_json(&mut socket, &error_frame(e.to_string())).await
            }
        };
        if !sent {
            break;
        }
    }
    log::info!("WebSocket {} disconnected", session_id);
}
