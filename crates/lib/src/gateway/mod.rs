//! Gateway: HTTP + WebSocket surface for the AQI agent.
//!
//! Single port serves the banner and health probe, the plain webhook, the
//! socket endpoint and the A2A JSON-RPC endpoint. All of them feed one handler.

mod server;

pub use server::{build_agent, router, run_gateway, GatewayState, SessionQuery, SESSION_HEADER};
