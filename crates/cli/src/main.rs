use clap::{Parser, Subcommand};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

#[derive(Parser)]
#[command(name = "airq")]
#[command(about = "Air-quality agent gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Run the gateway (HTTP, webhook, WebSocket and A2A JSON-RPC on one port).
    Serve {
        /// Config file path (default: AIRQ_CONFIG_PATH or ~/.airq/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP and WebSocket port (default from config or 8000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Ask the running gateway about air quality (interactive, over WebSocket).
    Chat {
        /// Config file path (default: AIRQ_CONFIG_PATH or ~/.airq/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Session id to continue; follow-up questions reuse its last location.
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("airq {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve { config, port }) => {
            if let Err(e) = run_serve(config, port).await {
                log::error!("gateway failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Chat { config, session }) => {
            if let Err(e) = run_chat(config, session).await {
                log::error!("chat failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, path) = airq::config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!(
        "starting gateway on {}:{} (config {})",
        config.gateway.bind,
        config.gateway.port,
        path.display()
    );
    airq::gateway::run_gateway(config).await
}

async fn run_chat(
    config_path: Option<std::path::PathBuf>,
    session: Option<String>,
) -> anyhow::Result<()> {
    use std::io::{self, Write};

    let (config, _) = airq::config::load_config(config_path)?;
    let ws_url = chat_url(config.gateway.bind.trim(), config.gateway.port, session.as_deref())?;

    let (mut ws, _) = tokio_tungstenite::connect_async(ws_url.as_str()).await?;

    // First frame is the connection status with the session id in use.
    let status = next_json(&mut ws)
        .await?
        .ok_or_else(|| anyhow::anyhow!("gateway closed before status frame"))?;
    let session_id = status
        .pointer("/data/session_id")
        .and_then(|v| v.as_str())
        .unwrap_or("-");
    println!("connected (session {})", session_id);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("/exit") || input.eq_ignore_ascii_case("/quit") {
            break;
        }

        let frame = serde_json::json!({ "type": "message", "data": { "text": input } });
        ws.send(Message::Text(frame.to_string())).await?;

        let Some(reply) = next_json(&mut ws).await? else {
            eprintln!("gateway closed the connection");
            break;
        };
        match reply.get("type").and_then(|v| v.as_str()) {
            Some("error") => {
                let msg = reply
                    .pointer("/data/message")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown error");
                eprintln!("chat error: {}", msg);
            }
            _ => {
                let summary = reply
                    .pointer("/data/summary")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                println!("< {}", summary.trim());
            }
        }
    }

    let _ = ws.close(None).await;
    Ok(())
}

/// `ws://{bind}:{port}/ws`, with the session id query-encoded when given.
fn chat_url(bind: &str, port: u16, session: Option<&str>) -> anyhow::Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(&format!("ws://{}:{}/ws", bind, port))?;
    if let Some(id) = session {
        url.query_pairs_mut().append_pair("session_id", id);
    }
    Ok(url)
}

/// Next text frame as JSON; `None` when the socket closes.
async fn next_json<S>(ws: &mut S) -> anyhow::Result<Option<serde_json::Value>>
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(msg) = ws.next().await {
        match msg? {
            Message::Text(text) => return Ok(Some(serde_json::from_str(&text)?)),
            Message::Close(_) => return Ok(None),
            _ => continue,
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_without_session() {
        let url = chat_url("127.0.0.1", 8000, None).unwrap();
        assert_eq!(url.as_str(), "ws://127.0.0.1:8000/ws");
    }

    #[test]
    fn chat_url_encodes_session_id() {
        let url = chat_url("127.0.0.1", 8000, Some("a&b #c")).unwrap();
        assert_eq!(url.as_str(), "ws://127.0.0.1:8000/ws?session_id=a%26b+%23c");
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "session_id");
        assert_eq!(value, "a&b #c");
    }
}
