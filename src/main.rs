//! Moonlight Chat - terminal client for the Moonlight assistant
//!
//! Keeps an in-memory transcript, sends one message at a time to the
//! backend's `/api/chat` endpoint and renders replies as they arrive.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use moonlight_chat::config::{moonlight_dir, ChatSettings, Config};
use moonlight_chat::endpoint::HttpChatEndpoint;
use moonlight_chat::repl::{self, colors};
use moonlight_chat::ChatSession;

#[derive(Parser)]
#[command(name = "moonlight-chat")]
#[command(about = "Terminal chat client for the Moonlight assistant")]
struct Args {
    /// Backend base URL
    #[arg(long, env = "MOONLIGHT_URL")]
    url: Option<String>,

    /// User identifier sent with every message
    #[arg(long, env = "MOONLIGHT_USER_ID")]
    user_id: Option<String>,

    /// Ask the backend not to invoke tools
    #[arg(long)]
    no_tools: bool,

    /// Request timeout in seconds (0 waits forever)
    #[arg(long, env = "MOONLIGHT_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Session identifier (defaults to a fresh UUID)
    #[arg(long)]
    session_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (from ~/.moonlight/.env or current dir)
    let env_path = Some(moonlight_dir().join(".env")).filter(|p| p.exists());
    if let Some(path) = env_path {
        let _ = dotenvy::from_path(&path);
    } else {
        let _ = dotenvy::dotenv();
    }

    // Logs go to stderr so they stay out of the transcript
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Resolve values: CLI args > env vars (handled by clap) > config file > defaults
    let config = Config::load();
    let session_id = args
        .session_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let settings = ChatSettings::resolve(
        config,
        args.url,
        args.user_id,
        args.no_tools,
        args.timeout_secs,
        Some(session_id),
    );

    let backend = Arc::new(HttpChatEndpoint::new(settings.base_url.clone()));

    println!();
    println!("{}", colors::banner_accent(&format!("  Moonlight Chat {}", env!("CARGO_PKG_VERSION"))));
    println!("{}", colors::separator(50));
    println!("{}", colors::banner_line("Endpoint", backend.base_url()));
    println!("{}", colors::banner_line("User", &settings.user_id));
    println!(
        "{}",
        colors::banner_line(
            "Tools",
            &if settings.enable_tools {
                colors::success("enabled")
            } else {
                colors::warning("disabled")
            }
        )
    );

    match backend.health().await {
        Ok(health) if health.is_healthy() => {
            let version = health.version.as_deref().unwrap_or("?");
            println!("{}", colors::banner_line("Backend", &format!("{} (v{})", colors::success("healthy"), version)));
        }
        Ok(health) => {
            println!("{}", colors::banner_line("Backend", &colors::warning(&health.status)));
        }
        Err(e) => {
            tracing::debug!("Health probe failed: {}", e);
            println!("{}", colors::banner_line("Backend", &colors::error("unreachable")));
        }
    }

    println!("{}", colors::separator(50));
    println!();

    let session = ChatSession::new(backend.clone(), settings);
    repl::run(session, backend).await
}
