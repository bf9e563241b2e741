//! Interactive REPL for Moonlight Chat
//!
//! Provides a readline-based interface with:
//! - Command history
//! - Multi-line input support
//! - Transcript rendering with a loading indicator

pub mod colors;
mod helper;
mod render;

pub use render::{format_time, render_message, Renderer, Spinner};

use colors::{banner_line, separator};

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::sync::Arc;
use std::time::Duration;

use crate::chat::{ChatSession, IgnoreReason, SendOutcome};
use crate::config::moonlight_dir;
use crate::endpoint::HttpChatEndpoint;

use helper::MoonlightHelper;

const SPINNER_INTERVAL: Duration = Duration::from_millis(150);

/// REPL state
pub struct Repl {
    /// Readline editor with history and completion
    editor: Editor<MoonlightHelper, DefaultHistory>,
    session: ChatSession,
    /// Backend client for /health and /tools
    backend: Arc<HttpChatEndpoint>,
    renderer: Renderer,
    history_path: std::path::PathBuf,
}

impl Repl {
    pub fn new(session: ChatSession, backend: Arc<HttpChatEndpoint>) -> Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(MoonlightHelper::new()));

        Ok(Self {
            editor,
            session,
            backend,
            renderer: Renderer::new(),
            history_path: moonlight_dir().join("chat_history"),
        })
    }

    fn load_history(&mut self) {
        if self.history_path.exists() {
            let _ = self.editor.load_history(&self.history_path);
        }
    }

    fn save_history(&mut self) {
        if let Some(parent) = self.history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = self.editor.save_history(&self.history_path);
    }

    /// Run the REPL loop
    pub async fn run(&mut self) -> Result<()> {
        self.load_history();

        println!("Type your message (Ctrl+D to exit, /help for commands)");
        println!("  Use \\ at end of line for multi-line input, or \"\"\" to start/end block");
        println!();

        self.renderer.render_all(&self.session.transcript())?;

        loop {
            let Some(line) = self.read_input()? else {
                println!("Goodbye!");
                break;
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            self.editor.add_history_entry(&line)?;

            if trimmed.starts_with('/') {
                if !self.handle_command(trimmed).await? {
                    break;
                }
                continue;
            }

            self.send(&line).await?;
        }

        self.save_history();
        Ok(())
    }

    /// Send one message, drawing transcript events and the spinner until the
    /// turn completes
    async fn send(&mut self, text: &str) -> Result<()> {
        let mut events = self.session.subscribe();
        let session = self.session.clone();
        let send = session.send(text);
        tokio::pin!(send);

        let mut ticker = tokio::time::interval(SPINNER_INTERVAL);

        let outcome = loop {
            tokio::select! {
                outcome = &mut send => break outcome,
                Some(event) = events.recv() => self.renderer.handle(event)?,
                _ = ticker.tick() => self.renderer.tick()?,
            }
        };

        while let Ok(event) = events.try_recv() {
            self.renderer.handle(event)?;
        }

        match outcome {
            SendOutcome::Ignored(IgnoreReason::Busy) => {
                println!("{}", colors::warning("Still waiting for the previous reply."));
            }
            SendOutcome::Failed(_) => {
                tracing::debug!("Turn ended with fallback message");
            }
            SendOutcome::Replied(_) | SendOutcome::Ignored(IgnoreReason::EmptyInput) => {}
        }
        Ok(())
    }

    /// Read input with multi-line support
    fn read_input(&mut self) -> Result<Option<String>> {
        let first_line = match self.editor.readline(&colors::prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                return Ok(Some(String::new()));
            }
            Err(ReadlineError::Eof) => return Ok(None),
            Err(err) => {
                eprintln!("Error: {:?}", err);
                return Ok(None);
            }
        };

        let trimmed = first_line.trim();

        if trimmed.starts_with("\"\"\"") {
            return self.read_multiline_block(&first_line);
        }

        if trimmed.ends_with('\\') {
            return self.read_continuation_lines(&first_line);
        }

        Ok(Some(first_line))
    }

    /// Read multi-line block delimited by """
    fn read_multiline_block(&mut self, first_line: &str) -> Result<Option<String>> {
        let mut lines = Vec::new();

        let after_open = first_line.trim().strip_prefix("\"\"\"").unwrap_or("");
        if let Some(single) = after_open.strip_suffix("\"\"\"") {
            return Ok(Some(single.to_string()));
        }
        if !after_open.is_empty() {
            lines.push(after_open.to_string());
        }

        loop {
            match self.editor.readline(&colors::continuation_prompt()) {
                Ok(line) => {
                    if let Some(before_close) = line.trim_end().strip_suffix("\"\"\"") {
                        if !before_close.trim().is_empty() {
                            lines.push(before_close.to_string());
                        }
                        break;
                    }
                    lines.push(line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C (cancelled multi-line)");
                    return Ok(Some(String::new()));
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    return Ok(None);
                }
            }
        }

        Ok(Some(lines.join("\n")))
    }

    /// Read continuation lines (ending with \)
    fn read_continuation_lines(&mut self, first_line: &str) -> Result<Option<String>> {
        let mut lines = vec![strip_continuation(first_line).to_string()];

        loop {
            match self.editor.readline(&colors::continuation_prompt()) {
                Ok(line) => {
                    if line.trim_end().ends_with('\\') {
                        lines.push(strip_continuation(&line).to_string());
                    } else {
                        lines.push(line);
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C (cancelled multi-line)");
                    return Ok(Some(String::new()));
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    return Ok(None);
                }
            }
        }

        Ok(Some(lines.join("\n")))
    }

    /// Handle slash commands. Returns false when the REPL should exit.
    async fn handle_command(&mut self, cmd: &str) -> Result<bool> {
        let command = cmd.split_whitespace().next().unwrap_or(cmd);

        match command {
            "/help" => {
                println!("Commands:");
                println!("  /help     - Show this help");
                println!("  /history  - Redraw the conversation");
                println!("  /status   - Show session state");
                println!("  /health   - Check the backend");
                println!("  /tools    - List backend tools");
                println!("  /version  - Show version info");
                println!("  /quit     - Exit");
            }
            "/history" => {
                println!("{}", separator(50));
                self.renderer.render_all(&self.session.transcript())?;
            }
            "/status" => self.cmd_status(),
            "/health" => self.cmd_health().await,
            "/tools" => self.cmd_tools().await,
            "/version" => {
                println!("Moonlight Chat v{}", env!("CARGO_PKG_VERSION"));
                println!("  Endpoint: {}", self.session.endpoint_label());
            }
            "/quit" | "/exit" => return Ok(false),
            _ => {
                println!("Unknown command: {}. Try /help", command);
            }
        }
        Ok(true)
    }

    fn cmd_status(&self) {
        let timeout = self
            .session
            .request_timeout()
            .map(|d| format!("{}s", d.as_secs()))
            .unwrap_or_else(|| "none".to_string());

        println!("{}", banner_line("User", self.session.user_id()));
        println!(
            "{}",
            banner_line("Session", self.session.session_id().unwrap_or("(none)"))
        );
        println!("{}", banner_line("Endpoint", &self.session.endpoint_label()));
        println!(
            "{}",
            banner_line(
                "Tools",
                if self.session.tools_enabled() { "enabled" } else { "disabled" }
            )
        );
        println!("{}", banner_line("Timeout", &timeout));
        println!(
            "{}",
            banner_line("Messages", &self.session.message_count().to_string())
        );
        println!(
            "{}",
            banner_line(
                "State",
                if self.session.is_in_flight() { "sending" } else { "idle" }
            )
        );
    }

    async fn cmd_health(&self) {
        match self.backend.health().await {
            Ok(health) => {
                let detail = format!(
                    "{} {}",
                    health.app.as_deref().unwrap_or("backend"),
                    health.version.as_deref().unwrap_or("")
                );
                if health.is_healthy() {
                    println!("{} {}", colors::success(&health.status), detail.trim_end());
                } else {
                    println!("{} {}", colors::warning(&health.status), detail.trim_end());
                }
            }
            Err(e) => println!("{}", colors::error(&format!("unreachable ({})", e))),
        }
    }

    async fn cmd_tools(&self) {
        match self.backend.list_tools().await {
            Ok(tools) if tools.is_empty() => println!("No tools available."),
            Ok(tools) => {
                println!("{}", colors::header("Tools:"));
                for tool in tools {
                    let state = if tool.enabled { "" } else { " (disabled)" };
                    println!(
                        "  {:<16} {} {}{}",
                        tool.name,
                        colors::status(&format!("[{}]", tool.category)),
                        tool.description,
                        state
                    );
                }
            }
            Err(e) => println!("{}", colors::error(&format!("Failed to list tools: {}", e))),
        }
    }
}

/// Drop the trailing `\` of a continued line
fn strip_continuation(line: &str) -> &str {
    let trimmed = line.trim_end();
    trimmed.strip_suffix('\\').unwrap_or(trimmed)
}

/// Entry point for the REPL
pub async fn run(session: ChatSession, backend: Arc<HttpChatEndpoint>) -> Result<()> {
    let mut repl = Repl::new(session, backend)?;
    repl.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_continuation() {
        assert_eq!(strip_continuation("first line \\"), "first line ");
        assert_eq!(strip_continuation("no marker"), "no marker");
        assert_eq!(strip_continuation("trailing space \\  "), "trailing space ");
    }
}
