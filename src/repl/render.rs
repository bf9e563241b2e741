//! Transcript rendering for the terminal

use chrono::{DateTime, Local, Timelike};
use std::io::{self, Write};

use super::colors::{self, ansi::*};
use crate::chat::{Message, Role, SessionEvent};

const USER_LABEL: &str = "You";
const ASSISTANT_LABEL: &str = "🌙 Moonlight";

/// Clock time as `ko-KR` shows it with 2-digit hour and minute,
/// e.g. `오전 09:05` or `오후 03:04`
pub fn format_time(ts: &DateTime<Local>) -> String {
    let (pm, hour) = ts.hour12();
    let period = if pm { "오후" } else { "오전" };
    format!("{} {:02}:{:02}", period, hour, ts.minute())
}

/// One transcript entry: label and time, content, optional tool badge
pub fn render_message(message: &Message) -> String {
    let label = match message.role {
        Role::User => colors::user_label(USER_LABEL),
        Role::Assistant => colors::assistant_label(ASSISTANT_LABEL),
    };

    let mut out = format!(
        "{}  {}\n{}",
        label,
        colors::status(&format_time(&message.timestamp)),
        message.content
    );

    if let Some(tool) = &message.tool_used {
        out.push('\n');
        out.push_str(&colors::tool_badge(tool));
    }
    out
}

/// Three-dot loading indicator drawn on a single line
#[derive(Debug, Default)]
pub struct Spinner {
    frame: usize,
    visible: bool,
}

impl Spinner {
    const FRAMES: [&'static str; 3] = ["●··", "·●·", "··●"];

    pub fn new() -> Self {
        Self::default()
    }

    /// Next frame, with a carriage return so it overwrites the last one
    pub fn next_frame(&mut self) -> String {
        let frame = Self::FRAMES[self.frame % Self::FRAMES.len()];
        self.frame += 1;
        self.visible = true;
        format!("\r{}{}{}", DIM, frame, RESET)
    }

    /// Escape sequence that erases the indicator, empty if nothing is drawn
    pub fn clear(&mut self) -> &'static str {
        if self.visible {
            self.visible = false;
            self.frame = 0;
            "\r\x1b[2K"
        } else {
            ""
        }
    }
}

/// Draws session events to stdout
#[derive(Debug, Default)]
pub struct Renderer {
    spinner: Spinner,
    loading: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: SessionEvent) -> io::Result<()> {
        let mut out = io::stdout().lock();
        match event {
            SessionEvent::Appended(message) => {
                write!(out, "{}", self.spinner.clear())?;
                writeln!(out, "{}\n", render_message(&message))?;
            }
            SessionEvent::Loading(loading) => {
                self.loading = loading;
                if !loading {
                    write!(out, "{}", self.spinner.clear())?;
                }
            }
        }
        out.flush()
    }

    /// Advance the spinner while a request is in flight
    pub fn tick(&mut self) -> io::Result<()> {
        if !self.loading {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        write!(out, "{}", self.spinner.next_frame())?;
        out.flush()
    }

    pub fn render_all(&mut self, messages: &[Message]) -> io::Result<()> {
        for message in messages {
            self.handle(SessionEvent::Appended(message.clone()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::MessageId;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, 15, h, m, 0).unwrap()
    }

    #[test]
    fn test_format_time_morning() {
        assert_eq!(format_time(&at(9, 5)), "오전 09:05");
    }

    #[test]
    fn test_format_time_afternoon() {
        assert_eq!(format_time(&at(15, 4)), "오후 03:04");
    }

    #[test]
    fn test_format_time_noon_and_midnight() {
        assert_eq!(format_time(&at(12, 0)), "오후 12:00");
        assert_eq!(format_time(&at(0, 30)), "오전 12:30");
    }

    #[test]
    fn test_render_assistant_with_tool() {
        let msg = Message::assistant(
            MessageId(1),
            "it's $5",
            Some("pricing_lookup".into()),
            at(10, 0),
        );
        let out = render_message(&msg);
        assert!(out.contains("Moonlight"));
        assert!(out.contains("it's $5"));
        assert!(out.contains("🔧 pricing_lookup"));
    }

    #[test]
    fn test_render_user_without_badge() {
        let msg = Message::user(MessageId(2), "hello", at(10, 0));
        let out = render_message(&msg);
        assert!(out.contains("You"));
        assert!(out.contains("hello"));
        assert!(!out.contains("🔧"));
    }

    #[test]
    fn test_spinner_cycles_and_clears() {
        let mut spinner = Spinner::new();
        assert_eq!(spinner.clear(), "");
        let a = spinner.next_frame();
        let b = spinner.next_frame();
        assert_ne!(a, b);
        assert!(a.starts_with('\r'));
        assert_eq!(spinner.clear(), "\r\x1b[2K");
        assert_eq!(spinner.clear(), "");
    }
}
