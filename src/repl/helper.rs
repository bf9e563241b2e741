//! Line-editor integration: slash-command completion and inline hints

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;

use super::colors;

/// Slash commands known to the REPL
pub const SLASH_COMMANDS: &[&str] = &[
    "/help",
    "/history",
    "/status",
    "/health",
    "/tools",
    "/version",
    "/quit",
    "/exit",
];

/// Slash commands starting with the first word of `line`
pub fn complete_command(line: &str) -> Vec<&'static str> {
    let word = line.split_whitespace().next().unwrap_or("");
    SLASH_COMMANDS
        .iter()
        .copied()
        .filter(|cmd| cmd.starts_with(word))
        .collect()
}

/// Rest of the command name when `partial` picks out exactly one command
fn command_hint(partial: &str) -> Option<&'static str> {
    match complete_command(partial)[..] {
        [only] if only.len() > partial.len() => Some(&only[partial.len()..]),
        _ => None,
    }
}

/// True while the cursor is still inside the command word of a slash line
fn in_command_word(line: &str, pos: usize) -> bool {
    line.starts_with('/') && pos <= line.find(' ').unwrap_or(line.len())
}

/// Slash lines get command completion and hints; chat lines get history hints
pub struct MoonlightHelper {
    history: HistoryHinter,
}

impl MoonlightHelper {
    pub fn new() -> Self {
        Self {
            history: HistoryHinter::new(),
        }
    }
}

impl Completer for MoonlightHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if !in_command_word(line, pos) {
            return Ok((pos, Vec::new()));
        }

        let candidates = complete_command(&line[..pos])
            .into_iter()
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for MoonlightHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        if !line.starts_with('/') {
            return self.history.hint(line, pos, ctx);
        }
        if pos == line.len() && in_command_word(line, pos) {
            return command_hint(line).map(String::from);
        }
        None
    }
}

impl Highlighter for MoonlightHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(colors::status(hint))
    }
}

impl Validator for MoonlightHelper {}

impl Helper for MoonlightHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_prefix() {
        assert_eq!(complete_command("/he"), vec!["/help", "/health"]);
        assert_eq!(complete_command("/q"), vec!["/quit"]);
    }

    #[test]
    fn test_complete_unknown() {
        assert!(complete_command("/zzz").is_empty());
    }

    #[test]
    fn test_command_hint_unique_prefix() {
        assert_eq!(command_hint("/hea"), Some("lth"));
        assert_eq!(command_hint("/to"), Some("ols"));
    }

    #[test]
    fn test_command_hint_ambiguous_or_complete() {
        assert_eq!(command_hint("/h"), None);
        assert_eq!(command_hint("/quit"), None);
    }

    #[test]
    fn test_in_command_word() {
        assert!(in_command_word("/he", 3));
        assert!(!in_command_word("/help me", 8));
        assert!(!in_command_word("hello", 2));
    }
}
