//! Transcript message records

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Message identifier, unique and increasing within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out time-derived ids.
///
/// Ids are the capture time in milliseconds, bumped past the previous id
/// when the clock has not moved on. The user and assistant messages of a
/// single turn can land in the same millisecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_at(&mut self, at: DateTime<Local>) -> MessageId {
        let millis = u64::try_from(at.timestamp_millis()).unwrap_or(0);
        self.last = millis.max(self.last + 1);
        MessageId(self.last)
    }
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_used: Option<String>,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn user(id: MessageId, content: impl Into<String>, timestamp: DateTime<Local>) -> Self {
        Self {
            id,
            role: Role::User,
            content: content.into(),
            tool_used: None,
            timestamp,
        }
    }

    pub fn assistant(
        id: MessageId,
        content: impl Into<String>,
        tool_used: Option<String>,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: content.into(),
            tool_used,
            timestamp,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ids_follow_clock() {
        let mut ids = IdGenerator::new();
        let t0 = Local.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let t1 = Local.timestamp_millis_opt(1_700_000_005_000).unwrap();
        assert_eq!(ids.next_at(t0), MessageId(1_700_000_000_000));
        assert_eq!(ids.next_at(t1), MessageId(1_700_000_005_000));
    }

    #[test]
    fn test_ids_same_millisecond_do_not_collide() {
        let mut ids = IdGenerator::new();
        let t = Local.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let a = ids.next_at(t);
        let b = ids.next_at(t);
        assert!(b > a);
    }

    #[test]
    fn test_ids_never_go_backwards() {
        let mut ids = IdGenerator::new();
        let later = Local.timestamp_millis_opt(1_700_000_010_000).unwrap();
        let earlier = Local.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let a = ids.next_at(later);
        let b = ids.next_at(earlier);
        assert_eq!(b, MessageId(a.0 + 1));
    }

    #[test]
    fn test_message_serialize() {
        let t = Local.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let msg = Message::assistant(MessageId(7), "it's $5", Some("pricing_lookup".into()), t);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["id"], 7);
        assert_eq!(json["tool_used"], "pricing_lookup");

        let user = Message::user(MessageId(8), "hello", t);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("tool_used").is_none());
    }
}
