//! In-memory transcript store
//!
//! Append-only: entries are never edited, removed, or reordered. Every append
//! is pushed to subscribed listeners so a front-end can re-render and scroll
//! to the newest entry.

use chrono::Local;
use tokio::sync::mpsc;

use super::message::{IdGenerator, Message, MessageId};
use super::SessionEvent;

#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    ids: IdGenerator,
    listeners: Vec<mpsc::UnboundedSender<SessionEvent>>,
}

impl Transcript {
    /// Empty transcript. Sessions start from [`Transcript::seeded`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript holding a single assistant greeting
    pub fn seeded(greeting: &str) -> Self {
        let mut transcript = Self::new();
        let now = Local::now();
        let id = transcript.ids.next_at(now);
        transcript
            .messages
            .push(Message::assistant(id, greeting, None, now));
        transcript
    }

    pub fn next_id(&mut self) -> MessageId {
        self.ids.next_at(Local::now())
    }

    /// Add one record to the end and notify listeners
    pub fn append(&mut self, message: Message) {
        self.messages.push(message.clone());
        self.emit(SessionEvent::Appended(message));
    }

    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push(tx);
        rx
    }

    /// Send an event to every live listener, dropping closed ones
    pub(crate) fn emit(&mut self, event: SessionEvent) {
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Role;

    #[test]
    fn test_seeded_has_greeting() {
        let transcript = Transcript::seeded("hello from the moon");
        assert_eq!(transcript.len(), 1);
        let first = &transcript.all()[0];
        assert_eq!(first.role, Role::Assistant);
        assert_eq!(first.content, "hello from the moon");
        assert!(first.tool_used.is_none());
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let mut transcript = Transcript::new();
        for text in ["one", "two", "three"] {
            let id = transcript.next_id();
            transcript.append(Message::user(id, text, Local::now()));
        }
        let contents: Vec<&str> = transcript.all().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two", "three"]);
        assert_eq!(transcript.last().unwrap().content, "three");
    }

    #[test]
    fn test_ids_increase_after_seed() {
        let mut transcript = Transcript::seeded("hi");
        let seed_id = transcript.all()[0].id;
        let a = transcript.next_id();
        let b = transcript.next_id();
        assert!(a > seed_id);
        assert!(b > a);
    }

    #[test]
    fn test_append_notifies_listeners() {
        let mut transcript = Transcript::new();
        let mut rx = transcript.subscribe();

        let id = transcript.next_id();
        transcript.append(Message::user(id, "ping", Local::now()));

        match rx.try_recv() {
            Ok(SessionEvent::Appended(msg)) => assert_eq!(msg.content, "ping"),
            other => panic!("expected Appended event, got {:?}", other),
        }
    }

    #[test]
    fn test_closed_listener_is_dropped() {
        let mut transcript = Transcript::new();
        let rx = transcript.subscribe();
        drop(rx);

        let id = transcript.next_id();
        transcript.append(Message::user(id, "ping", Local::now()));
        assert!(transcript.listeners.is_empty());
        assert_eq!(transcript.len(), 1);
    }
}
