// src/chat/mod.rs
// Transcript and request coordination for one chat session

pub mod coordinator;
pub mod message;
pub mod transcript;

pub use coordinator::{ChatSession, IgnoreReason, Phase, SendOutcome};
pub use message::{IdGenerator, Message, MessageId, Role};
pub use transcript::Transcript;

/// Change notifications for front-ends
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A message was appended; re-render and scroll to it
    Appended(Message),
    /// A request started (`true`) or finished (`false`)
    Loading(bool),
}
