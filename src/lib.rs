// src/lib.rs

pub mod chat;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod repl;

pub use chat::{ChatSession, Message, Role, SendOutcome, SessionEvent};
pub use config::{ChatSettings, Config};
pub use endpoint::{ChatEndpoint, ChatReply, ChatRequest, HttpChatEndpoint};
pub use error::{ConfigError, EndpointError};
