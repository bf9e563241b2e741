//! Single-flight request coordinator
//!
//! `ChatSession` owns the transcript and guarantees at most one chat request
//! is outstanding. A send moves the session `Idle -> Sending`, appends the
//! user message, calls the endpoint once, appends exactly one assistant
//! message (the reply or the fallback), then moves back to `Idle`.

use chrono::Local;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;

use super::message::Message;
use super::transcript::Transcript;
use super::SessionEvent;
use crate::config::ChatSettings;
use crate::endpoint::{ChatEndpoint, ChatReply, ChatRequest};
use crate::error::{EndpointError, EndpointResult};

/// Coordinator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sending,
}

/// Why a send did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Input was empty after trimming
    EmptyInput,
    /// Another request is still in flight
    Busy,
}

/// Result of [`ChatSession::send`]
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The endpoint replied; carries the appended assistant message
    Replied(Message),
    /// The request failed; carries the appended fallback message
    Failed(Message),
    /// Nothing was appended and no request was made
    Ignored(IgnoreReason),
}

impl SendOutcome {
    /// The assistant message appended by this send, if any
    pub fn message(&self) -> Option<&Message> {
        match self {
            SendOutcome::Replied(m) | SendOutcome::Failed(m) => Some(m),
            SendOutcome::Ignored(_) => None,
        }
    }
}

struct SessionState {
    transcript: Transcript,
    phase: Phase,
}

struct Inner {
    endpoint: Arc<dyn ChatEndpoint>,
    settings: ChatSettings,
    state: Mutex<SessionState>,
}

/// Handle to one chat session. Clones share the same transcript and guard.
#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<Inner>,
}

impl ChatSession {
    pub fn new(endpoint: Arc<dyn ChatEndpoint>, settings: ChatSettings) -> Self {
        let transcript = Transcript::seeded(&settings.greeting);
        Self {
            inner: Arc::new(Inner {
                endpoint,
                settings,
                state: Mutex::new(SessionState {
                    transcript,
                    phase: Phase::Idle,
                }),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.state.lock().expect("Session mutex poisoned")
    }

    /// Send one user message and wait for the assistant turn.
    ///
    /// No-op when `text` is blank or a request is already in flight.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let (request, turn) = match self.begin(text) {
            Ok(started) => started,
            Err(reason) => {
                tracing::debug!("Send ignored: {:?}", reason);
                return SendOutcome::Ignored(reason);
            }
        };

        let result = self.call_endpoint(&request).await;
        turn.finish(result)
    }

    /// Check the guard, enter `Sending` and append the user message.
    /// Runs under a single lock so racing sends cannot both pass.
    fn begin(&self, text: &str) -> Result<(ChatRequest, PendingTurn), IgnoreReason> {
        if text.trim().is_empty() {
            return Err(IgnoreReason::EmptyInput);
        }

        let mut state = self.state();
        if state.phase == Phase::Sending {
            return Err(IgnoreReason::Busy);
        }

        state.phase = Phase::Sending;
        state.transcript.emit(SessionEvent::Loading(true));

        let id = state.transcript.next_id();
        state.transcript.append(Message::user(id, text, Local::now()));

        let request = ChatRequest {
            user_id: self.inner.settings.user_id.clone(),
            message: text.to_string(),
            enable_tools: self.inner.settings.enable_tools,
            session_id: self.inner.settings.session_id.clone(),
        };
        let turn = PendingTurn {
            session: self.clone(),
            finished: false,
        };
        Ok((request, turn))
    }

    async fn call_endpoint(&self, request: &ChatRequest) -> EndpointResult<ChatReply> {
        let call = self.inner.endpoint.chat(request);
        match self.inner.settings.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(EndpointError::Timeout(limit)),
            },
            None => call.await,
        }
    }

    /// Append the assistant turn and return to `Idle`
    fn finish(&self, state: &mut SessionState, result: EndpointResult<ChatReply>) -> SendOutcome {
        let id = state.transcript.next_id();

        let outcome = match result {
            Ok(reply) => {
                if !reply.success {
                    tracing::debug!("Backend reported an unsuccessful turn");
                }
                let message = Message::assistant(id, reply.message, reply.tool_used, Local::now());
                SendOutcome::Replied(message)
            }
            Err(e) => {
                tracing::warn!("Chat request failed: {}", e);
                let message = Message::assistant(
                    id,
                    self.inner.settings.fallback_message.clone(),
                    None,
                    Local::now(),
                );
                SendOutcome::Failed(message)
            }
        };

        if let Some(message) = outcome.message() {
            state.transcript.append(message.clone());
        }

        state.phase = Phase::Idle;
        state.transcript.emit(SessionEvent::Loading(false));
        outcome
    }

    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase() == Phase::Sending
    }

    /// Snapshot of the transcript for rendering
    pub fn transcript(&self) -> Vec<Message> {
        self.state().transcript.all().to_vec()
    }

    pub fn message_count(&self) -> usize {
        self.state().transcript.len()
    }

    /// Receive every append and loading change from now on
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionEvent> {
        self.state().transcript.subscribe()
    }

    pub fn user_id(&self) -> &str {
        &self.inner.settings.user_id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.inner.settings.session_id.as_deref()
    }

    pub fn tools_enabled(&self) -> bool {
        self.inner.settings.enable_tools
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.inner.settings.request_timeout
    }

    pub fn endpoint_label(&self) -> String {
        self.inner.endpoint.describe()
    }
}

/// A turn between `begin` and `finish`.
///
/// If the `send` future is dropped mid-request the turn is closed here
/// instead: fallback message appended, session back to `Idle`.
struct PendingTurn {
    session: ChatSession,
    finished: bool,
}

impl PendingTurn {
    fn finish(mut self, result: EndpointResult<ChatReply>) -> SendOutcome {
        self.finished = true;
        let mut state = self.session.state();
        self.session.finish(&mut state, result)
    }
}

impl Drop for PendingTurn {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        // May run during unwinding; a poisoned lock is left alone
        let Ok(mut state) = self.session.inner.state.lock() else {
            return;
        };
        self.session.finish(&mut state, Err(EndpointError::Abandoned));
    }
}
