//! Runtime for executing chat sessions
//!
//! One task per open chat view. The view talks to it through a
//! [`SessionHandle`] and listens for [`SessionUpdate`]s.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;

use crate::api::AstroApi;
use crate::state_machine::{BirthDetails, ChatSession, Event, Message, SessionContext};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// Updates sent to the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Full session state after a transition
    State(ChatSession),
    /// A message was appended to the transcript
    Message(Message),
    /// The view should clear its input box
    ClearInput,
    /// A user action was refused; the session is unchanged
    Rejected { reason: String },
}

/// The session runtime has stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Chat session is closed")]
pub struct SessionClosed;

/// Handle to interact with a running chat session.
///
/// Dropping the handle stops the session.
pub struct SessionHandle {
    event_tx: mpsc::Sender<Event>,
    updates_tx: broadcast::Sender<SessionUpdate>,
    shutdown: CancellationToken,
}

impl SessionHandle {
    /// Start a session runtime on the current tokio runtime.
    ///
    /// The returned receiver is subscribed before the runtime starts, so it
    /// sees every update including the greeting.
    pub fn spawn<A: AstroApi + 'static>(
        api: Arc<A>,
        context: SessionContext,
    ) -> (Self, broadcast::Receiver<SessionUpdate>) {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (updates_tx, updates_rx) = broadcast::channel(128);
        let shutdown = CancellationToken::new();

        let runtime = SessionRuntime::new(
            context,
            api,
            event_rx,
            event_tx.clone(),
            updates_tx.clone(),
            shutdown.clone(),
        );
        tokio::spawn(runtime.run());

        (
            Self {
                event_tx,
                updates_tx,
                shutdown,
            },
            updates_rx,
        )
    }

    pub async fn send_message(&self, text: impl Into<String>) -> Result<(), SessionClosed> {
        self.dispatch(Event::UserMessage { text: text.into() }).await
    }

    pub async fn submit_details(&self, details: BirthDetails) -> Result<(), SessionClosed> {
        self.dispatch(Event::SubmitDetails { details }).await
    }

    /// Additional listener for session updates
    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.updates_tx.subscribe()
    }

    /// Stop the session. Outstanding requests are abandoned.
    pub fn close(&self) {
        self.shutdown.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled() || self.event_tx.is_closed()
    }

    async fn dispatch(&self, event: Event) -> Result<(), SessionClosed> {
        if self.shutdown.is_cancelled() {
            return Err(SessionClosed);
        }
        self.event_tx.send(event).await.map_err(|_| SessionClosed)
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
