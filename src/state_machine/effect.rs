//! Effects produced by state transitions

use super::state::{BirthDetails, Message};
use std::time::Duration;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open a backend session
    StartSession { persona: Option<String> },

    /// Send one chat turn to the backend
    SendChat {
        session_id: String,
        message: String,
        birth_details: Option<BirthDetails>,
    },

    /// Fire `TypingElapsed { ticket }` after `delay`
    ScheduleTyping { delay: Duration, ticket: u64 },

    /// A message was appended to the transcript
    PublishMessage { message: Message },

    /// Clear the view's text input
    ClearInput,

    /// Broadcast the new session state
    PublishState,
}

impl Effect {
    pub fn publish_message(message: Message) -> Self {
        Effect::PublishMessage { message }
    }

    pub fn send_chat(
        session_id: impl Into<String>,
        message: impl Into<String>,
        birth_details: Option<BirthDetails>,
    ) -> Self {
        Effect::SendChat {
            session_id: session_id.into(),
            message: message.into(),
            birth_details,
        }
    }
}
