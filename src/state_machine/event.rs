//! Events that can occur in a chat session

use super::state::BirthDetails;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // View events
    /// Chat view opened
    Start,
    UserMessage {
        text: String,
    },
    SubmitDetails {
        details: BirthDetails,
    },

    // Backend events
    SessionStarted {
        session_id: String,
        greeting: String,
    },
    SessionStartFailed {
        error: String,
    },
    ChatReply {
        text: String,
    },
    ChatFailed {
        error: String,
    },

    // Timer events
    TypingElapsed {
        ticket: u64,
    },
}
