//! Chat session state types

use super::TypingPolicy;
use serde::Serialize;

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// A chat message. Never changed once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// Birth details submitted through the details form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthDetails {
    pub name: String,
    pub date: String,
    pub time: String,
    pub location: String,
}

impl BirthDetails {
    /// Names of the fields that are blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("date", &self.date),
            ("time", &self.time),
            ("location", &self.location),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Copy with surrounding whitespace removed from every field
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            location: self.location.trim().to_string(),
        }
    }

    /// The user-side chat bubble shown for a submission
    pub fn summary(&self) -> String {
        format!(
            "Name: {}\nDate of Birth: {}\nTime of Birth: {}\nPlace of Birth: {}",
            self.name, self.date, self.time, self.location
        )
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the backend to open a session
    Initializing,
    /// Follow-up chat is gated behind the birth-details form
    AwaitingDetails,
    Chatting,
}

/// Why a request is outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPurpose {
    StartSession,
    Details,
    Message,
}

/// What the session is doing right now. At most one of these at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    Idle,
    /// Awaiting a backend round-trip
    Loading { purpose: RequestPurpose },
    /// A bot message is held back until its typing delay elapses
    Typing { text: String, ticket: u64 },
}

/// Client-side state of one chat session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    /// Opaque backend token; `None` until started, and forever after a failed start
    pub session_id: Option<String>,
    /// Display order, append-only
    pub messages: Vec<Message>,
    pub details_submitted: bool,
    pub phase: Phase,
    pub activity: Activity,
    /// Next typing ticket; stale timers carry an older one
    pub next_ticket: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            session_id: None,
            messages: Vec::new(),
            details_submitted: false,
            phase: Phase::Initializing,
            activity: Activity::Idle,
            next_ticket: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.activity, Activity::Loading { .. })
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.activity, Activity::Typing { .. })
    }

    /// Whether a new user action would be rejected as busy
    pub fn is_busy(&self) -> bool {
        !matches!(self.activity, Activity::Idle)
    }

    /// Whether the send affordance should be enabled
    pub fn can_send(&self) -> bool {
        self.session_id.is_some() && !self.is_busy() && self.phase == Phase::Chatting
    }
}

/// Immutable configuration for a session
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Persona slug sent with the session-start request
    pub persona_id: Option<String>,
    /// Display name for the chat header
    pub persona_name: String,
    /// Form-gated variant: require birth details before follow-up chat
    pub require_birth_details: bool,
    pub typing: TypingPolicy,
}

impl SessionContext {
    pub fn new(persona_id: Option<String>, persona_name: impl Into<String>) -> Self {
        Self {
            persona_id,
            persona_name: persona_name.into(),
            require_birth_details: true,
            typing: TypingPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_birth_details(mut self, required: bool) -> Self {
        self.require_birth_details = required;
        self
    }

    /// Phase entered once a session start resolves
    pub fn phase_after_start(&self) -> Phase {
        if self.require_birth_details {
            Phase::AwaitingDetails
        } else {
            Phase::Chatting
        }
    }
}
