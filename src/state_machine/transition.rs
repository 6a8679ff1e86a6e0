//! Pure state transition function
//!
//! Given the same session, context and event this always produces the same
//! result, with no I/O. Busy checks and the flip to `Loading` happen in one
//! call, so two actions dispatched back to back can never both get through.

use super::state::{
    Activity, BirthDetails, ChatSession, Message, Phase, RequestPurpose, SessionContext,
};
use super::{Effect, Event};
use thiserror::Error;

/// Shown when the session could not be opened
pub const START_FAILED_TEXT: &str = "Cosmic signals are weak... please refresh the page.";

/// Shown when a chat turn fails
pub const CHAT_FAILED_TEXT: &str = "The cosmic signals are blurry... Please try again.";

/// Shown when the birth-details submission fails
pub const DETAILS_FAILED_TEXT: &str =
    "The cosmic energies are disturbed right now... Please share your birth details again.";

/// Chat text sent alongside a birth-details submission
pub const DETAILS_MESSAGE: &str = "Here are my birth details.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatSession,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatSession) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Reasons an event is refused. The session is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("No active session")]
    NoSession,
    #[error("Waiting for the current reply to finish")]
    Busy,
    #[error("Please share your birth details first")]
    DetailsRequired,
    #[error("Birth details were already submitted")]
    DetailsAlreadySubmitted,
    #[error("Birth details are not needed in this chat")]
    DetailsNotRequested,
    #[error("Please fill in all birth details (missing: {})", .missing.join(", "))]
    InvalidDetails { missing: Vec<&'static str> },
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl TransitionError {
    /// Whether the view should hear about it. Stale backend or timer
    /// events are dropped quietly.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, TransitionError::InvalidTransition(_))
    }
}

/// Pure transition function
pub fn transition(
    session: &ChatSession,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::Start => start(session, context),
        Event::UserMessage { text } => user_message(session, text),
        Event::SubmitDetails { details } => submit_details(session, &details),

        Event::SessionStarted {
            session_id,
            greeting,
        } => {
            expect_loading(session, RequestPurpose::StartSession)?;
            let mut next = session.clone();
            next.session_id = Some(session_id);
            next.phase = context.phase_after_start();
            Ok(begin_typing(next, context, greeting))
        }

        Event::SessionStartFailed { .. } => {
            expect_loading(session, RequestPurpose::StartSession)?;
            // Degraded: no session id, so later sends are refused up front
            let mut next = session.clone();
            next.phase = context.phase_after_start();
            Ok(begin_typing(next, context, START_FAILED_TEXT.to_string()))
        }

        Event::ChatReply { text } => match session.activity {
            Activity::Loading {
                purpose: RequestPurpose::Details,
            } => {
                let mut next = session.clone();
                next.details_submitted = true;
                next.phase = Phase::Chatting;
                Ok(begin_typing(next, context, text))
            }
            Activity::Loading {
                purpose: RequestPurpose::Message,
            } => Ok(begin_typing(session.clone(), context, text)),
            _ => Err(TransitionError::InvalidTransition(
                "chat reply with no chat request outstanding".to_string(),
            )),
        },

        Event::ChatFailed { .. } => match session.activity {
            Activity::Loading {
                purpose: RequestPurpose::Details,
            } => Ok(begin_typing(session.clone(), context, DETAILS_FAILED_TEXT.to_string())),
            Activity::Loading {
                purpose: RequestPurpose::Message,
            } => Ok(begin_typing(session.clone(), context, CHAT_FAILED_TEXT.to_string())),
            _ => Err(TransitionError::InvalidTransition(
                "chat failure with no chat request outstanding".to_string(),
            )),
        },

        Event::TypingElapsed { ticket } => match &session.activity {
            Activity::Typing {
                text,
                ticket: pending,
            } if *pending == ticket => {
                let message = Message::bot(text.clone());
                let mut next = session.clone();
                next.messages.push(message.clone());
                next.activity = Activity::Idle;
                Ok(TransitionResult::new(next)
                    .with_effect(Effect::publish_message(message))
                    .with_effect(Effect::PublishState))
            }
            _ => Err(TransitionError::InvalidTransition(format!(
                "stale typing timer {ticket}"
            ))),
        },
    }
}

fn start(
    session: &ChatSession,
    context: &SessionContext,
) -> Result<TransitionResult, TransitionError> {
    if session.phase != Phase::Initializing || session.is_busy() || session.session_id.is_some() {
        return Err(TransitionError::InvalidTransition(
            "session already started".to_string(),
        ));
    }

    let mut next = session.clone();
    next.activity = Activity::Loading {
        purpose: RequestPurpose::StartSession,
    };
    Ok(TransitionResult::new(next)
        .with_effect(Effect::StartSession {
            persona: context.persona_id.clone(),
        })
        .with_effect(Effect::PublishState))
}

fn user_message(session: &ChatSession, text: String) -> Result<TransitionResult, TransitionError> {
    if text.trim().is_empty() {
        return Err(TransitionError::EmptyMessage);
    }
    let Some(session_id) = session.session_id.clone() else {
        return Err(TransitionError::NoSession);
    };
    if session.is_busy() {
        return Err(TransitionError::Busy);
    }
    if session.phase == Phase::AwaitingDetails {
        return Err(TransitionError::DetailsRequired);
    }

    let message = Message::user(text.clone());
    let mut next = session.clone();
    next.messages.push(message.clone());
    next.activity = Activity::Loading {
        purpose: RequestPurpose::Message,
    };
    Ok(TransitionResult::new(next)
        .with_effect(Effect::publish_message(message))
        .with_effect(Effect::ClearInput)
        .with_effect(Effect::send_chat(session_id, text, None))
        .with_effect(Effect::PublishState))
}

fn submit_details(
    session: &ChatSession,
    details: &BirthDetails,
) -> Result<TransitionResult, TransitionError> {
    let missing = details.missing_fields();
    if !missing.is_empty() {
        return Err(TransitionError::InvalidDetails { missing });
    }
    if session.details_submitted {
        return Err(TransitionError::DetailsAlreadySubmitted);
    }
    let Some(session_id) = session.session_id.clone() else {
        return Err(TransitionError::NoSession);
    };
    if session.is_busy() {
        return Err(TransitionError::Busy);
    }
    if session.phase != Phase::AwaitingDetails {
        return Err(TransitionError::DetailsNotRequested);
    }

    let details = details.trimmed();
    let message = Message::user(details.summary());
    let mut next = session.clone();
    next.messages.push(message.clone());
    next.activity = Activity::Loading {
        purpose: RequestPurpose::Details,
    };
    Ok(TransitionResult::new(next)
        .with_effect(Effect::publish_message(message))
        .with_effect(Effect::send_chat(session_id, DETAILS_MESSAGE, Some(details)))
        .with_effect(Effect::PublishState))
}

fn expect_loading(session: &ChatSession, purpose: RequestPurpose) -> Result<(), TransitionError> {
    if session.activity == (Activity::Loading { purpose }) {
        Ok(())
    } else {
        Err(TransitionError::InvalidTransition(format!(
            "{purpose:?} result while {:?}",
            session.activity
        )))
    }
}

/// Hold `text` back for its typing delay
fn begin_typing(
    mut session: ChatSession,
    context: &SessionContext,
    text: String,
) -> TransitionResult {
    let ticket = session.next_ticket;
    session.next_ticket += 1;
    let delay = context.typing.delay_for(&text);
    session.activity = Activity::Typing { text, ticket };
    TransitionResult::new(session)
        .with_effect(Effect::ScheduleTyping { delay, ticket })
        .with_effect(Effect::PublishState)
}
