//! Chat session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! the runtime feeds events in and executes the effects that come out.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;
mod typing;


pub use effect::Effect;
pub use event::Event;
pub use state::{
    Activity, BirthDetails, ChatSession, Message, Phase, RequestPurpose, Sender, SessionContext,
};
pub use transition::{transition, TransitionError, TransitionResult};
pub use typing::TypingPolicy;
