//! Mock implementations for testing
//!
//! These mocks enable session and catalog tests without a backend.

use crate::api::{ApiError, AstroApi, SessionStart};
use crate::persona::{Persona, Review};
use crate::state_machine::BirthDetails;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// Mock API
// ============================================================================

/// A chat request as the backend would have received it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedChat {
    pub session_id: String,
    pub message: String,
    pub birth_details: Option<BirthDetails>,
}

/// Mock backend that returns queued responses in order.
///
/// An empty queue answers with a network error.
#[derive(Default)]
pub struct MockAstroApi {
    personas: Mutex<VecDeque<Result<Vec<Persona>, ApiError>>>,
    starts: Mutex<VecDeque<Result<SessionStart, ApiError>>>,
    chats: Mutex<VecDeque<Result<String, ApiError>>>,
    reviews: Mutex<VecDeque<Result<Vec<Review>, ApiError>>>,
    /// Artificial latency for chat replies
    chat_delay: Option<Duration>,
    /// Record of persona slugs sent to `start_session`
    pub start_requests: Mutex<Vec<Option<String>>>,
    /// Record of all chat requests made
    pub chat_requests: Mutex<Vec<RecordedChat>>,
}

fn no_response() -> ApiError {
    ApiError::network("No mock response queued")
}

impl MockAstroApi {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_chat_delay(mut self, delay: Duration) -> Self {
        self.chat_delay = Some(delay);
        self
    }

    pub fn queue_personas(&self, response: Result<Vec<Persona>, ApiError>) {
        self.personas.lock().unwrap().push_back(response);
    }

    pub fn queue_start(&self, response: Result<SessionStart, ApiError>) {
        self.starts.lock().unwrap().push_back(response);
    }

    /// Queue a successful session start
    pub fn queue_session(&self, session_id: &str, greeting: &str) {
        self.queue_start(Ok(SessionStart {
            session_id: session_id.to_string(),
            message: greeting.to_string(),
        }));
    }

    pub fn queue_chat(&self, response: Result<String, ApiError>) {
        self.chats.lock().unwrap().push_back(response);
    }

    pub fn queue_reviews(&self, response: Result<Vec<Review>, ApiError>) {
        self.reviews.lock().unwrap().push_back(response);
    }

    pub fn recorded_chats(&self) -> Vec<RecordedChat> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub fn recorded_starts(&self) -> Vec<Option<String>> {
        self.start_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AstroApi for MockAstroApi {
    async fn list_personas(&self) -> Result<Vec<Persona>, ApiError> {
        self.personas
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(no_response()))
    }

    async fn start_session(&self, persona: Option<&str>) -> Result<SessionStart, ApiError> {
        self.start_requests
            .lock()
            .unwrap()
            .push(persona.map(ToString::to_string));
        self.starts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(no_response()))
    }

    async fn send_chat_message(
        &self,
        session_id: &str,
        message: &str,
        birth_details: Option<&BirthDetails>,
    ) -> Result<String, ApiError> {
        self.chat_requests.lock().unwrap().push(RecordedChat {
            session_id: session_id.to_string(),
            message: message.to_string(),
            birth_details: birth_details.cloned(),
        });
        let response = self
            .chats
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(no_response()));
        if let Some(delay) = self.chat_delay {
            tokio::time::sleep(delay).await;
        }
        response
    }

    async fn list_reviews(&self, _persona_slug: &str) -> Result<Vec<Review>, ApiError> {
        self.reviews
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(no_response()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{SessionClosed, SessionHandle, SessionUpdate};
    use crate::state_machine::transition::{
        CHAT_FAILED_TEXT, DETAILS_FAILED_TEXT, DETAILS_MESSAGE, START_FAILED_TEXT,
    };
    use crate::state_machine::{ChatSession, Message, Phase, SessionContext};
    use std::sync::Arc;
    use tokio::sync::broadcast;
    use tokio::time::Instant;

    const WAIT: Duration = Duration::from_secs(30);

    fn context(require_details: bool) -> SessionContext {
        SessionContext::new(Some("acharya-sarvesh".into()), "Acharya Sarvesh")
            .with_birth_details(require_details)
    }

    fn details() -> BirthDetails {
        BirthDetails {
            name: "Asha".into(),
            date: "1994-02-11".into(),
            time: "06:45".into(),
            location: "Pune".into(),
        }
    }

    /// Wait for the next appended message
    async fn next_message(rx: &mut broadcast::Receiver<SessionUpdate>) -> Message {
        tokio::time::timeout(WAIT, async {
            loop {
                if let Ok(SessionUpdate::Message(message)) = rx.recv().await {
                    return message;
                }
            }
        })
        .await
        .expect("timed out waiting for a message")
    }

    /// Wait for the next refused action
    async fn next_rejection(rx: &mut broadcast::Receiver<SessionUpdate>) -> String {
        tokio::time::timeout(WAIT, async {
            loop {
                if let Ok(SessionUpdate::Rejected { reason }) = rx.recv().await {
                    return reason;
                }
            }
        })
        .await
        .expect("timed out waiting for a rejection")
    }

    /// Wait until the session is idle again and return its state
    async fn next_idle_state(rx: &mut broadcast::Receiver<SessionUpdate>) -> ChatSession {
        tokio::time::timeout(WAIT, async {
            loop {
                if let Ok(SessionUpdate::State(state)) = rx.recv().await {
                    if !state.is_busy() {
                        return state;
                    }
                }
            }
        })
        .await
        .expect("timed out waiting for an idle state")
    }

    #[tokio::test]
    async fn test_mock_api_records_and_replays() {
        let mock = MockAstroApi::new();
        mock.queue_chat(Ok("Hello".into()));

        let reply = mock.send_chat_message("abc", "hi", None).await.unwrap();
        assert_eq!(reply, "Hello");
        assert!(mock.send_chat_message("abc", "again", None).await.is_err());
        assert_eq!(mock.recorded_chats().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_greeting_appears_after_typing_delay() {
        let api = Arc::new(MockAstroApi::new());
        api.queue_session("abc", "Namaste!");
        let started = Instant::now();

        let (_handle, mut rx) = SessionHandle::spawn(api.clone(), context(false));

        let greeting = next_message(&mut rx).await;
        assert_eq!(greeting, Message::bot("Namaste!"));
        assert!(started.elapsed() >= Duration::from_millis(3200));
        assert_eq!(api.recorded_starts(), vec![Some("acharya-sarvesh".to_string())]);

        let state = next_idle_state(&mut rx).await;
        assert_eq!(state.session_id.as_deref(), Some("abc"));
        assert!(state.can_send());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_failure_leaves_degraded_session() {
        let api = Arc::new(MockAstroApi::new());
        api.queue_start(Err(ApiError::network("connection refused")));

        let (handle, mut rx) = SessionHandle::spawn(api.clone(), context(false));

        assert_eq!(next_message(&mut rx).await, Message::bot(START_FAILED_TEXT));
        let state = next_idle_state(&mut rx).await;
        assert_eq!(state.session_id, None);

        handle.send_message("hello?").await.unwrap();
        assert_eq!(next_rejection(&mut rx).await, "No active session");
        assert!(api.recorded_chats().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_message_round_trip() {
        let api = Arc::new(MockAstroApi::new());
        api.queue_session("abc", "Namaste!");
        api.queue_chat(Ok("Jupiter favours travel this year.".into()));

        let (handle, mut rx) = SessionHandle::spawn(api.clone(), context(false));
        next_message(&mut rx).await;
        next_idle_state(&mut rx).await;

        handle.send_message("Will I travel?").await.unwrap();
        assert_eq!(next_message(&mut rx).await, Message::user("Will I travel?"));
        assert_eq!(
            next_message(&mut rx).await,
            Message::bot("Jupiter favours travel this year.")
        );

        let state = next_idle_state(&mut rx).await;
        assert_eq!(state.messages.len(), 3);
        assert_eq!(
            api.recorded_chats(),
            vec![RecordedChat {
                session_id: "abc".into(),
                message: "Will I travel?".into(),
                birth_details: None,
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_error_becomes_apology() {
        let api = Arc::new(MockAstroApi::new());
        api.queue_session("abc", "Namaste!");
        api.queue_chat(Err(ApiError::status(401, "Session expired")));

        let (handle, mut rx) = SessionHandle::spawn(api, context(false));
        next_message(&mut rx).await;
        next_idle_state(&mut rx).await;

        handle.send_message("hi").await.unwrap();
        next_message(&mut rx).await;
        assert_eq!(next_message(&mut rx).await, Message::bot(CHAT_FAILED_TEXT));

        // Still usable afterwards
        let state = next_idle_state(&mut rx).await;
        assert!(state.can_send());
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_sends_issue_one_request() {
        let api = Arc::new(MockAstroApi::new().with_chat_delay(Duration::from_millis(500)));
        api.queue_session("abc", "Namaste!");
        api.queue_chat(Ok("first reply".into()));

        let (handle, mut rx) = SessionHandle::spawn(api.clone(), context(false));
        next_message(&mut rx).await;
        next_idle_state(&mut rx).await;

        handle.send_message("one").await.unwrap();
        handle.send_message("two").await.unwrap();

        assert_eq!(
            next_rejection(&mut rx).await,
            "Waiting for the current reply to finish"
        );
        let state = next_idle_state(&mut rx).await;
        assert_eq!(
            state.messages,
            vec![
                Message::bot("Namaste!"),
                Message::user("one"),
                Message::bot("first reply"),
            ]
        );
        assert_eq!(api.recorded_chats().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_details_retry_then_chat() {
        let api = Arc::new(MockAstroApi::new());
        api.queue_session("abc", "Namaste! Please share your birth details.");
        api.queue_chat(Err(ApiError::network("timeout")));
        api.queue_chat(Ok("Your Moon is in Taurus.".into()));
        api.queue_chat(Ok("Yes, a good year for travel.".into()));

        let (handle, mut rx) = SessionHandle::spawn(api.clone(), context(true));
        next_message(&mut rx).await;
        let state = next_idle_state(&mut rx).await;
        assert_eq!(state.phase, Phase::AwaitingDetails);

        // Gated until details go through
        handle.send_message("Will I travel?").await.unwrap();
        assert_eq!(next_rejection(&mut rx).await, "Please share your birth details first");

        handle.submit_details(details()).await.unwrap();
        assert_eq!(next_message(&mut rx).await, Message::user(details().summary()));
        assert_eq!(next_message(&mut rx).await, Message::bot(DETAILS_FAILED_TEXT));
        let state = next_idle_state(&mut rx).await;
        assert!(!state.details_submitted);
        assert_eq!(state.phase, Phase::AwaitingDetails);

        handle.submit_details(details()).await.unwrap();
        next_message(&mut rx).await;
        assert_eq!(next_message(&mut rx).await, Message::bot("Your Moon is in Taurus."));
        let state = next_idle_state(&mut rx).await;
        assert!(state.details_submitted);
        assert_eq!(state.phase, Phase::Chatting);

        handle.send_message("Will I travel?").await.unwrap();
        next_message(&mut rx).await;
        assert_eq!(next_message(&mut rx).await, Message::bot("Yes, a good year for travel."));

        let chats = api.recorded_chats();
        assert_eq!(chats.len(), 3);
        assert_eq!(chats[1].message, DETAILS_MESSAGE);
        assert_eq!(chats[1].birth_details, Some(details()));
        assert_eq!(chats[2].birth_details, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_details_send_nothing() {
        let api = Arc::new(MockAstroApi::new());
        api.queue_session("abc", "Namaste!");

        let (handle, mut rx) = SessionHandle::spawn(api.clone(), context(true));
        next_message(&mut rx).await;
        next_idle_state(&mut rx).await;

        let mut incomplete = details();
        incomplete.location = String::new();
        handle.submit_details(incomplete).await.unwrap();

        let reason = next_rejection(&mut rx).await;
        assert!(reason.contains("location"), "{reason}");
        assert!(api.recorded_chats().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_details_without_form_are_rejected() {
        let api = Arc::new(MockAstroApi::new());
        api.queue_session("abc", "Namaste!");

        let (handle, mut rx) = SessionHandle::spawn(api.clone(), context(false));
        next_message(&mut rx).await;
        next_idle_state(&mut rx).await;

        handle.submit_details(details()).await.unwrap();

        let reason = next_rejection(&mut rx).await;
        assert_eq!(reason, "Birth details are not needed in this chat");
        assert!(api.recorded_chats().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_session_refuses_actions() {
        let api = Arc::new(MockAstroApi::new());
        api.queue_session("abc", "Namaste!");

        let (handle, _rx) = SessionHandle::spawn(api, context(false));
        handle.close();

        assert!(handle.is_closed());
        assert_eq!(handle.send_message("hi").await, Err(SessionClosed));
    }
}
