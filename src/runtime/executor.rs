//! Chat session runtime executor

use super::SessionUpdate;
use crate::api::AstroApi;
use crate::state_machine::{transition, ChatSession, Effect, Event, SessionContext};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// Drives one chat session: applies events, executes effects
pub struct SessionRuntime<A: AstroApi + 'static> {
    context: SessionContext,
    session: ChatSession,
    api: Arc<A>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    updates_tx: broadcast::Sender<SessionUpdate>,
    shutdown: CancellationToken,
}

impl<A: AstroApi + 'static> SessionRuntime<A> {
    pub fn new(
        context: SessionContext,
        api: Arc<A>,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
        updates_tx: broadcast::Sender<SessionUpdate>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            context,
            session: ChatSession::new(),
            api,
            event_rx,
            event_tx,
            updates_tx,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(persona = ?self.context.persona_id, "Starting chat session runtime");

        self.process_event(Event::Start);

        // Events are applied one at a time; that is what makes the busy
        // guard atomic with the action that trips it.
        loop {
            tokio::select! {
                biased;

                () = self.shutdown.cancelled() => break,

                Some(event) = self.event_rx.recv() => self.process_event(event),

                else => break,
            }
        }

        tracing::info!(
            session_id = ?self.session.session_id,
            messages = self.session.messages.len(),
            "Chat session runtime stopped"
        );
    }

    fn process_event(&mut self, event: Event) {
        match transition(&self.session, &self.context, event) {
            Ok(result) => {
                self.session = result.new_state;
                for effect in result.effects {
                    self.execute_effect(effect);
                }
            }
            Err(e) if e.is_user_facing() => {
                tracing::debug!(reason = %e, "User action refused");
                let _ = self.updates_tx.send(SessionUpdate::Rejected {
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                tracing::debug!(reason = %e, "Ignoring event");
            }
        }
    }

    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::StartSession { persona } => {
                let api = self.api.clone();
                self.spawn_event(async move {
                    match api.start_session(persona.as_deref()).await {
                        Ok(start) => {
                            tracing::info!(session_id = %start.session_id, "Chat session started");
                            Event::SessionStarted {
                                session_id: start.session_id,
                                greeting: start.message,
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to start chat session");
                            Event::SessionStartFailed { error: e.message }
                        }
                    }
                });
            }

            Effect::SendChat {
                session_id,
                message,
                birth_details,
            } => {
                let api = self.api.clone();
                self.spawn_event(async move {
                    match api
                        .send_chat_message(&session_id, &message, birth_details.as_ref())
                        .await
                    {
                        Ok(text) => Event::ChatReply { text },
                        Err(e) => {
                            tracing::warn!(
                                session_id = %session_id,
                                with_details = birth_details.is_some(),
                                error = %e,
                                "Chat request failed"
                            );
                            Event::ChatFailed { error: e.message }
                        }
                    }
                });
            }

            Effect::ScheduleTyping { delay, ticket } => {
                self.spawn_event(async move {
                    tokio::time::sleep(delay).await;
                    Event::TypingElapsed { ticket }
                });
            }

            Effect::PublishMessage { message } => {
                let _ = self.updates_tx.send(SessionUpdate::Message(message));
            }

            Effect::ClearInput => {
                let _ = self.updates_tx.send(SessionUpdate::ClearInput);
            }

            Effect::PublishState => {
                let _ = self
                    .updates_tx
                    .send(SessionUpdate::State(self.session.clone()));
            }
        }
    }

    /// Run `work` in the background and feed its event back in, unless the
    /// session closes first
    fn spawn_event<F>(&self, work: F)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        let event_tx = self.event_tx.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;

                () = shutdown.cancelled() => {}

                event = work => {
                    let _ = event_tx.send(event).await;
                }
            }
        });
    }
}
