//! Astro backend API client
//!
//! Provides the client-side contract for the persona catalog, session start
//! and chat endpoints.

mod client;
mod error;
mod types;

pub use client::HttpAstroApi;
pub use error::{ApiError, ApiErrorKind};
pub use types::SessionStart;

use crate::persona::{Persona, Review};
use crate::state_machine::BirthDetails;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Operations the client needs from the backend
#[async_trait]
pub trait AstroApi: Send + Sync {
    /// Fetch the selectable personas, in catalog order
    async fn list_personas(&self) -> Result<Vec<Persona>, ApiError>;

    /// Open a backend session, optionally bound to a persona slug
    async fn start_session(&self, persona: Option<&str>) -> Result<SessionStart, ApiError>;

    /// Send one chat turn and return the bot's reply text
    async fn send_chat_message(
        &self,
        session_id: &str,
        message: &str,
        birth_details: Option<&BirthDetails>,
    ) -> Result<String, ApiError>;

    /// Fetch reviews for a persona
    async fn list_reviews(&self, persona_slug: &str) -> Result<Vec<Review>, ApiError>;
}

#[async_trait]
impl<T: AstroApi + ?Sized> AstroApi for Arc<T> {
    async fn list_personas(&self) -> Result<Vec<Persona>, ApiError> {
        (**self).list_personas().await
    }

    async fn start_session(&self, persona: Option<&str>) -> Result<SessionStart, ApiError> {
        (**self).start_session(persona).await
    }

    async fn send_chat_message(
        &self,
        session_id: &str,
        message: &str,
        birth_details: Option<&BirthDetails>,
    ) -> Result<String, ApiError> {
        (**self)
            .send_chat_message(session_id, message, birth_details)
            .await
    }

    async fn list_reviews(&self, persona_slug: &str) -> Result<Vec<Review>, ApiError> {
        (**self).list_reviews(persona_slug).await
    }
}

/// Logging wrapper for any API implementation
pub struct LoggingApi<A> {
    inner: A,
}

impl<A: AstroApi> LoggingApi<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

fn log_outcome<T>(operation: &str, start: Instant, result: &Result<T, ApiError>) {
    let duration = start.elapsed();
    match result {
        Ok(_) => {
            tracing::info!(
                operation,
                duration_ms = %duration.as_millis(),
                "API request completed"
            );
        }
        Err(e) => {
            tracing::warn!(
                operation,
                duration_ms = %duration.as_millis(),
                error = %e.message,
                status = ?e.status_code(),
                "API request failed"
            );
        }
    }
}

#[async_trait]
impl<A: AstroApi> AstroApi for LoggingApi<A> {
    async fn list_personas(&self) -> Result<Vec<Persona>, ApiError> {
        let start = Instant::now();
        let result = self.inner.list_personas().await;
        log_outcome("list_personas", start, &result);
        result
    }

    async fn start_session(&self, persona: Option<&str>) -> Result<SessionStart, ApiError> {
        let start = Instant::now();
        let result = self.inner.start_session(persona).await;
        log_outcome("start_session", start, &result);
        result
    }

    async fn send_chat_message(
        &self,
        session_id: &str,
        message: &str,
        birth_details: Option<&BirthDetails>,
    ) -> Result<String, ApiError> {
        let start = Instant::now();
        let result = self
            .inner
            .send_chat_message(session_id, message, birth_details)
            .await;
        log_outcome("send_chat_message", start, &result);
        result
    }

    async fn list_reviews(&self, persona_slug: &str) -> Result<Vec<Review>, ApiError> {
        let start = Instant::now();
        let result = self.inner.list_reviews(persona_slug).await;
        log_outcome("list_reviews", start, &result);
        result
    }
}
