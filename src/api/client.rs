//! reqwest implementation of the astro backend API

use super::types::{
    ChatRequest, ChatResponse, DataEnvelope, PersonaRecord, ReviewRecord, SessionStart,
    StartSessionRequest, StartSessionResponse,
};
use super::{ApiError, AstroApi};
use crate::config::AppConfig;
use crate::persona::{Persona, Review};
use crate::state_machine::BirthDetails;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

const PERSONAS_PATH: &str = "/personas";
const START_PATH: &str = "/astro/start";
const CHAT_PATH: &str = "/astro/chat";
const REVIEWS_PATH: &str = "/reviews/persona";

/// HTTP client for the astro backend
#[derive(Clone)]
pub struct HttpAstroApi {
    client: Client,
    base_url: String,
}

impl HttpAstroApi {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn reviews_url(&self, persona_slug: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.url(REVIEWS_PATH))
            .map_err(|e| ApiError::config(format!("Invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::config("Base URL cannot carry a path"))?
            .push(persona_slug);
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                ApiError::network(format!("Connection failed: {e}"))
            } else {
                ApiError::network(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response: {e}")))?;

        decode_response(status.as_u16(), &body)
    }
}

/// Parse the body first, then judge the status.
///
/// Non-2xx carries the body's `message` when there is one. A 2xx body that
/// does not match `T` is `Malformed`.
pub(crate) fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if !(200..300).contains(&status) {
        let message = parsed
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map_or_else(
                || format!("Request failed with status {status}"),
                ToString::to_string,
            );
        return Err(ApiError::status(status, message));
    }

    let value = parsed.ok_or_else(|| ApiError::malformed("Response body is not valid JSON"))?;
    serde_json::from_value(value)
        .map_err(|e| ApiError::malformed(format!("Unexpected response shape: {e}")))
}

#[async_trait]
impl AstroApi for HttpAstroApi {
    async fn list_personas(&self) -> Result<Vec<Persona>, ApiError> {
        let envelope: DataEnvelope<PersonaRecord> =
            self.execute(self.client.get(self.url(PERSONAS_PATH))).await?;
        envelope.data.into_iter().map(Persona::try_from).collect()
    }

    async fn start_session(&self, persona: Option<&str>) -> Result<SessionStart, ApiError> {
        let body = StartSessionRequest { persona };
        let response: StartSessionResponse = self
            .execute(self.client.post(self.url(START_PATH)).json(&body))
            .await?;
        SessionStart::try_from(response)
    }

    async fn send_chat_message(
        &self,
        session_id: &str,
        message: &str,
        birth_details: Option<&BirthDetails>,
    ) -> Result<String, ApiError> {
        let body = ChatRequest {
            session_id,
            message,
            birth_details,
        };
        let response: ChatResponse = self
            .execute(self.client.post(self.url(CHAT_PATH)).json(&body))
            .await?;
        Ok(response.message)
    }

    async fn list_reviews(&self, persona_slug: &str) -> Result<Vec<Review>, ApiError> {
        let url = self.reviews_url(persona_slug)?;
        let envelope: DataEnvelope<ReviewRecord> = self.execute(self.client.get(url)).await?;
        envelope.data.into_iter().map(Review::try_from).collect()
    }
}
