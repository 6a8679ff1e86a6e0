//! Wire types for the astro backend
//!
//! Records are deserialized as-is and then validated into domain types, so
//! a body with the wrong shape fails here instead of leaking defaults into
//! the UI.

use super::ApiError;
use crate::persona::{Persona, Review};
use crate::state_machine::BirthDetails;
use serde::{Deserialize, Serialize};

/// `{ "data": [...] }` wrapper used by the list endpoints
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Vec<T>,
}

/// Persona as served by `GET /personas`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaRecord {
    pub slug: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub personality: Option<String>,
    pub description: Option<String>,
    /// Number of consultations served so far
    pub usage: Option<u64>,
    pub rating: Option<f64>,
    pub experience: Option<String>,
    pub avatar: Option<String>,
}

/// Review as served by `GET /reviews/persona/{slug}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub user_name: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}

/// Body of `POST /astro/start`
#[derive(Debug, Clone, Serialize)]
pub struct StartSessionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<&'a str>,
}

/// Response of `POST /astro/start`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub session_id: String,
    pub message: String,
}

/// Body of `POST /astro/chat`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest<'a> {
    pub session_id: &'a str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_details: Option<&'a BirthDetails>,
}

/// Response of `POST /astro/chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub message: String,
}

/// A freshly started backend session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStart {
    pub session_id: String,
    /// Greeting to show as the first bot message
    pub message: String,
}

impl TryFrom<StartSessionResponse> for SessionStart {
    type Error = ApiError;

    fn try_from(resp: StartSessionResponse) -> Result<Self, Self::Error> {
        if resp.session_id.trim().is_empty() {
            return Err(ApiError::malformed(
                "Session start response has an empty sessionId",
            ));
        }
        Ok(Self {
            session_id: resp.session_id,
            message: resp.message,
        })
    }
}

impl TryFrom<PersonaRecord> for Persona {
    type Error = ApiError;

    fn try_from(record: PersonaRecord) -> Result<Self, Self::Error> {
        let id = record.slug.trim().to_string();
        let name = record.name.trim().to_string();
        if id.is_empty() || name.is_empty() {
            return Err(ApiError::malformed("Persona is missing its slug or name"));
        }

        let rating = match record.rating {
            Some(r) if r.is_finite() && (0.0..=5.0).contains(&r) => r,
            Some(r) => {
                return Err(ApiError::malformed(format!(
                    "Persona {id} has rating {r} outside 0-5"
                )))
            }
            None => 0.0,
        };

        let specialty = record
            .personality
            .clone()
            .or_else(|| record.tags.first().cloned())
            .unwrap_or_else(|| record.role.clone());

        Ok(Persona {
            id,
            name,
            role: record.role,
            specialty,
            description: record.description.or(record.personality).unwrap_or_default(),
            avatar: record.avatar,
            rating,
            consultations: record.usage.unwrap_or(0),
            experience: record.experience.unwrap_or_default(),
            expertise: record.tags,
            reviews: Vec::new(),
        })
    }
}

impl TryFrom<ReviewRecord> for Review {
    type Error = ApiError;

    fn try_from(record: ReviewRecord) -> Result<Self, Self::Error> {
        let rating = u8::try_from(record.rating)
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or_else(|| {
                ApiError::malformed(format!("Review rating {} outside 1-5", record.rating))
            })?;
        Ok(Review {
            reviewer: record.user_name,
            rating,
            comment: record.comment,
        })
    }
}
