//! Persona catalog loader with a built-in fallback

use super::Persona;
use crate::api::AstroApi;

/// Where a loaded catalog came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Remote,
    /// Backend unavailable; `reason` is the failure that triggered the fallback
    Fallback { reason: String },
}

/// Result of loading the catalog. `personas` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogLoad {
    pub personas: Vec<Persona>,
    pub source: CatalogSource,
}

impl CatalogLoad {
    /// Banner for the selection screen when cached data is shown
    pub fn notice(&self) -> Option<&'static str> {
        match self.source {
            CatalogSource::Remote => None,
            CatalogSource::Fallback { .. } => {
                Some("Failed to load personas from server. Using cached data.")
            }
        }
    }
}

/// Loads personas from the backend, falling back to a fixed set
pub struct PersonaCatalog<A> {
    api: A,
    fallback: Vec<Persona>,
}

impl<A: AstroApi> PersonaCatalog<A> {
    pub fn new(api: A, fallback: Vec<Persona>) -> Self {
        Self { api, fallback }
    }

    pub async fn load(&self) -> CatalogLoad {
        let reason = match self.api.list_personas().await {
            Ok(personas) if !personas.is_empty() => {
                tracing::info!(count = personas.len(), "Loaded persona catalog");
                return CatalogLoad {
                    personas,
                    source: CatalogSource::Remote,
                };
            }
            Ok(_) => "Backend returned no personas".to_string(),
            Err(e) => e.message,
        };

        tracing::warn!(error = %reason, "Falling back to built-in personas");
        CatalogLoad {
            personas: self.fallback.clone(),
            source: CatalogSource::Fallback { reason },
        }
    }

    /// Persona with its reviews refreshed from the backend.
    ///
    /// Keeps the reviews it already has if the request fails or returns none.
    pub async fn load_reviews(&self, persona: &Persona) -> Persona {
        let mut detailed = persona.clone();
        match self.api.list_reviews(&persona.id).await {
            Ok(reviews) if !reviews.is_empty() => detailed.reviews = reviews,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(persona = %persona.id, error = %e.message, "Failed to load reviews");
            }
        }
        detailed
    }
}
