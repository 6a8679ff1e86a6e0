//! Astrologer personas and the catalog that serves them

mod builtin;
mod catalog;

pub use builtin::builtin_personas;
pub use catalog::{CatalogLoad, CatalogSource, PersonaCatalog};

/// A selectable astrologer identity
#[derive(Debug, Clone, PartialEq)]
pub struct Persona {
    /// Backend slug
    pub id: String,
    pub name: String,
    pub role: String,
    pub specialty: String,
    pub description: String,
    pub avatar: Option<String>,
    /// Average rating, 0 to 5
    pub rating: f64,
    pub consultations: u64,
    pub experience: String,
    pub expertise: Vec<String>,
    pub reviews: Vec<Review>,
}

impl Persona {
    /// Whole stars earned, for star rows
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=5
    pub fn filled_stars(&self) -> usize {
        self.rating.clamp(0.0, 5.0).floor() as usize
    }
}

/// A user review of a persona
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub reviewer: String,
    /// Whole stars, 1 to 5
    pub rating: u8,
    pub comment: String,
}
