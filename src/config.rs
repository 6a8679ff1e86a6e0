//! Runtime configuration
//!
//! Everything is read from the environment once at startup and passed down
//! explicitly.

use std::time::Duration;

/// Base URL used when `ASTRO_ENV=development`
pub const DEVELOPMENT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Base URL used for every other environment
pub const PRODUCTION_BASE_URL: &str = "https://astro-backend-xi.vercel.app/api/v1";

/// Configuration for the backend API and chat sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// API root, without a trailing slash
    pub base_url: String,
    /// Whether chat sessions gate follow-up messages behind the birth-details form
    pub require_birth_details: bool,
    /// Per-request timeout. `None` lets a hung request wait forever.
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: PRODUCTION_BASE_URL.to_string(),
            require_birth_details: true,
            request_timeout: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (tests pass a map here)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = resolve_base_url(
            lookup("ASTRO_API_BASE_URL").as_deref(),
            lookup("ASTRO_ENV").as_deref(),
        );

        let require_birth_details = lookup("ASTRO_REQUIRE_DETAILS")
            .map_or(true, |v| {
                !matches!(
                    v.trim().to_ascii_lowercase().as_str(),
                    "0" | "false" | "no" | "off"
                )
            });

        let request_timeout = lookup("ASTRO_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            base_url,
            require_birth_details,
            request_timeout,
        }
    }
}

/// Explicit override first, then the development default, then production.
fn resolve_base_url(override_url: Option<&str>, env: Option<&str>) -> String {
    if let Some(url) = override_url.map(str::trim).filter(|u| !u.is_empty()) {
        return url.trim_end_matches('/').to_string();
    }
    match env {
        Some(e) if e.eq_ignore_ascii_case("development") => DEVELOPMENT_BASE_URL.to_string(),
        _ => PRODUCTION_BASE_URL.to_string(),
    }
}
