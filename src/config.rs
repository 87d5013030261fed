use dotenv::dotenv;
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

pub mod constant {
    pub const MIN_QUERY_LEN: usize = 3;
    pub const SEARCH_LIMIT: usize = 5;
    pub const CO2_PER_TREE_KG: f64 = 22.0;
    pub const REFERENCE_MODE: &str = "car";

    pub const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
    pub const OSRM_BASE_URL: &str = "https://router.project-osrm.org/route/v1/driving";
    pub const USER_AGENT: &str = "carbon-trip/0.1 (+https://github.com/carbon-trip)";
    pub const COUNTRY_CODES: &str = "br";
    pub const ACCEPT_LANGUAGE: &str = "pt-BR";
    pub const HTTP_TIMEOUT_SECS: u64 = 30;
}

/// Endpoints and request settings for the geocoding and routing services.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoConfig {
    pub nominatim_base_url: String,
    pub osrm_base_url: String,
    pub user_agent: String,
    pub country_codes: String,
    pub accept_language: String,
    pub timeout: Duration,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            nominatim_base_url: constant::NOMINATIM_BASE_URL.to_string(),
            osrm_base_url: constant::OSRM_BASE_URL.to_string(),
            user_agent: constant::USER_AGENT.to_string(),
            country_codes: constant::COUNTRY_CODES.to_string(),
            accept_language: constant::ACCEPT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(constant::HTTP_TIMEOUT_SECS),
        }
    }
}

impl GeoConfig {
    /// Reads overrides from the process environment (and `.env`, if present).
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str, fallback: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
        };

        let timeout = match lookup("GEO_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(
                        "GEO_TIMEOUT_SECS='{}' is not a positive integer, using {}s",
                        raw,
                        constant::HTTP_TIMEOUT_SECS
                    );
                    defaults.timeout
                }
            },
            None => defaults.timeout,
        };

        let config = Self {
            nominatim_base_url: read("NOMINATIM_BASE_URL", defaults.nominatim_base_url)
                .trim_end_matches('/')
                .to_string(),
            osrm_base_url: read("OSRM_BASE_URL", defaults.osrm_base_url)
                .trim_end_matches('/')
                .to_string(),
            user_agent: read("GEO_USER_AGENT", defaults.user_agent),
            country_codes: read("GEO_COUNTRY_CODES", defaults.country_codes),
            accept_language: read("GEO_ACCEPT_LANGUAGE", defaults.accept_language),
            timeout,
        };
        debug!("Geo config: {:?}", config);
        config
    }
}
