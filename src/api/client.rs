use reqwest::Client;
use tracing::info;

use super::error::ProviderError;
use crate::config::GeoConfig;

/// Shared HTTP client for the geocoding and routing services.
#[derive(Debug, Clone)]
pub struct GeoClient {
    pub(crate) client: Client,
    pub(crate) config: GeoConfig,
}

impl GeoClient {
    pub fn new(config: GeoConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        info!(
            "HTTP client ready (geocoder: {}, router: {}, timeout: {:?})",
            config.nominatim_base_url, config.osrm_base_url, config.timeout
        );
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }
}
