use async_trait::async_trait;

use crate::api::{GeoClient, ProviderError};
use crate::domain::types::Place;

/// The two network lookups the resolver depends on.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Candidate places for a free-text query, most relevant first.
    async fn search(&self, query: &str) -> Result<Vec<Place>, ProviderError>;

    /// Driving distance in meters along the primary route.
    async fn route_distance_m(&self, from: &Place, to: &Place) -> Result<f64, ProviderError>;
}

#[async_trait]
impl GeoProvider for GeoClient {
    async fn search(&self, query: &str) -> Result<Vec<Place>, ProviderError> {
        self.search_settlements(query).await
    }

    async fn route_distance_m(&self, from: &Place, to: &Place) -> Result<f64, ProviderError> {
        GeoClient::route_distance_m(self, from, to).await
    }
}
