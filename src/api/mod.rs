pub mod client;
pub mod error;
pub mod nominatim_api;
pub mod osrm_api;
pub mod types;

pub use client::GeoClient;
pub use error::ProviderError;
pub use nominatim_api::parse_search_response;
pub use osrm_api::parse_route_response;
