pub mod cache;
pub mod provider;
pub mod resolver;

pub use cache::CityPairKey;
pub use provider::GeoProvider;
pub use resolver::DistanceResolver;
