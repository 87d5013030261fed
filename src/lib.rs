pub mod api;
pub mod config;
pub mod distance;
pub mod domain;
pub mod emission;
pub mod logging;
pub mod report;
pub mod trip;
pub mod utils;

pub use distance::DistanceResolver;
pub use emission::{EmissionCalculator, EmissionTable};
pub use trip::{TripPlanner, TripReport, TripRequest};
