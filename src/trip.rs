use serde::Serialize;
use thiserror::Error;
use tracing::{info, info_span, Instrument};

use crate::distance::{DistanceResolver, GeoProvider};
use crate::domain::types::{CalculationResult, ModeEmission};
use crate::emission::EmissionCalculator;

#[derive(Error, Debug, PartialEq)]
pub enum TripError {
    #[error("Origin is required")]
    EmptyOrigin,

    #[error("Destination is required")]
    EmptyDestination,

    #[error("Unknown transport mode '{0}'")]
    UnknownMode(String),

    #[error("Distance must be a positive number of kilometers, got {0}")]
    InvalidDistance(f64),

    #[error("Could not find a road distance between '{origin}' and '{destination}'; enter the distance manually")]
    DistanceNotFound { origin: String, destination: String },
}

#[derive(Debug, Clone)]
pub struct TripRequest {
    pub origin: String,
    pub destination: String,
    pub mode: String,
    /// Skips the distance lookup when set.
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceSource {
    Manual,
    Routed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripReport {
    pub origin: String,
    pub destination: String,
    pub mode: String,
    pub distance_km: f64,
    pub distance_source: DistanceSource,
    pub result: CalculationResult,
    pub comparison: Vec<ModeEmission>,
    pub tree_equivalent: u64,
}

/// Validates a trip, obtains its distance and runs the emission calculations.
pub struct TripPlanner<P> {
    calculator: EmissionCalculator,
    resolver: DistanceResolver<P>,
}

impl<P: GeoProvider> TripPlanner<P> {
    pub fn new(calculator: EmissionCalculator, resolver: DistanceResolver<P>) -> Self {
        Self {
            calculator,
            resolver,
        }
    }

    pub fn calculator(&self) -> &EmissionCalculator {
        &self.calculator
    }

    pub fn resolver(&self) -> &DistanceResolver<P> {
        &self.resolver
    }

    pub async fn plan(&self, request: &TripRequest) -> Result<TripReport, TripError> {
        let origin = request.origin.trim();
        let destination = request.destination.trim();
        let mode = request.mode.trim();

        if origin.is_empty() {
            return Err(TripError::EmptyOrigin);
        }
        if destination.is_empty() {
            return Err(TripError::EmptyDestination);
        }
        if !self.calculator.table().contains(mode) {
            return Err(TripError::UnknownMode(mode.to_string()));
        }

        let (distance_km, distance_source) = match request.distance_km {
            Some(km) if km.is_finite() && km > 0.0 => (km, DistanceSource::Manual),
            Some(km) => return Err(TripError::InvalidDistance(km)),
            None => match self
                .resolver
                .find_distance(origin, destination)
                .instrument(info_span!("find_distance", origin, destination))
                .await
            {
                Some(km) => (km, DistanceSource::Routed),
                None => {
                    return Err(TripError::DistanceNotFound {
                        origin: origin.to_string(),
                        destination: destination.to_string(),
                    })
                }
            },
        };

        let result = self.calculator.calculate(mode, distance_km);
        info!(
            "{} -> {} by {}: {:.1} km, {:.2} kg CO2",
            origin, destination, mode, distance_km, result.emission_kg
        );

        Ok(TripReport {
            origin: origin.to_string(),
            destination: destination.to_string(),
            mode: mode.to_string(),
            distance_km,
            distance_source,
            tree_equivalent: self.calculator.calculate_tree_equivalent(result.emission_kg),
            comparison: self.calculator.calculate_all_modes(distance_km),
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::resolver::tests::FakeProvider;

    fn planner() -> TripPlanner<FakeProvider> {
        TripPlanner::new(
            EmissionCalculator::default(),
            DistanceResolver::new(FakeProvider::brazil()),
        )
    }

    fn request(origin: &str, destination: &str, mode: &str, km: Option<f64>) -> TripRequest {
        TripRequest {
            origin: origin.to_string(),
            destination: destination.to_string(),
            mode: mode.to_string(),
            distance_km: km,
        }
    }

    #[tokio::test]
    async fn manual_distance_skips_lookup() {
        let planner = planner();
        let report = planner
            .plan(&request("Here", "There", "bus", Some(100.0)))
            .await
            .unwrap();

        assert_eq!(report.distance_source, DistanceSource::Manual);
        assert!((report.result.emission_kg - 8.9).abs() < 1e-9);
        assert_eq!(report.result.savings.percentage, 25.8);
        assert_eq!(report.comparison.len(), 4);
        assert_eq!(report.comparison[0].mode_id, "bicycle");
        assert_eq!(report.tree_equivalent, 1);
        assert_eq!(planner.resolver().provider().searches(), 0);
    }

    #[tokio::test]
    async fn routed_distance() {
        let report = planner()
            .plan(&request(" Sao Paulo ", "Campinas", "car", None))
            .await
            .unwrap();
        assert_eq!(report.origin, "Sao Paulo");
        assert_eq!(report.distance_km, 95.7);
        assert_eq!(report.distance_source, DistanceSource::Routed);
        assert!((report.result.emission_kg - 11.484).abs() < 1e-9);
    }

    #[tokio::test]
    async fn validation_errors() {
        let planner = planner();
        assert_eq!(
            planner.plan(&request("  ", "Campinas", "car", None)).await,
            Err(TripError::EmptyOrigin)
        );
        assert_eq!(
            planner.plan(&request("Campinas", "", "car", None)).await,
            Err(TripError::EmptyDestination)
        );
        assert_eq!(
            planner.plan(&request("a", "b", "plane", Some(10.0))).await,
            Err(TripError::UnknownMode("plane".to_string()))
        );
        assert_eq!(
            planner.plan(&request("a", "b", "car", Some(0.0))).await,
            Err(TripError::InvalidDistance(0.0))
        );
        assert!(matches!(
            planner.plan(&request("a", "b", "car", Some(f64::NAN))).await,
            Err(TripError::InvalidDistance(_))
        ));
    }

    #[tokio::test]
    async fn missing_distance_asks_for_manual_entry() {
        let err = planner()
            .plan(&request("Campinas", "Atlantis", "car", None))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TripError::DistanceNotFound {
                origin: "Campinas".to_string(),
                destination: "Atlantis".to_string()
            }
        );
    }
}
