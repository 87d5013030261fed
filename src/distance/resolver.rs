use futures::join;
use tracing::{debug, info, warn};

use super::cache::{CityPairKey, DistanceCache, PlaceCache};
use super::provider::GeoProvider;
use crate::config::constant::MIN_QUERY_LEN;
use crate::domain::types::Place;
use crate::utils::{normalize_name, round_to};

/// Turns place names into a driving distance, memoizing both the geocoding
/// results and the computed distances for the lifetime of the resolver.
///
/// None of the public operations fail: network and parse errors are logged
/// and reported as an empty result or `None`. Only successes are cached, so a
/// failed lookup is retried on the next call.
pub struct DistanceResolver<P> {
    provider: P,
    places: PlaceCache,
    distances: DistanceCache,
}

impl<P: GeoProvider> DistanceResolver<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            places: PlaceCache::default(),
            distances: DistanceCache::default(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Candidate places for an autocomplete-style query. Every candidate is
    /// cached under its display name and, if not taken yet, its bare locality.
    pub async fn search_places(&self, query: &str) -> Vec<Place> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            debug!("Query '{}' too short, skipping geocoder", query);
            return Vec::new();
        }

        let candidates = match self.provider.search(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Place search for '{}' failed: {}", query, e);
                return Vec::new();
            }
        };
        debug!("Place search '{}' returned {} candidates", query, candidates.len());

        for place in &candidates {
            self.places
                .insert_if_absent(place.normalized_query_key.clone(), place.clone())
                .await;

            if let Some((locality, _)) = place.display_name.split_once(", ") {
                let key = normalize_name(locality);
                self.places
                    .insert_if_absent(
                        key.clone(),
                        Place {
                            normalized_query_key: key,
                            ..place.clone()
                        },
                    )
                    .await;
            }
        }

        candidates
    }

    pub async fn resolve_place(&self, name: &str) -> Option<Place> {
        let key = normalize_name(name);
        if let Some(place) = self.places.get(&key).await {
            debug!("[CACHE HIT] place '{}'", key);
            return Some(place);
        }

        let top = self.search_places(name).await.into_iter().next();
        match top {
            Some(candidate) => {
                let place = Place {
                    normalized_query_key: key.clone(),
                    ..candidate
                };
                self.places.insert_if_absent(key.clone(), place).await;
                // Another task may have filled the key meanwhile; its value stands.
                self.places.get(&key).await
            }
            None => {
                warn!("Could not resolve place '{}'", name.trim());
                None
            }
        }
    }

    /// Driving distance in km, one decimal. Not cached here.
    pub async fn resolve_route_distance(&self, a: &Place, b: &Place) -> Option<f64> {
        match self.provider.route_distance_m(a, b).await {
            Ok(meters) => Some(round_to(meters / 1000.0, 1)),
            Err(e) => {
                warn!(
                    "No route between {} ({}, {}) and {} ({}, {}): {}",
                    a.display_name, a.latitude, a.longitude, b.display_name, b.latitude, b.longitude, e
                );
                None
            }
        }
    }

    pub async fn find_distance(&self, origin: &str, destination: &str) -> Option<f64> {
        let key = CityPairKey::new(&normalize_name(origin), &normalize_name(destination));
        if let Some(km) = self.distances.get(&key).await {
            debug!("[CACHE HIT] {} = {} km", key, km);
            return Some(km);
        }

        let (from, to) = join!(self.resolve_place(origin), self.resolve_place(destination));
        let (from, to) = match (from, to) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                warn!(
                    "Skipping route lookup for '{}' -> '{}': place not resolved",
                    origin.trim(),
                    destination.trim()
                );
                return None;
            }
        };

        let km = self.resolve_route_distance(&from, &to).await?;
        self.distances.insert_if_absent(key.clone(), km).await;
        info!(
            "Distance {} -> {}: {} km",
            from.display_name, to.display_name, km
        );
        self.distances.get(&key).await
    }

    pub async fn cached_places(&self) -> usize {
        self.places.len().await
    }

    pub async fn cached_distances(&self) -> usize {
        self.distances.len().await
    }
}
