use tracing::{debug, error, trace, warn};

use super::client::GeoClient;
use super::error::ProviderError;
use super::types::NominatimRecord;
use crate::config::constant::SEARCH_LIMIT;
use crate::domain::types::Place;
use crate::utils::{normalize_name, snippet};

impl GeoClient {
    /// Settlement search, candidates in the geocoder's relevance order.
    pub async fn search_settlements(&self, query: &str) -> Result<Vec<Place>, ProviderError> {
        let url = format!("{}/search", self.config.nominatim_base_url);
        let limit = SEARCH_LIMIT.to_string();
        debug!("Sending geocoding request for '{}' to {}", query, url);

        let response = match self
            .client
            .get(&url)
            .header("Accept-Language", self.config.accept_language.as_str())
            .query(&[
                ("format", "json"),
                ("q", query),
                ("countrycodes", self.config.country_codes.as_str()),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
                ("featuretype", "settlement"),
            ])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                error!("Geocoding request for '{}' failed: {}", query, e);
                return Err(e.into());
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(t) => t,
            Err(e) => {
                error!("Failed to read geocoder response body for '{}': {}", query, e);
                return Err(e.into());
            }
        };
        trace!("Geocoding response: HTTP {} ({} bytes)", status, text.len());

        if !status.is_success() {
            error!(
                "Geocoder returned HTTP {} for '{}': {}",
                status,
                query,
                snippet(&text)
            );
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_search_response(&text)
    }
}

/// Turns a geocoder response body into places, skipping records with unusable
/// coordinates or no name.
pub fn parse_search_response(body: &str) -> Result<Vec<Place>, ProviderError> {
    let records: Vec<NominatimRecord> = serde_json::from_str(body).map_err(|e| {
        error!(
            "Failed to parse geocoder JSON: {} (body: {})",
            e,
            snippet(body)
        );
        e
    })?;

    let places = records
        .into_iter()
        .filter_map(|record| match record_to_place(&record) {
            Ok(place) => Some(place),
            Err(e) => {
                warn!("Skipping geocoder record: {}", e);
                None
            }
        })
        .collect();
    Ok(places)
}

fn record_to_place(record: &NominatimRecord) -> Result<Place, ProviderError> {
    let latitude = parse_coordinate(&record.lat, 90.0)?;
    let longitude = parse_coordinate(&record.lon, 180.0)?;
    let display_name = record
        .label()
        .ok_or_else(|| ProviderError::Unnamed(format!("{},{}", record.lat, record.lon)))?;

    Ok(Place {
        normalized_query_key: normalize_name(&display_name),
        display_name,
        latitude,
        longitude,
    })
}

fn parse_coordinate(raw: &str, bound: f64) -> Result<f64, ProviderError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= bound => Ok(v),
        _ => Err(ProviderError::InvalidCoordinate(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::{client_for, serve_once};

    const CAMPINAS: &str = r#"[
        {
            "place_id": 1,
            "lat": "-22.9056391",
            "lon": "-47.0608215",
            "name": "Campinas",
            "display_name": "Campinas, Região Imediata de Campinas, São Paulo, Brasil",
            "address": {"city": "Campinas", "state": "São Paulo", "country": "Brasil"}
        },
        {
            "lat": "-23.0",
            "lon": "-46.5",
            "name": "Joaquim Egídio",
            "address": {"village": "Joaquim Egídio", "municipality": "Campinas", "state": "São Paulo"}
        },
        {
            "lat": "-10.0",
            "lon": "-50.0",
            "name": "Campinas",
            "address": {"town": "", "municipality": "Campinas do Sul"}
        },
        {
            "lat": "not-a-number",
            "lon": "-47.0",
            "name": "Broken"
        }
    ]"#;

    #[test]
    fn picks_locality_by_priority() {
        let places = parse_search_response(CAMPINAS).unwrap();
        assert_eq!(places.len(), 3);

        assert_eq!(places[0].display_name, "Campinas, São Paulo");
        assert_eq!(places[0].normalized_query_key, "campinas, são paulo");
        assert!((places[0].latitude + 22.9056391).abs() < 1e-9);
        assert!((places[0].longitude + 47.0608215).abs() < 1e-9);

        // village beats municipality
        assert_eq!(places[1].display_name, "Joaquim Egídio, São Paulo");
        // empty town is skipped, no state suffix
        assert_eq!(places[2].display_name, "Campinas do Sul");
    }

    #[test]
    fn falls_back_to_record_label() {
        let body = r#"[{"lat": "1", "lon": "2", "display_name": "Somewhere"}]"#;
        let places = parse_search_response(body).unwrap();
        assert_eq!(places[0].display_name, "Somewhere");
    }

    #[test]
    fn state_equal_to_locality_is_not_repeated() {
        let body = r#"[{"lat": "-15.79", "lon": "-47.88", "address": {"city": "Brasília", "state": "Brasília"}}]"#;
        let places = parse_search_response(body).unwrap();
        assert_eq!(places[0].display_name, "Brasília");
    }

    #[test]
    fn rejects_malformed_body() {
        assert!(matches!(
            parse_search_response("{\"error\": \"rate limited\"}"),
            Err(ProviderError::Parse(_))
        ));
        assert!(parse_search_response("[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_request_carries_settlement_filters() {
        let (base, request) = serve_once("200 OK", CAMPINAS).await;
        let client = client_for(&base);

        let places = client.search_settlements("São Paulo").await.unwrap();
        assert_eq!(places.len(), 3);
        assert_eq!(places[0].display_name, "Campinas, São Paulo");

        let head = request.await.unwrap();
        assert!(
            head.starts_with(
                "GET /search?format=json&q=S%C3%A3o+Paulo&countrycodes=br\
                 &addressdetails=1&limit=5&featuretype=settlement HTTP/1.1\r\n"
            ),
            "{}",
            head
        );
        let head = head.to_lowercase();
        assert!(head.contains("\r\naccept-language: pt-br\r\n"), "{}", head);
        assert!(head.contains("\r\nuser-agent: carbon-trip/"), "{}", head);
    }

    #[tokio::test]
    async fn search_error_status_keeps_body() {
        let (base, _request) = serve_once("429 Too Many Requests", "slow down").await;
        let client = client_for(&base);

        match client.search_settlements("Campinas").await {
            Err(ProviderError::Status { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn out_of_range_coordinates_are_dropped() {
        let body = r#"[{"lat": "95", "lon": "2", "name": "North of north"}]"#;
        assert!(parse_search_response(body).unwrap().is_empty());
    }
}
