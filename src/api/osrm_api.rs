use tracing::{debug, error, trace};

use super::client::GeoClient;
use super::error::ProviderError;
use super::types::OsrmRouteResponse;
use crate::domain::types::Place;
use crate::utils::snippet;

impl GeoClient {
    /// Driving distance in meters along the primary route between two places.
    pub async fn route_distance_m(&self, from: &Place, to: &Place) -> Result<f64, ProviderError> {
        // OSRM wants longitude,latitude in that order
        let url = format!(
            "{}/{},{};{},{}?overview=false",
            self.config.osrm_base_url, from.longitude, from.latitude, to.longitude, to.latitude
        );
        debug!(
            "Sending route request {} -> {}: {}",
            from.display_name, to.display_name, url
        );

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                error!(
                    "OSRM request failed for {} -> {}: {}",
                    from.display_name, to.display_name, e
                );
                return Err(e.into());
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(t) => t,
            Err(e) => {
                error!("Failed to read OSRM response body: {}", e);
                return Err(e.into());
            }
        };
        trace!("OSRM response: HTTP {} ({} bytes)", status, text.len());

        // Routing failures come back as 4xx with a JSON `code`, so try the body first.
        match parse_route_response(&text) {
            Err(ProviderError::Parse(e)) if !status.is_success() => {
                error!("OSRM returned HTTP {}: {}", status, snippet(&text));
                trace!("Unparseable OSRM body: {}", e);
                Err(ProviderError::Status {
                    status: status.as_u16(),
                    body: text,
                })
            }
            other => other,
        }
    }
}

/// Length of the first route in a routing response, in meters.
pub fn parse_route_response(body: &str) -> Result<f64, ProviderError> {
    let parsed: OsrmRouteResponse = serde_json::from_str(body)?;

    if parsed.code != "Ok" {
        return Err(ProviderError::NoRoute {
            message: parsed.message.unwrap_or_default(),
            code: parsed.code,
        });
    }

    let route = parsed.routes.first().ok_or_else(|| ProviderError::NoRoute {
        code: parsed.code.clone(),
        message: "response contained no routes".to_string(),
    })?;

    if !route.distance.is_finite() || route.distance < 0.0 {
        return Err(ProviderError::NoRoute {
            code: parsed.code.clone(),
            message: format!("unusable route distance {}", route.distance),
        });
    }

    Ok(route.distance)
}
