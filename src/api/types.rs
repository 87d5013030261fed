use serde::Deserialize;

// --- Nominatim /search?format=json&addressdetails=1 ---

#[derive(Debug, Deserialize)]
pub struct NominatimRecord {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
pub struct NominatimAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub state: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl NominatimRecord {
    /// First locality field present, in order city, town, village, municipality,
    /// then the record's own label.
    pub fn locality(&self) -> Option<&str> {
        let address = &self.address;
        non_empty(&address.city)
            .or_else(|| non_empty(&address.town))
            .or_else(|| non_empty(&address.village))
            .or_else(|| non_empty(&address.municipality))
            .or_else(|| non_empty(&self.name))
            .or_else(|| non_empty(&self.display_name))
    }

    /// "Locality, State", or just the locality when no state is known.
    pub fn label(&self) -> Option<String> {
        let locality = self.locality()?;
        Some(match non_empty(&self.address.state) {
            Some(state) if state != locality => format!("{}, {}", locality, state),
            _ => locality.to_string(),
        })
    }
}

// --- OSRM /route/v1/driving/{coords}?overview=false ---

#[derive(Debug, Deserialize)]
pub struct OsrmRouteResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    /// Meters.
    pub distance: f64,
}
