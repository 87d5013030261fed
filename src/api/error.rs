use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Underlying request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    // OSRM answers "NoRoute", "NoSegment", "InvalidQuery", ... instead of "Ok"
    #[error("Routing service returned '{code}': {message}")]
    NoRoute { code: String, message: String },

    #[error("Invalid coordinate '{0}'")]
    InvalidCoordinate(String),

    #[error("Geocoder record at {0} has no name")]
    Unnamed(String),
}
