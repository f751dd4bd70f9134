use thiserror::Error;

/// Failures raised by the geocoding, weather, and air-quality clients.
///
/// None of these are fatal at the application level: geocode and weather
/// failures convert into the demo-data fallback flow, and air-quality
/// failures degrade to an empty panel.
#[derive(Debug, Error)]
pub enum Error {
    #[error("location '{0}' not found")]
    GeocodeNotFound(String),

    #[error("geocoding service error: {0}")]
    GeocodeService(String),

    #[error("weather request to {provider} timed out after {timeout_ms} ms")]
    WeatherTimeout {
        provider: &'static str,
        timeout_ms: u64,
    },

    #[error("weather service error from {provider}: {message}")]
    WeatherService {
        provider: &'static str,
        message: String,
    },

    #[error("air quality data unavailable: {0}")]
    AirQualityUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
