//! Immutable session state.
//!
//! A [`Session`] is the complete result of one location load: selection,
//! weather, air quality, projection table, city-model match, confidence,
//! and the fallback notice when the original query could not be served.
//! Loads replace the session wholesale; nothing is patched in place.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    air_quality::AirQualitySample,
    catalog::CityModel,
    geocode::Coordinate,
    projection::ProjectionTable,
    weather::{self, WeatherSample},
};

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// The query the user typed, verbatim.
    pub query: String,
    pub location: Coordinate,
    pub weather: WeatherSample,
    pub air_quality: Option<AirQualitySample>,
    pub projections: ProjectionTable,
    pub city_model: Option<&'static CityModel>,
    /// 0..=100 data-confidence score shown in the UI.
    pub confidence: u8,
    /// User-visible message when the load fell back to demo data.
    pub notice: Option<String>,
    /// Monotonic load counter; a completion is surfaced only while its
    /// generation is still the latest.
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
}

/// Confidence score for the data-sources panel: per-source base rate,
/// minus a penalty when air quality is missing.
pub fn confidence_score(sample: &WeatherSample, has_air_quality: bool) -> u8 {
    let mut confidence: i32 = if sample.is_estimated {
        45
    } else if sample.source == weather::SOURCE_OPEN_METEO {
        90
    } else {
        85
    };
    if !has_air_quality {
        confidence -= 10;
    }
    confidence.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn confidence_rates_by_source() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sample = crate::weather::estimate(40.0, 6, &mut rng);
        assert_eq!(confidence_score(&sample, true), 45);
        assert_eq!(confidence_score(&sample, false), 35);

        sample.is_estimated = false;
        sample.source = crate::weather::SOURCE_OPEN_METEO.to_string();
        assert_eq!(confidence_score(&sample, true), 90);
        assert_eq!(confidence_score(&sample, false), 80);

        sample.source = crate::weather::SOURCE_OPENWEATHERMAP.to_string();
        assert_eq!(confidence_score(&sample, true), 85);
    }
}
