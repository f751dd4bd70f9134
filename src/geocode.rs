//! Free-text place resolution through Nominatim.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// A resolved place. Immutable once obtained; held as the session's
/// current selection until the next successful load replaces it.
#[derive(Debug, Clone, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

pub struct Geocoder<'a> {
    client: &'a Client,
    base_url: &'a str,
    timeout: Duration,
}

impl<'a> Geocoder<'a> {
    pub fn new(client: &'a Client, base_url: &'a str, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            timeout,
        }
    }

    /// Resolve a query to its best match. An empty result list is
    /// [`Error::GeocodeNotFound`]; transport and parse failures are
    /// [`Error::GeocodeService`].
    pub async fn resolve(&self, query: &str) -> Result<Coordinate> {
        let url = format!("{}/search", self.base_url);
        let places = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
            .query(&[
                ("format", "json"),
                ("q", query),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .send()
            .await
            .map_err(|err| Error::GeocodeService(err.to_string()))?
            .error_for_status()
            .map_err(|err| Error::GeocodeService(err.to_string()))?
            .json::<Vec<NominatimPlace>>()
            .await
            .map_err(|err| Error::GeocodeService(err.to_string()))?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| Error::GeocodeNotFound(query.to_string()))?;
        let coordinate = parse_place(place)?;
        debug!(name = %coordinate.name, lat = coordinate.lat, lng = coordinate.lng, "geocoded query");
        Ok(coordinate)
    }
}

fn parse_place(place: NominatimPlace) -> Result<Coordinate> {
    let lat = place
        .lat
        .parse::<f64>()
        .map_err(|err| Error::GeocodeService(format!("bad latitude '{}': {err}", place.lat)))?;
    let lng = place
        .lon
        .parse::<f64>()
        .map_err(|err| Error::GeocodeService(format!("bad longitude '{}': {err}", place.lon)))?;
    Ok(Coordinate {
        lat,
        lng,
        name: place.display_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_coordinates_parse_from_strings() {
        // Nominatim returns lat/lon as JSON strings.
        let json = r#"[{"lat": "48.8588897", "lon": "2.3200410", "display_name": "Paris, France"}]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(json).unwrap();
        let coordinate = parse_place(places.into_iter().next().unwrap()).unwrap();
        assert!((coordinate.lat - 48.8588897).abs() < 1e-9);
        assert!((coordinate.lng - 2.3200410).abs() < 1e-9);
        assert_eq!(coordinate.name, "Paris, France");
    }

    #[test]
    fn malformed_coordinates_are_service_errors() {
        let place = NominatimPlace {
            lat: "not-a-number".to_string(),
            lon: "2.32".to_string(),
            display_name: "Broken".to_string(),
        };
        assert!(matches!(parse_place(place), Err(Error::GeocodeService(_))));
    }
}
