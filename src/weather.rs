//! Current weather: live candidates with an estimated fallback.
//!
//! Candidate APIs are tried strictly in list order (Open-Meteo, then
//! OpenWeatherMap); the first success wins, each attempt bounded by the
//! configured timeout. There is no racing, no retry, no backoff. When
//! every candidate fails, the caller synthesizes a sample from latitude
//! and season via [`estimate`], which never fails.

use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::Endpoints,
    error::{Error, Result},
};

pub const SOURCE_OPEN_METEO: &str = "Open-Meteo";
pub const SOURCE_OPENWEATHERMAP: &str = "OpenWeatherMap";
pub const SOURCE_ESTIMATED: &str = "Estimated";

#[derive(Debug, Clone, Serialize)]
pub struct WeatherSample {
    pub temperature: f64,
    pub humidity: Option<f64>,
    pub description: String,
    pub wind_speed: Option<f64>,
    pub pressure: Option<f64>,
    pub feels_like: Option<f64>,
    pub uv_index: Option<f64>,
    pub source: String,
    pub is_estimated: bool,
}

/// Seasonal temperature offset in degrees C. Solstice months swing the
/// baseline by 8 degrees, equinox months by 2, with the sign flipped in
/// the southern hemisphere.
fn seasonal_offset(lat: f64, month: u32) -> f64 {
    let offset = match month {
        6..=8 => 8.0,
        12 | 1 | 2 => -8.0,
        3..=5 => 2.0,
        _ => -2.0,
    };
    if lat > 0.0 {
        offset
    } else {
        -offset
    }
}

/// Synthesize a weather sample from latitude and calendar month.
///
/// Baseline is `30 - 0.6*|lat|` plus the seasonal offset, jittered by
/// U(-2, 2) and rounded to one decimal; the companion fields are drawn
/// uniformly from plausible ranges. The result is always within
/// [-64, 40] degrees C and marked `is_estimated`.
pub fn estimate<R: Rng + ?Sized>(lat: f64, month: u32, rng: &mut R) -> WeatherSample {
    let base = 30.0 - lat.abs() * 0.6 + seasonal_offset(lat, month);
    let temperature = ((base + rng.gen_range(-2.0..2.0)) * 10.0).round() / 10.0;
    WeatherSample {
        temperature,
        humidity: Some((40.0_f64 + rng.gen_range(0.0..40.0)).round()),
        description: "Partly cloudy".to_string(),
        wind_speed: Some(((5.0_f64 + rng.gen_range(0.0..15.0)) * 10.0).round() / 10.0),
        pressure: Some((1000.0_f64 + rng.gen_range(0.0..50.0)).round()),
        feels_like: Some(temperature + rng.gen_range(-1.5..1.5)),
        uv_index: Some((6.0_f64 + rng.gen_range(0.0..4.0)).round().clamp(0.0, 11.0)),
        source: SOURCE_ESTIMATED.to_string(),
        is_estimated: true,
    }
}

/// WMO weather interpretation codes, as reported by Open-Meteo.
pub fn describe_weather_code(code: Option<i64>) -> &'static str {
    match code {
        Some(0) => "Clear sky",
        Some(1) => "Mainly clear",
        Some(2) => "Partly cloudy",
        Some(3) => "Overcast",
        Some(45) => "Fog",
        Some(48) => "Depositing rime fog",
        Some(51) => "Light drizzle",
        Some(53) => "Moderate drizzle",
        Some(55) => "Dense drizzle",
        Some(61) => "Slight rain",
        Some(63) => "Moderate rain",
        Some(65) => "Heavy rain",
        Some(71) => "Slight snow fall",
        Some(73) => "Moderate snow fall",
        Some(75) => "Heavy snow fall",
        Some(95) => "Thunderstorm",
        _ => "Unknown weather",
    }
}

pub struct WeatherFetcher<'a> {
    client: &'a Client,
    endpoints: &'a Endpoints,
    timeout: Duration,
}

impl<'a> WeatherFetcher<'a> {
    pub fn new(client: &'a Client, endpoints: &'a Endpoints, timeout: Duration) -> Self {
        Self {
            client,
            endpoints,
            timeout,
        }
    }

    /// Try each candidate API in order; first success wins. Errs only
    /// when every candidate has failed.
    pub async fn fetch(&self, lat: f64, lng: f64, hour: usize) -> Result<WeatherSample> {
        match self.fetch_open_meteo(lat, lng, hour).await {
            Ok(sample) => {
                debug!(source = SOURCE_OPEN_METEO, "weather candidate succeeded");
                return Ok(sample);
            }
            Err(err) => warn!(%err, "weather candidate failed"),
        }
        match self.fetch_openweathermap(lat, lng).await {
            Ok(sample) => {
                debug!(source = SOURCE_OPENWEATHERMAP, "weather candidate succeeded");
                return Ok(sample);
            }
            Err(err) => warn!(%err, "weather candidate failed"),
        }
        Err(Error::WeatherService {
            provider: "all candidates",
            message: "every weather API candidate failed".to_string(),
        })
    }

    async fn fetch_open_meteo(&self, lat: f64, lng: f64, hour: usize) -> Result<WeatherSample> {
        let url = format!(
            "{}/v1/forecast?latitude={lat}&longitude={lng}&current_weather=true\
             &hourly=temperature_2m,relative_humidity_2m,apparent_temperature,surface_pressure,uv_index\
             &temperature_unit=celsius&wind_speed_unit=ms",
            self.endpoints.open_meteo
        );
        let response = self
            .request(SOURCE_OPEN_METEO, &url)
            .await?
            .json::<OpenMeteoResponse>()
            .await
            .map_err(|err| service_error(SOURCE_OPEN_METEO, err))?;
        parse_open_meteo(response, hour)
    }

    async fn fetch_openweathermap(&self, lat: f64, lng: f64) -> Result<WeatherSample> {
        let url = format!(
            "{}/data/2.5/weather?lat={lat}&lon={lng}&appid={}&units=metric",
            self.endpoints.openweathermap, self.endpoints.openweathermap_api_key
        );
        let response = self
            .request(SOURCE_OPENWEATHERMAP, &url)
            .await?
            .json::<OwmResponse>()
            .await
            .map_err(|err| service_error(SOURCE_OPENWEATHERMAP, err))?;
        parse_openweathermap(response)
    }

    async fn request(&self, provider: &'static str, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    Error::WeatherTimeout {
                        provider,
                        timeout_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    service_error(provider, err)
                }
            })?;
        response
            .error_for_status()
            .map_err(|err| service_error(provider, err))
    }
}

fn service_error(provider: &'static str, err: reqwest::Error) -> Error {
    Error::WeatherService {
        provider,
        message: err.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    current_weather: Option<OpenMeteoCurrent>,
    hourly: Option<OpenMeteoHourly>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoCurrent {
    temperature: Option<f64>,
    windspeed: Option<f64>,
    weathercode: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
struct OpenMeteoHourly {
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    apparent_temperature: Vec<Option<f64>>,
    #[serde(default)]
    surface_pressure: Vec<Option<f64>>,
    #[serde(default)]
    uv_index: Vec<Option<f64>>,
}

fn hourly_at(series: &[Option<f64>], hour: usize) -> Option<f64> {
    series.get(hour).copied().flatten()
}

fn parse_open_meteo(response: OpenMeteoResponse, hour: usize) -> Result<WeatherSample> {
    let current = response.current_weather.ok_or(Error::WeatherService {
        provider: SOURCE_OPEN_METEO,
        message: "response missing current_weather".to_string(),
    })?;
    let temperature = current.temperature.ok_or(Error::WeatherService {
        provider: SOURCE_OPEN_METEO,
        message: "response missing temperature".to_string(),
    })?;
    let hourly = response.hourly.unwrap_or_default();
    Ok(WeatherSample {
        temperature,
        humidity: hourly_at(&hourly.relative_humidity_2m, hour),
        description: describe_weather_code(current.weathercode).to_string(),
        wind_speed: current.windspeed,
        pressure: hourly_at(&hourly.surface_pressure, hour),
        feels_like: hourly_at(&hourly.apparent_temperature, hour),
        uv_index: hourly_at(&hourly.uv_index, hour),
        source: SOURCE_OPEN_METEO.to_string(),
        is_estimated: false,
    })
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: Option<OwmMain>,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    wind: Option<OwmWind>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
    feels_like: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
}

fn parse_openweathermap(response: OwmResponse) -> Result<WeatherSample> {
    let main = response.main.ok_or(Error::WeatherService {
        provider: SOURCE_OPENWEATHERMAP,
        message: "response missing main block".to_string(),
    })?;
    let temperature = main.temp.ok_or(Error::WeatherService {
        provider: SOURCE_OPENWEATHERMAP,
        message: "response missing temperature".to_string(),
    })?;
    let description = response
        .weather
        .into_iter()
        .next()
        .and_then(|condition| condition.description)
        .unwrap_or_else(|| "Unknown weather".to_string());
    Ok(WeatherSample {
        temperature,
        humidity: main.humidity,
        description,
        wind_speed: response.wind.and_then(|wind| wind.speed),
        pressure: main.pressure,
        feels_like: main.feels_like,
        uv_index: None,
        source: SOURCE_OPENWEATHERMAP.to_string(),
        is_estimated: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn estimate_stays_within_formula_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for lat in [-90.0, -60.0, -35.0, 0.0, 12.5, 48.85, 90.0] {
            for month in 1..=12 {
                let sample = estimate(lat, month, &mut rng);
                assert!(
                    (-64.0..=40.0).contains(&sample.temperature),
                    "lat {lat} month {month} gave {}",
                    sample.temperature
                );
                assert!(sample.is_estimated);
                assert_eq!(sample.source, SOURCE_ESTIMATED);
            }
        }
    }

    #[test]
    fn estimate_flips_seasons_across_hemispheres() {
        // Averaged over jitter, July should be warmer than January in the
        // north and colder in the south at the same latitude.
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mean = |lat: f64, month: u32, rng: &mut ChaCha8Rng| -> f64 {
            (0..200).map(|_| estimate(lat, month, rng).temperature).sum::<f64>() / 200.0
        };
        assert!(mean(45.0, 7, &mut rng) > mean(45.0, 1, &mut rng));
        assert!(mean(-45.0, 7, &mut rng) < mean(-45.0, 1, &mut rng));
    }

    #[test]
    fn estimate_companion_field_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let sample = estimate(40.0, 6, &mut rng);
            let humidity = sample.humidity.unwrap();
            assert!((40.0..=80.0).contains(&humidity));
            let wind = sample.wind_speed.unwrap();
            assert!((5.0..=20.0).contains(&wind));
            let pressure = sample.pressure.unwrap();
            assert!((1000.0..=1050.0).contains(&pressure));
            let uv = sample.uv_index.unwrap();
            assert!((0.0..=11.0).contains(&uv));
        }
    }

    #[test]
    fn open_meteo_parser_reads_current_hour() {
        let json = r#"{
            "current_weather": {"temperature": 21.4, "windspeed": 3.2, "weathercode": 2},
            "hourly": {
                "relative_humidity_2m": [50.0, 55.0, 60.0],
                "apparent_temperature": [20.0, 21.0, 22.0],
                "surface_pressure": [1013.0, 1014.0, 1015.0],
                "uv_index": [0.0, 1.5, 3.0]
            }
        }"#;
        let response: OpenMeteoResponse = serde_json::from_str(json).unwrap();
        let sample = parse_open_meteo(response, 1).unwrap();
        assert_eq!(sample.temperature, 21.4);
        assert_eq!(sample.humidity, Some(55.0));
        assert_eq!(sample.feels_like, Some(21.0));
        assert_eq!(sample.pressure, Some(1014.0));
        assert_eq!(sample.uv_index, Some(1.5));
        assert_eq!(sample.description, "Partly cloudy");
        assert_eq!(sample.source, SOURCE_OPEN_METEO);
        assert!(!sample.is_estimated);
    }

    #[test]
    fn open_meteo_parser_rejects_missing_temperature() {
        let json = r#"{"hourly": {}}"#;
        let response: OpenMeteoResponse = serde_json::from_str(json).unwrap();
        assert!(parse_open_meteo(response, 0).is_err());
    }

    #[test]
    fn open_meteo_parser_tolerates_short_hourly_series() {
        let json = r#"{"current_weather": {"temperature": 10.0}}"#;
        let response: OpenMeteoResponse = serde_json::from_str(json).unwrap();
        let sample = parse_open_meteo(response, 23).unwrap();
        assert_eq!(sample.temperature, 10.0);
        assert_eq!(sample.humidity, None);
        assert_eq!(sample.description, "Unknown weather");
    }

    #[test]
    fn openweathermap_parser_reads_main_block() {
        let json = r#"{
            "main": {"temp": 18.6, "humidity": 72, "pressure": 1009, "feels_like": 18.1},
            "weather": [{"description": "light rain"}],
            "wind": {"speed": 4.6}
        }"#;
        let response: OwmResponse = serde_json::from_str(json).unwrap();
        let sample = parse_openweathermap(response).unwrap();
        assert_eq!(sample.temperature, 18.6);
        assert_eq!(sample.humidity, Some(72.0));
        assert_eq!(sample.description, "light rain");
        assert_eq!(sample.wind_speed, Some(4.6));
        assert_eq!(sample.uv_index, None);
        assert_eq!(sample.source, SOURCE_OPENWEATHERMAP);
    }

    #[test]
    fn weather_code_table_covers_the_common_codes() {
        assert_eq!(describe_weather_code(Some(0)), "Clear sky");
        assert_eq!(describe_weather_code(Some(95)), "Thunderstorm");
        assert_eq!(describe_weather_code(Some(42)), "Unknown weather");
        assert_eq!(describe_weather_code(None), "Unknown weather");
    }
}
