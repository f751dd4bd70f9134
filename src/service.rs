//! Location load orchestration.
//!
//! One load is a strict sequence: geocode, weather candidates, air
//! quality, projection build, city-model match. Any geocode or weather
//! exhaustion converts into the demo-data fallback flow with a single
//! user-visible notice; no load ever fails outright. A monotonic
//! generation counter guards against superseded loads: a completion is
//! returned only while its generation is still the latest.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};
use std::time::Duration;

use chrono::{Datelike, Local, Timelike, Utc};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    air_quality::AirQualityFetcher,
    catalog,
    config::{Config, Variant},
    geocode::{Coordinate, Geocoder},
    panels::{self, Panel, PanelReport},
    projection::ProjectionTable,
    rng::RngManager,
    session::{confidence_score, Session},
    weather::{self, WeatherFetcher, WeatherSample},
};

pub struct ClimateService {
    config: Config,
    client: Client,
    rng: Mutex<RngManager>,
    generation: AtomicU64,
}

impl ClimateService {
    pub fn new(config: Config) -> Self {
        let rng = Mutex::new(RngManager::new(config.seed));
        Self {
            config,
            client: Client::new(),
            rng,
            generation: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn variant(&self) -> Variant {
        self.config.variant
    }

    /// Load a location end to end. Returns `None` only when a newer load
    /// started while this one was in flight; the session itself always
    /// materializes, falling back to demo data on failure.
    pub async fn load_location(&self, query: &str) -> Option<Session> {
        let generation = self.begin_load();
        info!(query, generation, "loading location");
        let session = if self.config.offline {
            self.load_offline(query, generation)
        } else {
            self.load_online(query, generation).await
        };
        if self.is_current(generation) {
            Some(session)
        } else {
            debug!(generation, "discarding superseded load");
            None
        }
    }

    fn begin_load(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.request_timeout_ms)
    }

    fn geocoder(&self) -> Geocoder<'_> {
        Geocoder::new(&self.client, &self.config.endpoints.nominatim, self.timeout())
    }

    fn weather_fetcher(&self) -> WeatherFetcher<'_> {
        WeatherFetcher::new(&self.client, &self.config.endpoints, self.timeout())
    }

    fn air_quality_fetcher(&self) -> AirQualityFetcher<'_> {
        AirQualityFetcher::new(
            &self.client,
            &self.config.endpoints.air_quality,
            self.timeout(),
        )
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn load_online(&self, query: &str, generation: u64) -> Session {
        match self.geocoder().resolve(query).await {
            Ok(coordinate) => {
                let weather = match self
                    .weather_fetcher()
                    .fetch(coordinate.lat, coordinate.lng, current_hour())
                    .await
                {
                    Ok(sample) => sample,
                    Err(err) => {
                        warn!(%err, "every weather candidate failed, estimating");
                        self.estimate_weather(coordinate.lat)
                    }
                };
                let air_quality = match self
                    .air_quality_fetcher()
                    .fetch(coordinate.lat, coordinate.lng)
                    .await
                {
                    Ok(sample) => Some(sample),
                    Err(err) => {
                        warn!(%err, "air quality unavailable, panel degrades to N/A");
                        None
                    }
                };
                self.assemble(query, coordinate, weather, air_quality, None, generation)
            }
            Err(err) => {
                warn!(%err, query, "geocoding failed, falling back to demo data");
                self.fallback_online(query, generation).await
            }
        }
    }

    /// Resolve against the built-in catalog instead of the network.
    /// Unmatched queries take the same fallback flow as a failed geocode.
    fn load_offline(&self, query: &str, generation: u64) -> Session {
        match catalog::find_by_name(query) {
            Some(city) => {
                let (lat, lng) = city.bounds.center();
                let coordinate = Coordinate {
                    lat,
                    lng,
                    name: city.name.to_string(),
                };
                let weather = self.estimate_weather(lat);
                self.assemble(query, coordinate, weather, None, None, generation)
            }
            None => {
                let coordinate = self.default_coordinate();
                let weather = self.estimate_weather(coordinate.lat);
                let notice = self.fallback_notice(query);
                self.assemble(query, coordinate, weather, None, Some(notice), generation)
            }
        }
    }

    async fn fallback_online(&self, query: &str, generation: u64) -> Session {
        let coordinate = self.default_coordinate();
        let weather = match self
            .weather_fetcher()
            .fetch(coordinate.lat, coordinate.lng, current_hour())
            .await
        {
            Ok(sample) => sample,
            Err(err) => {
                warn!(%err, "weather unavailable for demo location, estimating");
                self.estimate_weather(coordinate.lat)
            }
        };
        let notice = self.fallback_notice(query);
        self.assemble(query, coordinate, weather, None, Some(notice), generation)
    }

    fn fallback_notice(&self, query: &str) -> String {
        format!(
            "Location \"{query}\" not found. Showing demo data for {}",
            self.config.default_location.name
        )
    }

    fn default_coordinate(&self) -> Coordinate {
        let fallback = &self.config.default_location;
        Coordinate {
            lat: fallback.lat,
            lng: fallback.lng,
            name: fallback.name.clone(),
        }
    }

    fn estimate_weather(&self, lat: f64) -> WeatherSample {
        let month = Utc::now().month();
        let mut rng = self.rng.lock().expect("rng lock poisoned");
        weather::estimate(lat, month, &mut rng.stream("estimator"))
    }

    fn assemble(
        &self,
        query: &str,
        coordinate: Coordinate,
        weather: WeatherSample,
        air_quality: Option<crate::air_quality::AirQualitySample>,
        notice: Option<String>,
        generation: u64,
    ) -> Session {
        let projections = {
            let mut rng = self.rng.lock().expect("rng lock poisoned");
            ProjectionTable::generate(weather.temperature, &mut rng.stream("projection"))
        };
        let city_model = catalog::detect(coordinate.lat, coordinate.lng, query);
        let confidence = confidence_score(&weather, air_quality.is_some());
        Session {
            query: query.to_string(),
            location: coordinate,
            weather,
            air_quality,
            projections,
            city_model,
            confidence,
            notice,
            generation,
            loaded_at: Utc::now(),
        }
    }

    /// Render the variant's panel set against a session at the given
    /// timeline year.
    pub fn render_panels(&self, session: &Session, year: i32) -> Vec<PanelReport> {
        let record = session.projections.nearest(year);
        let lat = session.location.lat;
        let mut rng = self.rng.lock().expect("rng lock poisoned");
        panels_for_session(self.config.variant, session, record, lat, &mut rng)
    }
}

fn panels_for_session(
    variant: Variant,
    session: &Session,
    record: &crate::projection::ProjectionRecord,
    lat: f64,
    rng: &mut RngManager,
) -> Vec<PanelReport> {
    panels::panels_for(variant)
        .iter()
        .map(|panel| match panel {
            Panel::CurrentWeather => panels::current_weather(&session.weather),
            Panel::ClimateProjections => {
                panels::climate_projections(record, lat, &mut rng.stream("panel.projections"))
            }
            Panel::Environmental => panels::environmental(
                session.air_quality.as_ref(),
                lat,
                &mut rng.stream("panel.environmental"),
            ),
            Panel::RiskAssessment => {
                panels::risk_assessment(lat, &mut rng.stream("panel.risk"))
            }
        })
        .collect()
}

fn current_hour() -> usize {
    Local::now().hour() as usize
}
