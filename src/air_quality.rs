//! Air quality through the Open-Meteo AQ API.
//!
//! Failure here is isolated: the environmental panel degrades to "N/A"
//! and the rest of the session is unaffected.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const SOURCE_OPEN_METEO_AQ: &str = "Open-Meteo Air Quality";

#[derive(Debug, Clone, Serialize)]
pub struct AirQualitySample {
    pub aqi: i64,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
    pub carbon_monoxide: Option<f64>,
    pub ozone: Option<f64>,
    pub sulphur_dioxide: Option<f64>,
    pub source: String,
}

/// AQI from PM2.5 on simplified US-EPA-style breakpoints, capped at 300.
/// A missing reading reports the moderate default of 50.
pub fn aqi_from_pm25(pm2_5: Option<f64>) -> i64 {
    let Some(pm) = pm2_5 else {
        return 50;
    };
    if pm <= 12.0 {
        (50.0 * pm / 12.0).round() as i64
    } else if pm <= 35.4 {
        (50.0 + 50.0 * (pm - 12.0) / (35.4 - 12.0)).round() as i64
    } else if pm <= 55.4 {
        (100.0 + 50.0 * (pm - 35.4) / (55.4 - 35.4)).round() as i64
    } else {
        ((150.0 + 100.0 * (pm - 55.4) / (150.0 - 55.4)).round() as i64).min(300)
    }
}

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    current: Option<CurrentAirQuality>,
}

#[derive(Debug, Deserialize)]
struct CurrentAirQuality {
    pm2_5: Option<f64>,
    pm10: Option<f64>,
    nitrogen_dioxide: Option<f64>,
    carbon_monoxide: Option<f64>,
    ozone: Option<f64>,
    sulphur_dioxide: Option<f64>,
}

pub struct AirQualityFetcher<'a> {
    client: &'a Client,
    base_url: &'a str,
    timeout: Duration,
}

impl<'a> AirQualityFetcher<'a> {
    pub fn new(client: &'a Client, base_url: &'a str, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            timeout,
        }
    }

    pub async fn fetch(&self, lat: f64, lng: f64) -> Result<AirQualitySample> {
        let url = format!(
            "{}/v1/air-quality?latitude={lat}&longitude={lng}\
             &current=pm10,pm2_5,carbon_monoxide,nitrogen_dioxide,sulphur_dioxide,ozone",
            self.base_url
        );
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
            .send()
            .await
            .map_err(|err| Error::AirQualityUnavailable(err.to_string()))?
            .error_for_status()
            .map_err(|err| Error::AirQualityUnavailable(err.to_string()))?
            .json::<AirQualityResponse>()
            .await
            .map_err(|err| Error::AirQualityUnavailable(err.to_string()))?;

        let current = response
            .current
            .ok_or_else(|| Error::AirQualityUnavailable("response missing current block".to_string()))?;
        Ok(sample_from_current(current))
    }
}

fn sample_from_current(current: CurrentAirQuality) -> AirQualitySample {
    AirQualitySample {
        aqi: aqi_from_pm25(current.pm2_5),
        pm2_5: current.pm2_5,
        pm10: current.pm10,
        nitrogen_dioxide: current.nitrogen_dioxide,
        carbon_monoxide: current.carbon_monoxide,
        ozone: current.ozone,
        sulphur_dioxide: current.sulphur_dioxide,
        source: SOURCE_OPEN_METEO_AQ.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aqi_breakpoints() {
        assert_eq!(aqi_from_pm25(Some(0.0)), 0);
        assert_eq!(aqi_from_pm25(Some(6.0)), 25);
        assert_eq!(aqi_from_pm25(Some(12.0)), 50);
        assert_eq!(aqi_from_pm25(Some(35.4)), 100);
        assert_eq!(aqi_from_pm25(Some(55.4)), 150);
        assert_eq!(aqi_from_pm25(Some(500.0)), 300);
        assert_eq!(aqi_from_pm25(None), 50);
    }

    #[test]
    fn aqi_is_monotone_across_breakpoints() {
        let mut last = -1;
        for tenths in 0..=1500 {
            let aqi = aqi_from_pm25(Some(tenths as f64 / 10.0));
            assert!(aqi >= last, "AQI dipped at pm2.5 = {}", tenths as f64 / 10.0);
            last = aqi;
        }
    }

    #[test]
    fn response_parses_and_derives_aqi() {
        let json = r#"{
            "current": {
                "pm2_5": 18.0, "pm10": 25.0, "carbon_monoxide": 230.0,
                "nitrogen_dioxide": 14.0, "sulphur_dioxide": 2.0, "ozone": 60.0
            }
        }"#;
        let response: AirQualityResponse = serde_json::from_str(json).unwrap();
        let sample = sample_from_current(response.current.unwrap());
        assert_eq!(sample.aqi, aqi_from_pm25(Some(18.0)));
        assert_eq!(sample.pm10, Some(25.0));
        assert_eq!(sample.source, SOURCE_OPEN_METEO_AQ);
    }
}
