//! Report panels.
//!
//! Each panel is a list of metric readings: a display value plus the
//! severity the classifier assigns it. Synthetic metrics (CO2,
//! biodiversity, risk ladders, ...) draw their jitter from the caller's
//! RNG stream so a report is reproducible under a fixed seed.

use rand::Rng;
use serde::Serialize;

use crate::{
    air_quality::AirQualitySample,
    classify::{self, Severity},
    config::Variant,
    projection::ProjectionRecord,
    weather::WeatherSample,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    CurrentWeather,
    ClimateProjections,
    Environmental,
    RiskAssessment,
}

impl std::fmt::Display for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Panel::CurrentWeather => "Current Weather",
            Panel::ClimateProjections => "Climate Projections",
            Panel::Environmental => "Environmental",
            Panel::RiskAssessment => "Risk Assessment",
        };
        f.write_str(label)
    }
}

/// Panels shown by each front-end variant.
pub fn panels_for(variant: Variant) -> &'static [Panel] {
    match variant {
        Variant::Standard => &[Panel::CurrentWeather, Panel::ClimateProjections],
        Variant::Extended => &[
            Panel::CurrentWeather,
            Panel::ClimateProjections,
            Panel::Environmental,
            Panel::RiskAssessment,
        ],
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricReading {
    pub name: &'static str,
    pub value: String,
    pub severity: Severity,
}

impl MetricReading {
    fn new(name: &'static str, value: String, severity: Severity) -> Self {
        Self {
            name,
            value,
            severity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelReport {
    pub panel: Panel,
    pub metrics: Vec<MetricReading>,
}

fn optional(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v} {unit}"),
        None => "N/A".to_string(),
    }
}

pub fn current_weather(weather: &WeatherSample) -> PanelReport {
    let mut metrics = Vec::new();

    let mut temp_display = format!("{:.1}\u{b0}C", weather.temperature);
    if weather.is_estimated {
        temp_display.push_str(" (est.)");
    }
    metrics.push(MetricReading::new(
        "temperature",
        temp_display,
        classify::TEMPERATURE.classify(weather.temperature),
    ));
    metrics.push(MetricReading::new(
        "conditions",
        weather.description.clone(),
        Severity::Neutral,
    ));
    metrics.push(MetricReading::new(
        "humidity",
        match weather.humidity {
            Some(h) => format!("{h}%"),
            None => "N/A".to_string(),
        },
        Severity::Neutral,
    ));
    metrics.push(MetricReading::new(
        "wind_speed",
        optional(weather.wind_speed, "m/s"),
        Severity::Neutral,
    ));
    metrics.push(MetricReading::new(
        "pressure",
        optional(weather.pressure, "hPa"),
        Severity::Neutral,
    ));
    metrics.push(MetricReading::new(
        "feels_like",
        match weather.feels_like {
            Some(t) => format!("{t:.1}\u{b0}C"),
            None => "N/A".to_string(),
        },
        Severity::Neutral,
    ));
    metrics.push(MetricReading::new(
        "uv_index",
        match weather.uv_index {
            Some(uv) => format!("{uv:.1}"),
            None => "N/A".to_string(),
        },
        match weather.uv_index {
            Some(uv) => classify::UV_INDEX.classify(uv),
            None => Severity::Neutral,
        },
    ));
    PanelReport {
        panel: Panel::CurrentWeather,
        metrics,
    }
}

pub fn climate_projections<R: Rng + ?Sized>(
    record: &ProjectionRecord,
    lat: f64,
    rng: &mut R,
) -> PanelReport {
    let mut metrics = Vec::new();

    let increase = record.temperature_increase;
    metrics.push(MetricReading::new(
        "temperature_increase",
        format!("+{increase:.1}\u{b0}C"),
        classify::TEMPERATURE_INCREASE.classify(increase),
    ));
    metrics.push(MetricReading::new(
        "sea_level_rise",
        format!("+{:.2}m", record.sea_level_rise_m),
        classify::SEA_LEVEL_RISE.classify(record.sea_level_rise_m),
    ));

    let heat_days = (increase * 18.0).round();
    metrics.push(MetricReading::new(
        "extra_heat_days",
        format!("+{heat_days} days/year"),
        classify::HEAT_DAYS.classify(heat_days),
    ));

    let arid = lat.abs() < 35.0;
    let precipitation_change = if arid {
        (-20.0_f64 + rng.gen_range(0.0..10.0)).round()
    } else {
        (-5.0_f64 + rng.gen_range(0.0..20.0)).round()
    };
    metrics.push(MetricReading::new(
        "precipitation_change",
        format!("{precipitation_change}%"),
        classify::PRECIPITATION_CHANGE.classify(precipitation_change),
    ));

    let drought_weights: &[f64] = if arid {
        &[0.1, 0.2, 0.4, 0.3]
    } else {
        &[0.3, 0.4, 0.2, 0.1]
    };
    let drought = classify::weighted_choice(
        &["Low", "Moderate", "High", "Very High"],
        drought_weights,
        rng,
    );
    metrics.push(MetricReading::new(
        "drought_risk",
        drought.to_string(),
        classify::risk_severity(drought),
    ));

    PanelReport {
        panel: Panel::ClimateProjections,
        metrics,
    }
}

pub fn environmental<R: Rng + ?Sized>(
    air_quality: Option<&AirQualitySample>,
    lat: f64,
    rng: &mut R,
) -> PanelReport {
    let mut metrics = Vec::new();

    metrics.push(match air_quality {
        Some(sample) => MetricReading::new(
            "air_quality_index",
            sample.aqi.to_string(),
            classify::AQI.classify(sample.aqi as f64),
        ),
        None => MetricReading::new("air_quality_index", "N/A".to_string(), Severity::Neutral),
    });

    // Simplified urban detection, carried over as-is.
    let urban = lat.abs() < 60.0;
    let coastal = rng.gen_bool(0.6);

    let co2 = (421.0_f64 + rng.gen_range(-5.0..5.0)).round();
    metrics.push(MetricReading::new(
        "co2_level",
        format!("{co2} ppm"),
        classify::CO2.classify(co2),
    ));

    let biodiversity = if urban {
        4.0 + rng.gen_range(0.0..3.0)
    } else {
        6.0 + rng.gen_range(0.0..3.0)
    };
    metrics.push(MetricReading::new(
        "biodiversity_index",
        format!("{biodiversity:.1}/10"),
        classify::BIODIVERSITY.classify(biodiversity),
    ));

    let forest_change = if urban {
        -2.3 + rng.gen_range(0.0..1.0)
    } else {
        -1.5 + rng.gen_range(0.0..2.0)
    };
    metrics.push(MetricReading::new(
        "forest_coverage",
        format!("{forest_change:.1}%/year"),
        classify::FOREST_CHANGE.classify(forest_change),
    ));

    let water_weights: &[f64] = if coastal {
        &[0.2, 0.4, 0.3, 0.1]
    } else {
        &[0.3, 0.4, 0.2, 0.1]
    };
    let water = classify::weighted_choice(
        &["Excellent", "Good", "Fair", "Poor"],
        water_weights,
        rng,
    );
    metrics.push(MetricReading::new(
        "water_quality",
        water.to_string(),
        classify::water_quality_severity(water),
    ));

    let heat_island = if urban {
        2.0 + rng.gen_range(0.0..3.0)
    } else {
        0.5 + rng.gen_range(0.0..1.0)
    };
    metrics.push(MetricReading::new(
        "urban_heat_island",
        format!("+{heat_island:.1}\u{b0}C"),
        classify::HEAT_ISLAND.classify(heat_island),
    ));

    PanelReport {
        panel: Panel::Environmental,
        metrics,
    }
}

pub fn risk_assessment<R: Rng + ?Sized>(lat: f64, rng: &mut R) -> PanelReport {
    let mut metrics = Vec::new();

    let coastal = rng.gen_bool(0.6);
    let urban = rng.gen_bool(0.7);
    let abs_lat = lat.abs();

    let overall_weights: &[f64] = if coastal {
        &[0.1, 0.2, 0.3, 0.4]
    } else {
        &[0.2, 0.3, 0.3, 0.2]
    };
    let overall = classify::weighted_choice(
        &["Low", "Moderate", "High", "Critical"],
        overall_weights,
        rng,
    );
    metrics.push(MetricReading::new(
        "overall_risk",
        overall.to_string(),
        classify::risk_severity(overall),
    ));

    let flood_weights: &[f64] = if coastal {
        &[0.05, 0.1, 0.2, 0.35, 0.3]
    } else {
        &[0.3, 0.3, 0.25, 0.1, 0.05]
    };
    let flood = classify::weighted_choice(
        &["Very Low", "Low", "Moderate", "High", "Very High"],
        flood_weights,
        rng,
    );
    metrics.push(MetricReading::new(
        "flood_risk",
        flood.to_string(),
        classify::risk_severity(flood),
    ));

    let dry = abs_lat < 45.0 && abs_lat > 25.0;
    let wildfire_weights: &[f64] = if dry {
        &[0.1, 0.2, 0.3, 0.25, 0.15]
    } else {
        &[0.25, 0.35, 0.25, 0.1, 0.05]
    };
    let wildfire = classify::weighted_choice(
        &["Very Low", "Low", "Moderate", "High", "Extreme"],
        wildfire_weights,
        rng,
    );
    metrics.push(MetricReading::new(
        "wildfire_risk",
        wildfire.to_string(),
        classify::risk_severity(wildfire),
    ));

    let base_population: f64 = if urban { 500_000.0 } else { 50_000.0 };
    let population_multiplier = if coastal { 0.25 } else { 0.15 };
    let affected = (base_population * population_multiplier).round() as i64;
    let display = if affected > 1000 {
        format!("~{}K", (affected as f64 / 1000.0).round())
    } else {
        format!("~{affected}")
    };
    metrics.push(MetricReading::new(
        "affected_population",
        display,
        if affected > 100_000 {
            Severity::Danger
        } else {
            Severity::Warning
        },
    ));

    let base_impact: f64 = if urban { 5_000_000_000.0 } else { 500_000_000.0 };
    let impact_multiplier = if coastal { 0.6 } else { 0.4 };
    let impact = base_impact * impact_multiplier;
    metrics.push(MetricReading::new(
        "economic_impact",
        format!("{:.1}B", impact / 1_000_000_000.0),
        if impact > 2_000_000_000.0 {
            Severity::Danger
        } else {
            Severity::Warning
        },
    ));

    let infrastructure_weights: &[f64] = if urban && coastal {
        &[0.1, 0.2, 0.4, 0.3]
    } else if urban {
        &[0.2, 0.3, 0.3, 0.2]
    } else {
        &[0.3, 0.4, 0.2, 0.1]
    };
    let infrastructure = classify::weighted_choice(
        &["Low", "Moderate", "High", "Critical"],
        infrastructure_weights,
        rng,
    );
    metrics.push(MetricReading::new(
        "infrastructure_risk",
        infrastructure.to_string(),
        classify::risk_severity(infrastructure),
    ));

    PanelReport {
        panel: Panel::RiskAssessment,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionTable;
    use crate::weather;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn metric<'a>(report: &'a PanelReport, name: &str) -> &'a MetricReading {
        report
            .metrics
            .iter()
            .find(|m| m.name == name)
            .unwrap_or_else(|| panic!("missing metric {name}"))
    }

    #[test]
    fn current_weather_marks_estimated_temperature() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let sample = weather::estimate(48.85, 7, &mut rng);
        let report = current_weather(&sample);
        assert!(metric(&report, "temperature").value.ends_with("(est.)"));
    }

    #[test]
    fn current_weather_handles_missing_fields() {
        let sample = crate::weather::WeatherSample {
            temperature: 36.5,
            humidity: None,
            description: "Clear sky".to_string(),
            wind_speed: None,
            pressure: None,
            feels_like: None,
            uv_index: None,
            source: "Open-Meteo".to_string(),
            is_estimated: false,
        };
        let report = current_weather(&sample);
        assert_eq!(metric(&report, "temperature").severity, Severity::Danger);
        assert_eq!(metric(&report, "humidity").value, "N/A");
        assert_eq!(metric(&report, "uv_index").value, "N/A");
    }

    #[test]
    fn climate_projections_derive_heat_days_from_increase() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let table = ProjectionTable::build(15.0, true, &mut rng);
        let record = table.nearest(2100);
        let report = climate_projections(record, 48.85, &mut rng);
        let expected = (record.temperature_increase * 18.0).round();
        assert_eq!(
            metric(&report, "extra_heat_days").value,
            format!("+{expected} days/year")
        );
    }

    #[test]
    fn panels_are_reproducible_under_a_fixed_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(31);
        let mut b = ChaCha8Rng::seed_from_u64(31);
        let report_a = risk_assessment(40.7, &mut a);
        let report_b = risk_assessment(40.7, &mut b);
        let values_a: Vec<_> = report_a.metrics.iter().map(|m| m.value.clone()).collect();
        let values_b: Vec<_> = report_b.metrics.iter().map(|m| m.value.clone()).collect();
        assert_eq!(values_a, values_b);
    }

    #[test]
    fn variant_selects_panel_set() {
        assert_eq!(panels_for(Variant::Standard).len(), 2);
        assert_eq!(panels_for(Variant::Extended).len(), 4);
        assert!(panels_for(Variant::Extended).contains(&Panel::RiskAssessment));
    }

    #[test]
    fn environmental_reports_na_without_air_quality() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let report = environmental(None, 48.85, &mut rng);
        let aqi = metric(&report, "air_quality_index");
        assert_eq!(aqi.value, "N/A");
        assert_eq!(aqi.severity, Severity::Neutral);
    }
}
