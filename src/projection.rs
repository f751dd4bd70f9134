//! Synthetic long-range climate projections.
//!
//! One record per 5-year step from 2024 to 2100 inclusive, derived from
//! the current temperature with year-interpolated noise. The whole table
//! is rebuilt whenever a new location/weather pair loads; it is never
//! patched incrementally.

use rand::Rng;
use serde::Serialize;

pub const START_YEAR: i32 = 2024;
pub const END_YEAR: i32 = 2100;
pub const YEAR_STEP: i32 = 5;

/// Fraction of the projection horizon elapsed at `year`: 0.0 at 2024,
/// 1.0 at 2100.
pub fn progress(year: i32) -> f64 {
    (year - START_YEAR) as f64 / (END_YEAR - START_YEAR) as f64
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionRecord {
    pub year: i32,
    pub current_temperature: f64,
    pub temperature_increase: f64,
    pub future_temperature: f64,
    pub sea_level_rise_m: f64,
    pub affected_population: u64,
    pub economic_impact_usd: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionTable {
    pub coastal: bool,
    pub records: Vec<ProjectionRecord>,
}

impl ProjectionTable {
    /// Build the table with the coastal flag decided by a weighted coin
    /// (P(coastal) = 0.7). The flag is a per-build random decision, not
    /// derived from geography.
    pub fn generate<R: Rng + ?Sized>(current_temperature: f64, rng: &mut R) -> Self {
        let coastal = rng.gen_bool(0.7);
        Self::build(current_temperature, coastal, rng)
    }

    /// Build the table with the coastal flag forced. Inland tables carry
    /// exactly zero sea level rise for every year.
    pub fn build<R: Rng + ?Sized>(current_temperature: f64, coastal: bool, rng: &mut R) -> Self {
        let mut records = Vec::new();
        let mut year = START_YEAR;
        while year <= END_YEAR {
            let progress = progress(year);
            let temperature_increase = progress * 2.4 + rng.gen_range(0.0..0.5);
            let sea_level_rise_m = if coastal {
                progress * 0.84 + rng.gen_range(0.0..0.1)
            } else {
                0.0
            };
            records.push(ProjectionRecord {
                year,
                current_temperature,
                temperature_increase,
                future_temperature: current_temperature + temperature_increase,
                sea_level_rise_m,
                affected_population: (100_000.0 + progress * 50_000.0).floor() as u64,
                economic_impact_usd: progress * 2_000_000_000.0,
            });
            year += YEAR_STEP;
        }
        Self { coastal, records }
    }

    /// Record whose year is closest to `year` (ties resolve to the
    /// earlier record), matching the timeline slider semantics.
    pub fn nearest(&self, year: i32) -> &ProjectionRecord {
        self.records
            .iter()
            .min_by_key(|record| (record.year - year).abs())
            .expect("projection table is never empty")
    }
}
