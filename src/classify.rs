//! Severity classification and weighted categorical draws.
//!
//! Every metric the report displays runs through a [`ThresholdTable`]: an
//! ordered list of comparison rules where the first satisfied rule wins,
//! falling back to a per-table default. The literal thresholds drive the
//! severity color-coding of every panel.

use std::fmt;

use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Safe,
    Warning,
    Danger,
    /// Unhighlighted; the metric is present but not flagged either way.
    Neutral,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Safe => "safe",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
            Severity::Neutral => "neutral",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy)]
enum Cmp {
    Above,
    Below,
    AtMost,
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    cmp: Cmp,
    threshold: f64,
    severity: Severity,
}

const fn above(threshold: f64, severity: Severity) -> Rule {
    Rule {
        cmp: Cmp::Above,
        threshold,
        severity,
    }
}

const fn below(threshold: f64, severity: Severity) -> Rule {
    Rule {
        cmp: Cmp::Below,
        threshold,
        severity,
    }
}

const fn at_most(threshold: f64, severity: Severity) -> Rule {
    Rule {
        cmp: Cmp::AtMost,
        threshold,
        severity,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ThresholdTable {
    rules: &'static [Rule],
    default: Severity,
}

impl ThresholdTable {
    pub fn classify(&self, value: f64) -> Severity {
        for rule in self.rules {
            let hit = match rule.cmp {
                Cmp::Above => value > rule.threshold,
                Cmp::Below => value < rule.threshold,
                Cmp::AtMost => value <= rule.threshold,
            };
            if hit {
                return rule.severity;
            }
        }
        self.default
    }
}

use Severity::{Danger, Neutral, Safe, Warning};

pub const TEMPERATURE: ThresholdTable = ThresholdTable {
    rules: &[above(35.0, Danger), above(28.0, Warning), below(0.0, Safe)],
    default: Neutral,
};

pub const UV_INDEX: ThresholdTable = ThresholdTable {
    rules: &[above(7.0, Danger), above(5.0, Warning)],
    default: Safe,
};

pub const AQI: ThresholdTable = ThresholdTable {
    rules: &[above(150.0, Danger), above(100.0, Warning), at_most(50.0, Safe)],
    default: Neutral,
};

pub const TEMPERATURE_INCREASE: ThresholdTable = ThresholdTable {
    rules: &[above(3.0, Danger)],
    default: Warning,
};

pub const SEA_LEVEL_RISE: ThresholdTable = ThresholdTable {
    rules: &[above(1.0, Danger)],
    default: Warning,
};

pub const HEAT_DAYS: ThresholdTable = ThresholdTable {
    rules: &[above(50.0, Danger)],
    default: Warning,
};

pub const CO2: ThresholdTable = ThresholdTable {
    rules: &[above(420.0, Danger)],
    default: Warning,
};

pub const BIODIVERSITY: ThresholdTable = ThresholdTable {
    rules: &[below(5.0, Danger), below(7.0, Warning)],
    default: Safe,
};

pub const FOREST_CHANGE: ThresholdTable = ThresholdTable {
    rules: &[below(0.0, Danger)],
    default: Safe,
};

pub const HEAT_ISLAND: ThresholdTable = ThresholdTable {
    rules: &[above(3.0, Danger), above(2.0, Warning)],
    default: Neutral,
};

pub const PRECIPITATION_CHANGE: ThresholdTable = ThresholdTable {
    rules: &[below(-10.0, Danger), below(5.0, Warning)],
    default: Safe,
};

/// Severity of a categorical risk label (drought, flood, wildfire,
/// infrastructure, overall).
pub fn risk_severity(label: &str) -> Severity {
    match label {
        "High" | "Very High" | "Extreme" | "Critical" => Danger,
        "Moderate" => Warning,
        _ => Safe,
    }
}

pub fn water_quality_severity(label: &str) -> Severity {
    match label {
        "Excellent" | "Good" => Safe,
        "Fair" => Warning,
        _ => Danger,
    }
}

/// Draw one label with probability proportional to its weight.
///
/// Single uniform draw scaled by the weight sum, selected on the running
/// cumulative weight. Weights need not sum to 1. An all-zero weight
/// vector selects the last label.
pub fn weighted_choice<'a, R: Rng + ?Sized>(
    labels: &[&'a str],
    weights: &[f64],
    rng: &mut R,
) -> &'a str {
    debug_assert_eq!(labels.len(), weights.len());
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return labels[labels.len() - 1];
    }
    let draw = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (label, weight) in labels.iter().zip(weights) {
        cumulative += weight;
        if draw < cumulative {
            return label;
        }
    }
    labels[labels.len() - 1]
}
