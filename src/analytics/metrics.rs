use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use crate::propagate::PropagatedSeries;

/// Mean altitudes below this are low Earth orbit.
pub const LEO_CEILING_M: f64 = 2_000_000.0;
/// Mean altitudes at or above this are geostationary-class.
pub const GEO_FLOOR_M: f64 = 35_000_000.0;

const PLACEHOLDER: &str = "–";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize, ToSchema)]
pub enum OrbitClass {
    #[strum(serialize = "LEO")]
    #[serde(rename = "LEO")]
    Leo,
    #[strum(serialize = "MEO")]
    #[serde(rename = "MEO")]
    Meo,
    #[strum(serialize = "GEO")]
    #[serde(rename = "GEO")]
    Geo,
}

impl OrbitClass {
    pub fn from_altitude(altitude_m: f64) -> Self {
        if altitude_m < LEO_CEILING_M {
            OrbitClass::Leo
        } else if altitude_m < GEO_FLOOR_M {
            OrbitClass::Meo
        } else {
            OrbitClass::Geo
        }
    }
}

/// Aggregate view of one propagated series.
///
/// Every derived field is `None` when the series holds no samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SummaryMetrics {
    pub sample_count: usize,
    pub mean_altitude_m: Option<f64>,
    pub mean_speed_mps: Option<f64>,
    pub orbit_class: Option<OrbitClass>,
}

impl SummaryMetrics {
    pub fn is_defined(&self) -> bool {
        self.mean_altitude_m.is_some() && self.mean_speed_mps.is_some()
    }
}

impl fmt::Display for SummaryMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let altitude = self
            .mean_altitude_m
            .map_or_else(|| PLACEHOLDER.to_string(), group_thousands);
        let speed = self
            .mean_speed_mps
            .map_or_else(|| PLACEHOLDER.to_string(), group_thousands);
        let class = self
            .orbit_class
            .map_or_else(|| PLACEHOLDER.to_string(), |c| c.to_string());
        write!(
            f,
            "avg altitude {altitude} m, avg speed {speed} m/s, orbit {class}"
        )
    }
}

/// Scalar speed in m/s from an SGP4 velocity vector in km/s.
pub fn speed_mps(velocity_km_s: [f64; 3]) -> f64 {
    let [vx, vy, vz] = velocity_km_s;
    (vx * vx + vy * vy + vz * vz).sqrt() * 1000.0
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn summarize(series: &PropagatedSeries) -> SummaryMetrics {
    let mean_altitude_m = mean(series.altitudes());
    SummaryMetrics {
        sample_count: series.len(),
        mean_altitude_m,
        mean_speed_mps: mean(series.speeds()),
        orbit_class: mean_altitude_m.map(OrbitClass::from_altitude),
    }
}

/// Round to a whole number and insert thousands separators.
fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
