use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::analytics::speed_mps;
use crate::elements::ElementSetRecord;
use crate::geodetic::eci_to_geodetic;
use crate::propagate::{OrbitModel, Sgp4Model, Window};

/// Trajectory of one record over a time window.
///
/// All sequences are index-aligned with `epochs`. Samples the model could not
/// produce are left out, so the series may be shorter than the window asks
/// for, or empty.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PropagatedSeries {
    name: String,
    index: usize,
    epochs: Vec<DateTime<Utc>>,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    altitudes: Vec<f64>,
    speeds: Vec<f64>,
}

/// One row of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Sample {
    pub epoch: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
    pub speed_mps: f64,
}

impl PropagatedSeries {
    pub fn empty(name: impl Into<String>, index: usize) -> Self {
        Self::with_capacity(name.into(), index, 0)
    }

    fn with_capacity(name: String, index: usize, capacity: usize) -> Self {
        Self {
            name,
            index,
            epochs: Vec::with_capacity(capacity),
            latitudes: Vec::with_capacity(capacity),
            longitudes: Vec::with_capacity(capacity),
            altitudes: Vec::with_capacity(capacity),
            speeds: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, sample: Sample) {
        self.epochs.push(sample.epoch);
        self.latitudes.push(sample.latitude_deg);
        self.longitudes.push(sample.longitude_deg);
        self.altitudes.push(sample.altitude_m);
        self.speeds.push(sample.speed_mps);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the source record.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn epochs(&self) -> &[DateTime<Utc>] {
        &self.epochs
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    pub fn altitudes(&self) -> &[f64] {
        &self.altitudes
    }

    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        (0..self.len()).map(move |i| Sample {
            epoch: self.epochs[i],
            latitude_deg: self.latitudes[i],
            longitude_deg: self.longitudes[i],
            altitude_m: self.altitudes[i],
            speed_mps: self.speeds[i],
        })
    }
}

/// Propagate a record over `window` with SGP4.
pub fn propagate(record: &ElementSetRecord, window: &Window) -> PropagatedSeries {
    propagate_with(&Sgp4Model, record, window)
}

pub fn propagate_with<M: OrbitModel>(
    model: &M,
    record: &ElementSetRecord,
    window: &Window,
) -> PropagatedSeries {
    let state = match model.initialize(record) {
        Ok(state) => state,
        Err(e) => {
            log::warn!("Cannot propagate '{}' (#{}): {}", record.name, record.index, e);
            return PropagatedSeries::empty(record.name.clone(), record.index);
        }
    };

    let mut series =
        PropagatedSeries::with_capacity(record.name.clone(), record.index, initial_capacity(window));

    for time in window.sample_times() {
        let Some(sv) = model.propagate_at(&state, time) else {
            continue;
        };
        let geo = eci_to_geodetic(sv.position, model.sidereal_time(time));
        series.push(Sample {
            epoch: time,
            latitude_deg: geo.latitude_deg,
            longitude_deg: geo.longitude_deg,
            altitude_m: geo.altitude_m,
            speed_mps: speed_mps(sv.velocity),
        });
    }

    if series.len() < window.sample_count() {
        log::debug!(
            "'{}': {} of {} samples propagated",
            record.name,
            series.len(),
            window.sample_count()
        );
    }

    series
}

// Vectors grow past this on demand; the window length is caller input.
const MAX_RESERVED_SAMPLES: usize = 4096;

fn initial_capacity(window: &Window) -> usize {
    window.sample_count().min(MAX_RESERVED_SAMPLES)
}

/// Propagate many records in parallel. Output order follows `records`.
pub fn propagate_all(records: &[ElementSetRecord], window: &Window) -> Vec<PropagatedSeries> {
    records
        .par_iter()
        .map(|record| propagate(record, window))
        .collect()
}
