use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::elements::ElementSetRecord;
use crate::geodetic;
use crate::propagate::PropagateError;

/// Inertial (TEME) position in km and velocity in km/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

impl StateVector {
    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(&self.velocity).all(|v| v.is_finite())
    }
}

/// An orbital propagation model the series builder can drive.
pub trait OrbitModel {
    type State;

    fn initialize(&self, record: &ElementSetRecord) -> Result<Self::State, PropagateError>;

    /// Position and velocity at an absolute time, `None` if the model
    /// cannot produce one.
    fn propagate_at(&self, state: &Self::State, time: DateTime<Utc>) -> Option<StateVector>;

    /// Sidereal angle in radians used for the geodetic rotation.
    fn sidereal_time(&self, time: DateTime<Utc>) -> f64 {
        geodetic::sidereal_time(time)
    }
}

/// SGP4/SDP4 through the `sgp4` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Model;

pub struct Sgp4State {
    pub elements: Elements,
    pub constants: Constants,
}

impl Sgp4State {
    pub fn epoch(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_naive_utc_and_offset(self.elements.datetime, Utc)
    }

    pub fn try_propagate(&self, time: DateTime<Utc>) -> Result<StateVector, PropagateError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&time.naive_utc())
            .map_err(|e| PropagateError::Propagation(e.to_string()))?;
        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PropagateError::Propagation(e.to_string()))?;

        Ok(StateVector {
            position: prediction.position,
            velocity: prediction.velocity,
        })
    }
}

impl OrbitModel for Sgp4Model {
    type State = Sgp4State;

    fn initialize(&self, record: &ElementSetRecord) -> Result<Sgp4State, PropagateError> {
        let elements = Elements::from_tle(
            Some(record.name.clone()),
            record.line1.as_bytes(),
            record.line2.as_bytes(),
        )?;
        let constants = Constants::from_elements(&elements)?;
        let state = Sgp4State {
            elements,
            constants,
        };
        log::debug!("'{}' element set epoch {}", record.name, state.epoch());
        Ok(state)
    }

    fn propagate_at(&self, state: &Sgp4State, time: DateTime<Utc>) -> Option<StateVector> {
        match state.try_propagate(time) {
            Ok(sv) if sv.is_finite() => Some(sv),
            Ok(_) => {
                log::debug!("non-finite state at {time}, skipping sample");
                None
            }
            Err(e) => {
                log::debug!("propagation failed at {time}: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::parse_records;
    use chrono::{Duration, TimeZone};

    const ISS: &str = "ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

    #[test]
    fn initializes_from_valid_elements() {
        let record = &parse_records(ISS)[0];
        let state = Sgp4Model.initialize(record).unwrap();

        assert_eq!(state.elements.norad_id, 25544);
        let expected = Utc.with_ymd_and_hms(2020, 7, 12, 21, 16, 0).unwrap();
        assert!((state.epoch() - expected).num_seconds().abs() < 60);
    }

    #[test]
    fn rejects_invalid_elements() {
        let record = &parse_records("BROKEN\n1 garbage\n2 garbage")[0];
        assert!(Sgp4Model.initialize(record).is_err());
    }

    #[test]
    fn propagated_state_is_near_earth() {
        let record = &parse_records(ISS)[0];
        let state = Sgp4Model.initialize(record).unwrap();
        let sv = Sgp4Model
            .propagate_at(&state, state.epoch() + Duration::minutes(30))
            .unwrap();

        let radius = sv.position.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!(radius > 6600.0 && radius < 6900.0, "radius {radius}");
    }
}
