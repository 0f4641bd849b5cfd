use std::f64::consts::{PI, TAU};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

// WGS-84 radii, matching the geodetic conversion of satellite.js
const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;
const EARTH_POLAR_RADIUS_KM: f64 = 6356.752_314_2;
const LATITUDE_ITERATIONS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Geodetic {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

/// Greenwich mean sidereal time in radians.
pub fn sidereal_time(time: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&time.naive_utc()))
}

/// Convert a TEME position (km) at the given sample time to geodetic form.
pub fn to_geodetic(position_km: [f64; 3], time: DateTime<Utc>) -> Geodetic {
    eci_to_geodetic(position_km, sidereal_time(time))
}

/// Convert a TEME position (km) to geodetic coordinates for a known
/// sidereal angle `gmst` (radians).
pub fn eci_to_geodetic(position_km: [f64; 3], gmst: f64) -> Geodetic {
    let [x, y, z] = position_km;
    let a = EARTH_EQUATORIAL_RADIUS_KM;
    let f = (a - EARTH_POLAR_RADIUS_KM) / a;
    let e2 = 2.0 * f - f * f;
    let r = (x * x + y * y).sqrt();

    let longitude = wrap_pi(y.atan2(x) - gmst);

    let mut latitude = z.atan2(r);
    let mut c = 1.0;
    for _ in 0..LATITUDE_ITERATIONS {
        let sin_lat = latitude.sin();
        c = 1.0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        latitude = (z + a * c * e2 * sin_lat).atan2(r);
    }

    // r / cos(lat) degenerates on the polar axis
    let height_km = if latitude.cos().abs() > 1e-9 {
        r / latitude.cos() - a * c
    } else {
        z.abs() - EARTH_POLAR_RADIUS_KM
    };

    Geodetic {
        latitude_deg: latitude.to_degrees(),
        longitude_deg: longitude.to_degrees(),
        altitude_m: height_km * 1000.0,
    }
}

fn wrap_pi(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}
