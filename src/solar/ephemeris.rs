//! # Solar Ephemeris
//!
//! Sun position from date, time and location using the NOAA solar calculator
//! equations (Meeus-based, good to a small fraction of a degree for
//! 1901-2099). Date-times are read as UTC.

use chrono::{NaiveDateTime, Timelike};

use crate::domain::{GeoCoordinate, SunPosition};

/// Source of apparent sun positions
pub trait SolarEphemeris: Send + Sync {
    fn position(&self, at: NaiveDateTime, location: GeoCoordinate) -> SunPosition;
}

/// NOAA general solar position algorithm
#[derive(Debug, Clone, Copy)]
pub struct NoaaEphemeris {
    /// Apply atmospheric refraction to the altitude
    pub refraction: bool,
}

impl Default for NoaaEphemeris {
    fn default() -> Self {
        Self { refraction: true }
    }
}

impl NoaaEphemeris {
    pub fn geometric() -> Self {
        Self { refraction: false }
    }
}

/// Julian day number including the fraction of the day
pub fn julian_day(at: NaiveDateTime) -> f64 {
    at.and_utc().timestamp() as f64 / 86_400.0 + 2_440_587.5
}

/// Refraction correction in degrees for a geometric altitude in degrees
pub fn atmospheric_refraction(altitude_deg: f64) -> f64 {
    let arcsec = if altitude_deg > 85.0 {
        0.0
    } else if altitude_deg > 5.0 {
        let t = altitude_deg.to_radians().tan();
        58.1 / t - 0.07 / t.powi(3) + 0.000086 / t.powi(5)
    } else if altitude_deg > -0.575 {
        let h = altitude_deg;
        1735.0 + h * (-518.2 + h * (103.4 + h * (-12.79 + h * 0.711)))
    } else {
        -20.772 / altitude_deg.to_radians().tan()
    };
    arcsec / 3600.0
}

impl SolarEphemeris for NoaaEphemeris {
    fn position(&self, at: NaiveDateTime, location: GeoCoordinate) -> SunPosition {
        // Julian centuries since J2000.0
        let t = (julian_day(at) - 2_451_545.0) / 36_525.0;

        let mean_long = (280.46646 + t * (36_000.76983 + t * 0.0003032)).rem_euclid(360.0);
        let mean_anom = (357.52911 + t * (35_999.05029 - 0.0001537 * t)).to_radians();
        let eccent = 0.016708634 - t * (0.000042037 + 0.0000001267 * t);

        let center = mean_anom.sin() * (1.914602 - t * (0.004817 + 0.000014 * t))
            + (2.0 * mean_anom).sin() * (0.019993 - 0.000101 * t)
            + (3.0 * mean_anom).sin() * 0.000289;
        let omega = (125.04 - 1934.136 * t).to_radians();
        let apparent_long = (mean_long + center - 0.00569 - 0.00478 * omega.sin()).to_radians();

        let mean_obliq =
            23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.00059 - t * 0.001813))) / 60.0) / 60.0;
        let obliq = (mean_obliq + 0.00256 * omega.cos()).to_radians();

        let declination = (obliq.sin() * apparent_long.sin()).asin();

        // Equation of time in minutes
        let y = (obliq / 2.0).tan().powi(2);
        let l0 = mean_long.to_radians();
        let eq_time = 4.0
            * (y * (2.0 * l0).sin() - 2.0 * eccent * mean_anom.sin()
                + 4.0 * eccent * y * mean_anom.sin() * (2.0 * l0).cos()
                - 0.5 * y * y * (4.0 * l0).sin()
                - 1.25 * eccent * eccent * (2.0 * mean_anom).sin())
            .to_degrees();

        let minutes = at.num_seconds_from_midnight() as f64 / 60.0;
        let true_solar = (minutes + eq_time + 4.0 * location.longitude).rem_euclid(1440.0);
        let hour_angle = (true_solar / 4.0 - 180.0).to_radians();

        let lat = location.latitude.to_radians();
        let cos_zenith = (lat.sin() * declination.sin()
            + lat.cos() * declination.cos() * hour_angle.cos())
        .clamp(-1.0, 1.0);
        let mut altitude = 90.0 - cos_zenith.acos().to_degrees();
        if self.refraction {
            altitude += atmospheric_refraction(altitude);
        }

        // Measured from south, westward; shift to a north-based compass bearing
        let from_south = hour_angle
            .sin()
            .atan2(hour_angle.cos() * lat.sin() - declination.tan() * lat.cos());
        let azimuth = (from_south.to_degrees() + 180.0).rem_euclid(360.0);

        SunPosition {
            azimuth_degrees: azimuth,
            altitude_degrees: altitude.clamp(-90.0, 90.0),
        }
    }
}
