use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::error::OrientError;

// ============================================================================
// Location
// ============================================================================

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Latitude, -90 (south) to 90 (north)
    pub latitude: f64,
    /// Longitude, -180 (west) to 180 (east)
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, OrientError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(OrientError::InvalidCoordinate {
                value: format!("latitude {latitude}"),
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(OrientError::InvalidCoordinate {
                value: format!("longitude {longitude}"),
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

// ============================================================================
// Date and time
// ============================================================================

/// Wall-clock date and decimal hour as entered by the user
///
/// The range checks here are deliberately coarse: `day` is only bounded to
/// 1..=31. Month lengths are enforced later by [`SunDateTime::to_naive`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct SunDateTime {
    pub year: i32,
    #[validate(range(min = 1, max = 12, message = "month must be between 1 and 12"))]
    pub month: u32,
    #[validate(range(min = 1, max = 31, message = "day must be between 1 and 31"))]
    pub day: u32,
    /// Decimal hour of day, e.g. 13.5 for 13:30
    #[validate(range(
        min = 0.0,
        exclusive_max = 24.0,
        message = "time must be at least 0 and less than 24"
    ))]
    pub time: f64,
}

/// Field order used when reporting validation failures
const VALIDATED_FIELDS: [&str; 3] = ["month", "day", "time"];

impl SunDateTime {
    pub fn new(year: i32, month: u32, day: u32, time: f64) -> Self {
        Self {
            year,
            month,
            day,
            time,
        }
    }

    /// Coarse range check of month, day and time.
    ///
    /// Returns one error per violated field, in field order.
    pub fn check_ranges(&self) -> Vec<OrientError> {
        let mut out = Vec::new();
        if let Err(errors) = self.validate() {
            let fields = errors.field_errors();
            for field in VALIDATED_FIELDS {
                if let Some(errs) = fields.get(field) {
                    let message = errs
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .next()
                        .unwrap_or_else(|| format!("{field} is out of range"));
                    out.push(OrientError::InvalidInput { field, message });
                }
            }
        }
        // Range validators let NaN through
        let time_reported = out
            .iter()
            .any(|e| matches!(e, OrientError::InvalidInput { field: "time", .. }));
        if !self.time.is_finite() && !time_reported {
            out.push(OrientError::InvalidInput {
                field: "time",
                message: "time must be a finite number".to_string(),
            });
        }
        out
    }

    /// Split the decimal hour into (hour, minute, second), truncating each step
    pub fn hms(&self) -> (u32, u32, u32) {
        let hour = self.time.floor();
        let minutes = (self.time - hour) * 60.0;
        let minute = minutes.floor();
        let second = ((minutes - minute) * 60.0).floor();
        (hour as u32, minute as u32, second as u32)
    }

    /// Build the calendar date-time. Fails on dates such as April 31.
    pub fn to_naive(&self) -> Result<NaiveDateTime, OrientError> {
        let (hour, minute, second) = self.hms();
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .ok_or(OrientError::InvalidDate {
                year: self.year,
                month: self.month,
                day: self.day,
            })
    }
}

// ============================================================================
// Sun position
// ============================================================================

/// Apparent position of the sun in the local horizon frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunPosition {
    /// Compass bearing, clockwise from north, 0-360
    pub azimuth_degrees: f64,
    /// Angle above the horizon, -90 to 90
    pub altitude_degrees: f64,
}

impl SunPosition {
    pub fn is_below_horizon(&self) -> bool {
        self.altitude_degrees < 0.0
    }
}
