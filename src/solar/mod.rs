pub mod ephemeris;
pub mod rotation;

pub use ephemeris::*;
pub use rotation::*;

use chrono::NaiveDateTime;
use nalgebra::{Point3, Vector3};
use std::sync::Arc;
use tracing::debug;

use crate::domain::{GeoCoordinate, SunDateTime, SunPosition};
use crate::error::OrientError;

/// Everything derived from one sun lookup
#[derive(Debug, Clone, PartialEq)]
pub struct SunSolution {
    pub at: NaiveDateTime,
    pub position: SunPosition,
    pub direction: Vector3<f64>,
    pub transform: RotationTransform,
}

/// Sun position, direction and rotation for a place and time
#[derive(Clone)]
pub struct SunCalculator {
    ephemeris: Arc<dyn SolarEphemeris>,
}

impl Default for SunCalculator {
    fn default() -> Self {
        Self::new(Arc::new(NoaaEphemeris::default()))
    }
}

impl SunCalculator {
    pub fn new(ephemeris: Arc<dyn SolarEphemeris>) -> Self {
        Self { ephemeris }
    }

    pub fn compute(
        &self,
        location: GeoCoordinate,
        when: &SunDateTime,
        pivot: Point3<f64>,
        mode: RotationMode,
    ) -> Result<SunSolution, OrientError> {
        let at = when.to_naive()?;
        let position = self.ephemeris.position(at, location);
        let direction = sun_direction(&position);
        let transform = RotationTransform::for_mode(mode, pivot, &position);

        debug!(
            %at,
            azimuth = position.azimuth_degrees,
            altitude = position.altitude_degrees,
            ?mode,
            "sun position computed"
        );

        Ok(SunSolution {
            at,
            position,
            direction,
            transform,
        })
    }
}
