//! Sun direction vectors and pivoted rotations.
//!
//! Frame: East = +X, North = +Y, Up = +Z (right-handed).

use nalgebra::{Isometry3, Matrix4, Point3, Translation3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::domain::SunPosition;

/// Reference direction that gets turned toward the sun
pub fn north() -> Vector3<f64> {
    Vector3::y()
}

pub fn up() -> Vector3<f64> {
    Vector3::z()
}

/// Unit vector pointing from the observer toward the sun
pub fn sun_direction(position: &SunPosition) -> Vector3<f64> {
    let (sin_az, cos_az) = position.azimuth_degrees.to_radians().sin_cos();
    let (sin_alt, cos_alt) = position.altitude_degrees.to_radians().sin_cos();
    // cos(90°) is not exactly zero in floating point
    let cos_alt = if cos_alt.abs() < 1e-15 { 0.0 } else { cos_alt };
    Vector3::new(cos_alt * sin_az, cos_alt * cos_az, sin_alt)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Turn about Up by the azimuth only; geometry stays upright
    Yaw,
    /// Turn North onto the full sun direction, tilting with altitude
    FullDirection,
}

impl RotationMode {
    pub fn from_flag(use_full_direction: bool) -> Self {
        if use_full_direction {
            RotationMode::FullDirection
        } else {
            RotationMode::Yaw
        }
    }
}

/// Rigid rotation about a pivot point. Never scales or shears.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTransform {
    pivot: Point3<f64>,
    rotation: UnitQuaternion<f64>,
}

impl RotationTransform {
    pub fn new(pivot: Point3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self { pivot, rotation }
    }

    /// Clockwise turn (seen from above) by a compass azimuth, so North ends up
    /// on that bearing.
    pub fn yaw(pivot: Point3<f64>, azimuth_degrees: f64) -> Self {
        let axis = Unit::new_unchecked(up());
        Self::new(
            pivot,
            UnitQuaternion::from_axis_angle(&axis, -azimuth_degrees.to_radians()),
        )
    }

    /// Rotation taking `from` onto `to`
    pub fn aligning(pivot: Point3<f64>, from: &Vector3<f64>, to: &Vector3<f64>) -> Self {
        let rotation = UnitQuaternion::rotation_between(from, to).unwrap_or_else(|| {
            // Antiparallel: any half turn works, keep the one about Up
            UnitQuaternion::from_axis_angle(&Unit::new_unchecked(up()), PI)
        });
        Self::new(pivot, rotation)
    }

    pub fn for_mode(mode: RotationMode, pivot: Point3<f64>, position: &SunPosition) -> Self {
        match mode {
            RotationMode::Yaw => Self::yaw(pivot, position.azimuth_degrees),
            RotationMode::FullDirection => {
                Self::aligning(pivot, &north(), &sun_direction(position))
            }
        }
    }

    pub fn pivot(&self) -> Point3<f64> {
        self.pivot
    }

    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.rotation
    }

    /// Equivalent isometry: move pivot to origin, rotate, move back
    pub fn isometry(&self) -> Isometry3<f64> {
        let to_pivot = Translation3::from(self.pivot.coords);
        let rotation = Isometry3::from_parts(Translation3::identity(), self.rotation);
        Isometry3::from_parts(to_pivot, UnitQuaternion::identity())
            * rotation
            * Isometry3::from_parts(to_pivot.inverse(), UnitQuaternion::identity())
    }

    /// Homogeneous 4x4 matrix
    pub fn to_matrix(&self) -> Matrix4<f64> {
        self.isometry().to_homogeneous()
    }

    pub fn inverse(&self) -> Self {
        Self::new(self.pivot, self.rotation.inverse())
    }

    pub fn apply_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.isometry() * point
    }

    /// Vectors are only rotated; the pivot does not affect them
    pub fn apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }
}

impl Serialize for RotationTransform {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Row-major rows of the homogeneous matrix
        let m = self.to_matrix();
        let rows: [[f64; 4]; 4] =
            std::array::from_fn(|r| std::array::from_fn(|c| m[(r, c)]));
        rows.serialize(serializer)
    }
}
