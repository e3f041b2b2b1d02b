//! Geometry that can be oriented toward the sun.
//!
//! Only vertex data is carried; transforming a geometry always produces a new
//! value and leaves the source untouched.

use nalgebra::{Isometry3, Point3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Point { position: Point3<f64> },
    Polyline { points: Vec<Point3<f64>> },
    Mesh {
        vertices: Vec<Point3<f64>>,
        faces: Vec<[usize; 3]>,
    },
}

impl Geometry {
    /// All vertices, in storage order
    pub fn vertices(&self) -> &[Point3<f64>] {
        match self {
            Geometry::Point { position } => std::slice::from_ref(position),
            Geometry::Polyline { points } => points,
            Geometry::Mesh { vertices, .. } => vertices,
        }
    }

    /// Duplicate this geometry with `transform` applied to every vertex
    pub fn transformed(&self, transform: &Isometry3<f64>) -> Geometry {
        let map = |pts: &[Point3<f64>]| pts.iter().map(|p| transform * p).collect::<Vec<_>>();
        match self {
            Geometry::Point { position } => Geometry::Point {
                position: transform * position,
            },
            Geometry::Polyline { points } => Geometry::Polyline {
                points: map(points),
            },
            Geometry::Mesh { vertices, faces } => Geometry::Mesh {
                vertices: map(vertices),
                faces: faces.clone(),
            },
        }
    }

    /// Largest vertex distance between two geometries of the same shape.
    ///
    /// Returns `None` when the variants or vertex counts differ.
    pub fn max_deviation(&self, other: &Geometry) -> Option<f64> {
        if std::mem::discriminant(self) != std::mem::discriminant(other)
            || self.vertices().len() != other.vertices().len()
        {
            return None;
        }
        Some(
            self.vertices()
                .iter()
                .zip(other.vertices())
                .map(|(a, b)| nalgebra::distance(a, b))
                .fold(0.0, f64::max),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Translation3, UnitQuaternion, Vector3};

    fn square() -> Geometry {
        Geometry::Mesh {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            faces: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    #[test]
    fn test_transformed_leaves_source_untouched() {
        let source = square();
        let shift = Isometry3::from_parts(
            Translation3::new(0.0, 0.0, 5.0),
            UnitQuaternion::identity(),
        );
        let moved = source.transformed(&shift);

        assert_eq!(source, square());
        assert_eq!(moved.vertices()[2], Point3::new(1.0, 1.0, 5.0));
        match moved {
            Geometry::Mesh { faces, .. } => assert_eq!(faces.len(), 2),
            _ => panic!("variant changed"),
        }
    }

    #[test]
    fn test_point_rotation() {
        let point = Geometry::Point {
            position: Point3::new(0.0, 1.0, 0.0),
        };
        let quarter = Isometry3::rotation(Vector3::z() * std::f64::consts::FRAC_PI_2);
        let rotated = point.transformed(&quarter);
        assert!(nalgebra::distance(&rotated.vertices()[0], &Point3::new(-1.0, 0.0, 0.0)) < 1e-12);
    }

    #[test]
    fn test_max_deviation() {
        let a = Geometry::Polyline {
            points: vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
        };
        let b = Geometry::Polyline {
            points: vec![Point3::origin(), Point3::new(1.0, 0.5, 0.0)],
        };
        assert_eq!(a.max_deviation(&b), Some(0.5));
        assert_eq!(a.max_deviation(&square()), None);
    }

    #[test]
    fn test_serde_shape() {
        let json = r#"{"type":"polyline","points":[[0.0,1.0,0.0],[0.0,2.0,0.0]]}"#;
        let geometry: Geometry = serde_json::from_str(json).unwrap();
        assert_eq!(geometry.vertices().len(), 2);
    }
}
