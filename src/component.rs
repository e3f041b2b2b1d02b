//! # Sun Orient Component
//!
//! One evaluation: validate the date fields, resolve the address, locate the
//! sun, and rotate a copy of the input geometry toward it.
//!
//! Failed evaluations leave the previous outputs in place. Messages are reset
//! on every evaluation.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::GeocoderConfig;
use crate::domain::{Geometry, SunDateTime};
use crate::error::{ErrorKind, OrientError};
use crate::geocode::{AddressResolver, NominatimGeocoder, Resolution, ResolutionSource};
use crate::solar::{RotationMode, RotationTransform, SunCalculator, SunSolution};

pub const NOT_CONFIGURED_STATUS: &str =
    "Location not configured.\nEnter an address (or \"lat, lng\") and enable fetch to resolve it.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunOrientInputs {
    pub geometry: Geometry,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub fetch: bool,
    #[serde(flatten)]
    pub when: SunDateTime,
    #[serde(default = "origin")]
    pub pivot: Point3<f64>,
    #[serde(default)]
    pub use_full_direction: bool,
}

fn origin() -> Point3<f64> {
    Point3::origin()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunOrientOutputs {
    pub geometry: Geometry,
    pub transform: RotationTransform,
    pub azimuth: f64,
    pub altitude: f64,
    pub sun_vector: Vector3<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
    Remark,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeMessage {
    pub level: MessageLevel,
    pub text: String,
}

pub struct SunOrientComponent {
    resolver: AddressResolver,
    calculator: SunCalculator,
    messages: Vec<RuntimeMessage>,
    status: Option<String>,
    last_outputs: Option<SunOrientOutputs>,
}

impl SunOrientComponent {
    pub fn new(resolver: AddressResolver, calculator: SunCalculator) -> Self {
        Self {
            resolver,
            calculator,
            messages: Vec::new(),
            status: None,
            last_outputs: None,
        }
    }

    /// Component backed by the Nominatim geocoder and NOAA ephemeris
    pub fn from_config(cfg: &GeocoderConfig) -> Result<Self, OrientError> {
        let geocoder = NominatimGeocoder::new(cfg)?;
        Ok(Self::new(
            AddressResolver::new(Arc::new(geocoder)),
            SunCalculator::default(),
        ))
    }

    pub fn resolver(&self) -> &AddressResolver {
        &self.resolver
    }

    /// Messages raised by the most recent evaluation
    pub fn messages(&self) -> &[RuntimeMessage] {
        &self.messages
    }

    /// Text of the status output, if one has been produced
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Outputs of the last successful evaluation
    pub fn last_outputs(&self) -> Option<&SunOrientOutputs> {
        self.last_outputs.as_ref()
    }

    pub async fn evaluate(
        &mut self,
        inputs: &SunOrientInputs,
    ) -> Result<&SunOrientOutputs, OrientError> {
        self.messages.clear();

        let violations = inputs.when.check_ranges();
        if let Some(first) = violations.first().cloned() {
            for violation in &violations {
                self.push(MessageLevel::Error, violation.to_string());
            }
            return Err(first);
        }

        match self.solve(inputs).await {
            Ok(outputs) => {
                if outputs.altitude < 0.0 {
                    warn!(altitude = outputs.altitude, "sun is below the horizon");
                    self.push(
                        MessageLevel::Warning,
                        format!("Sun is below the horizon (altitude {:.2}°)", outputs.altitude),
                    );
                }
                info!(
                    azimuth = outputs.azimuth,
                    altitude = outputs.altitude,
                    "evaluation complete"
                );
                self.status = Some(outputs.status.clone());
                Ok(&*self.last_outputs.insert(outputs))
            }
            Err(err) => {
                match err.kind() {
                    ErrorKind::NotConfigured => {
                        warn!("no location configured");
                        self.push(MessageLevel::Remark, err.to_string());
                        self.status = Some(NOT_CONFIGURED_STATUS.to_string());
                    }
                    _ => self.push(MessageLevel::Error, err.to_string()),
                }
                Err(err)
            }
        }
    }

    async fn solve(&mut self, inputs: &SunOrientInputs) -> Result<SunOrientOutputs, OrientError> {
        let resolution = self.resolver.resolve(&inputs.address, inputs.fetch).await?;
        let solution = self.calculator.compute(
            resolution.coordinate,
            &inputs.when,
            inputs.pivot,
            RotationMode::from_flag(inputs.use_full_direction),
        )?;

        Ok(SunOrientOutputs {
            geometry: inputs.geometry.transformed(&solution.transform.isometry()),
            transform: solution.transform,
            azimuth: solution.position.azimuth_degrees,
            altitude: solution.position.altitude_degrees,
            sun_vector: solution.direction,
            latitude: resolution.coordinate.latitude,
            longitude: resolution.coordinate.longitude,
            status: format_status(&resolution, &solution),
        })
    }

    fn push(&mut self, level: MessageLevel, text: String) {
        self.messages.push(RuntimeMessage { level, text });
    }
}

fn format_status(resolution: &Resolution, solution: &SunSolution) -> String {
    let source = match resolution.source {
        ResolutionSource::Direct => "direct",
        ResolutionSource::Geocoded => "geocoded",
        ResolutionSource::Cached => "cached",
    };
    let mut lines = vec![
        format!("Address: {}", resolution.address),
        format!(
            "Coordinates: {:.6}, {:.6} ({source})",
            resolution.coordinate.latitude, resolution.coordinate.longitude
        ),
        format!("Date/Time: {}", solution.at.format("%Y-%m-%d %H:%M:%S")),
        format!("Azimuth: {:.2}°", solution.position.azimuth_degrees),
        format!("Altitude: {:.2}°", solution.position.altitude_degrees),
    ];
    if solution.position.is_below_horizon() {
        lines.push("Warning: the sun is below the horizon".to_string());
    }
    lines.join("\n")
}
