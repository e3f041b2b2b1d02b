//! Resolve an address, find the sun, and turn geometry toward it.
//!
//! The address goes through [`geocode::AddressResolver`] (coordinate pairs
//! are used as-is, anything else is geocoded once and cached), the sun is
//! located by [`solar::SunCalculator`], and [`component::SunOrientComponent`]
//! ties the two together for one evaluation at a time.

pub mod component;
pub mod config;
pub mod domain;
pub mod error;
pub mod geocode;
pub mod solar;
pub mod telemetry;

pub use component::{SunOrientComponent, SunOrientInputs, SunOrientOutputs};
pub use error::{ErrorKind, OrientError};
