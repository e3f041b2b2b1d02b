//! Address lookup against a Nominatim-compatible search endpoint
//!
//! Public Nominatim instances require an identifying `User-Agent`, so every
//! request carries the configured one.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::GeocoderConfig;
use crate::domain::GeoCoordinate;
use crate::error::OrientError;

/// Resolves a free-form address to a coordinate
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeoCoordinate, OrientError>;
}

pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(cfg: &GeocoderConfig) -> Result<Self, OrientError> {
        let build_error = |message: String| OrientError::Geocoding {
            address: String::new(),
            message,
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&cfg.user_agent)
                .map_err(|e| build_error(format!("invalid user agent: {e}")))?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&cfg.accept_language)
                .map_err(|e| build_error(format!("invalid accept language: {e}")))?,
        );
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .default_headers(headers)
            .build()
            .map_err(|e| build_error(e.to_string()))?;

        Ok(Self {
            client,
            base_url: cfg.base_url.clone(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeoCoordinate, OrientError> {
        let failed = |message: String| OrientError::Geocoding {
            address: address.to_string(),
            message,
        };

        debug!(%address, "geocoding address");

        let resp = self
            .client
            .get(self.search_url())
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| failed(format!("request failed: {e}")))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| failed(format!("reading response failed: {e}")))?;
        if !status.is_success() {
            error!(%address, %status, "geocoding service returned an error");
            return Err(failed(format!("HTTP {status}: {body}")));
        }

        let places: Vec<RawPlace> = serde_json::from_str(&body)
            .map_err(|e| failed(format!("invalid JSON response: {e}")))?;
        let place = places.into_iter().next().ok_or_else(|| OrientError::NoResults {
            address: address.to_string(),
        })?;

        let coordinate = GeoCoordinate::new(parse_degrees(&place.lat)?, parse_degrees(&place.lon)?)?;
        info!(
            %address,
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "geocoded address"
        );
        Ok(coordinate)
    }
}

/// Parse a decimal degree string. Always uses `.` as the decimal separator.
pub(crate) fn parse_degrees(raw: &str) -> Result<f64, OrientError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| OrientError::InvalidCoordinate {
            value: raw.to_string(),
        })
}

// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct RawPlace {
    lat: String,
    lon: String,
}
