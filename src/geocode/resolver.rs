use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::nominatim::{parse_degrees, Geocoder};
use crate::domain::GeoCoordinate;
use crate::error::OrientError;

/// How an address string should be resolved
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome<'a> {
    /// `"<lat>, <lng>"` typed directly; no lookup needed
    DirectCoordinates(GeoCoordinate),
    /// Anything else goes to the geocoder
    NeedsLookup(&'a str),
}

impl<'a> ParseOutcome<'a> {
    /// Classify an address. Only a comma-separated pair of two numbers counts
    /// as direct coordinates; an in-range check applies once both parse.
    pub fn classify(address: &'a str) -> Result<Self, OrientError> {
        let parts: Vec<&str> = address.split(',').collect();
        if let [lat, lng] = parts.as_slice() {
            if let (Ok(lat), Ok(lng)) = (parse_degrees(lat), parse_degrees(lng)) {
                return GeoCoordinate::new(lat, lng).map(ParseOutcome::DirectCoordinates);
            }
        }
        Ok(ParseOutcome::NeedsLookup(address))
    }
}

/// Where a resolved coordinate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Direct,
    Geocoded,
    Cached,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub address: String,
    pub coordinate: GeoCoordinate,
    pub source: ResolutionSource,
}

/// Single-slot memory of the last resolved address
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressCache {
    slot: Option<(String, GeoCoordinate)>,
}

impl AddressCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-seeded with one entry
    pub fn with_entry(address: impl Into<String>, coordinate: GeoCoordinate) -> Self {
        Self {
            slot: Some((address.into(), coordinate)),
        }
    }

    pub fn entry(&self) -> Option<(&str, GeoCoordinate)> {
        self.slot.as_ref().map(|(a, c)| (a.as_str(), *c))
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Replace address and coordinate together
    pub fn replace(&mut self, address: String, coordinate: GeoCoordinate) {
        self.slot = Some((address, coordinate));
    }
}

/// Turns addresses into coordinates, hitting the network only on a cache miss
pub struct AddressResolver {
    geocoder: Arc<dyn Geocoder>,
    cache: AddressCache,
}

impl AddressResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self::with_cache(geocoder, AddressCache::new())
    }

    pub fn with_cache(geocoder: Arc<dyn Geocoder>, cache: AddressCache) -> Self {
        Self { geocoder, cache }
    }

    pub fn cache(&self) -> &AddressCache {
        &self.cache
    }

    /// Resolve `address` when `fetch` is set and it differs from the cached
    /// one; otherwise reuse the cache.
    pub async fn resolve(&mut self, address: &str, fetch: bool) -> Result<Resolution, OrientError> {
        let wanted = fetch && !address.trim().is_empty();
        let unchanged = self.cache.entry().is_some_and(|(cached, _)| cached == address);

        if !wanted || unchanged {
            let (cached, coordinate) = self.cache.entry().ok_or(OrientError::NotConfigured)?;
            debug!(address = cached, fetch, "reusing cached location");
            return Ok(Resolution {
                address: cached.to_string(),
                coordinate,
                source: ResolutionSource::Cached,
            });
        }

        let (coordinate, source) = match ParseOutcome::classify(address)? {
            ParseOutcome::DirectCoordinates(coordinate) => {
                debug!(%address, "address is a coordinate pair, skipping lookup");
                (coordinate, ResolutionSource::Direct)
            }
            ParseOutcome::NeedsLookup(query) => {
                (self.geocoder.geocode(query).await?, ResolutionSource::Geocoded)
            }
        };

        self.cache.replace(address.to_string(), coordinate);
        info!(%address, %coordinate, ?source, "location resolved");

        Ok(Resolution {
            address: address.to_string(),
            coordinate,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::MockGeocoder;
    use proptest::prelude::*;
    use rstest::rstest;

    fn london() -> GeoCoordinate {
        GeoCoordinate::new(51.5074, -0.1278).unwrap()
    }

    fn resolver_with(mock: MockGeocoder, cache: AddressCache) -> AddressResolver {
        AddressResolver::with_cache(Arc::new(mock), cache)
    }

    #[rstest]
    #[case("51.5074, -0.1278", 51.5074, -0.1278)]
    #[case("-33.8688,151.2093", -33.8688, 151.2093)]
    #[case(" +1e1 , -2.5E0 ", 10.0, -2.5)]
    fn test_classify_direct(#[case] address: &str, #[case] lat: f64, #[case] lng: f64) {
        assert_eq!(
            ParseOutcome::classify(address).unwrap(),
            ParseOutcome::DirectCoordinates(GeoCoordinate::new(lat, lng).unwrap())
        );
    }

    #[rstest]
    #[case("10 Downing Street, London")]
    #[case("51.5, -0.1, 3")]
    #[case("51.5")]
    #[case("Paris")]
    #[case("51,5074; -0,1278")]
    fn test_classify_lookup(#[case] address: &str) {
        assert_eq!(
            ParseOutcome::classify(address).unwrap(),
            ParseOutcome::NeedsLookup(address)
        );
    }

    #[test]
    fn test_classify_out_of_range_pair() {
        assert!(matches!(
            ParseOutcome::classify("95.0, 10.0"),
            Err(OrientError::InvalidCoordinate { .. })
        ));
    }

    #[tokio::test]
    async fn test_direct_pair_never_calls_geocoder() {
        let mut mock = MockGeocoder::new();
        mock.expect_geocode().times(0);
        let mut resolver = resolver_with(mock, AddressCache::new());

        let resolution = resolver.resolve("51.5074, -0.1278", true).await.unwrap();

        assert_eq!(resolution.coordinate, london());
        assert_eq!(resolution.source, ResolutionSource::Direct);
        assert_eq!(resolver.cache().entry(), Some(("51.5074, -0.1278", london())));
    }

    #[tokio::test]
    async fn test_unchanged_address_is_looked_up_once() {
        let mut mock = MockGeocoder::new();
        mock.expect_geocode()
            .times(1)
            .returning(|_| Ok(GeoCoordinate::new(48.8566, 2.3522).unwrap()));
        let mut resolver = resolver_with(mock, AddressCache::new());

        let first = resolver.resolve("Paris", true).await.unwrap();
        let second = resolver.resolve("Paris", true).await.unwrap();

        assert_eq!(first.source, ResolutionSource::Geocoded);
        assert_eq!(second.source, ResolutionSource::Cached);
        assert_eq!(
            first.coordinate.latitude.to_bits(),
            second.coordinate.latitude.to_bits()
        );
        assert_eq!(
            first.coordinate.longitude.to_bits(),
            second.coordinate.longitude.to_bits()
        );
    }

    #[tokio::test]
    async fn test_fetch_disabled_reuses_cache_even_for_new_address() {
        let mut mock = MockGeocoder::new();
        mock.expect_geocode().times(0);
        let mut resolver = resolver_with(mock, AddressCache::with_entry("London", london()));

        let resolution = resolver.resolve("Berlin", false).await.unwrap();

        assert_eq!(resolution.address, "London");
        assert_eq!(resolution.source, ResolutionSource::Cached);
    }

    #[rstest]
    #[case("", false)]
    #[case("Paris", false)]
    #[case("", true)]
    #[case("   ", true)]
    #[tokio::test]
    async fn test_empty_cache_is_not_configured(#[case] address: &str, #[case] fetch: bool) {
        let mut mock = MockGeocoder::new();
        mock.expect_geocode().times(0);
        let mut resolver = resolver_with(mock, AddressCache::new());

        assert_eq!(
            resolver.resolve(address, fetch).await,
            Err(OrientError::NotConfigured)
        );
    }

    #[tokio::test]
    async fn test_failed_lookup_keeps_previous_cache() {
        let mut mock = MockGeocoder::new();
        mock.expect_geocode().times(1).returning(|address| {
            Err(OrientError::NoResults {
                address: address.to_string(),
            })
        });
        let mut resolver = resolver_with(mock, AddressCache::with_entry("London", london()));

        let err = resolver.resolve("Atlantis", true).await.unwrap_err();

        assert_eq!(
            err,
            OrientError::NoResults {
                address: "Atlantis".into()
            }
        );
        assert_eq!(resolver.cache().entry(), Some(("London", london())));
    }

    #[tokio::test]
    async fn test_changed_address_replaces_cache() {
        let mut mock = MockGeocoder::new();
        mock.expect_geocode()
            .times(1)
            .returning(|_| Ok(GeoCoordinate::new(52.52, 13.405).unwrap()));
        let mut resolver = resolver_with(mock, AddressCache::with_entry("London", london()));

        resolver.resolve("Berlin", true).await.unwrap();

        let (address, coordinate) = resolver.cache().entry().unwrap();
        assert_eq!(address, "Berlin");
        assert_eq!(coordinate.latitude, 52.52);
    }

    proptest! {
        #[test]
        fn prop_numeric_pairs_resolve_directly(lat in -90.0f64..=90.0, lng in -180.0f64..=180.0) {
            let address = format!("{lat}, {lng}");
            let outcome = ParseOutcome::classify(&address).unwrap();
            prop_assert_eq!(
                outcome,
                ParseOutcome::DirectCoordinates(GeoCoordinate { latitude: lat, longitude: lng })
            );
        }
    }
}
