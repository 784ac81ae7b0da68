// crates/countrydb-core/src/geolocation.rs

//! The "near me" capability: one position, or a typed failure.

use crate::model::UserLocation;
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Geolocation is not supported on this platform")]
    Unsupported,
    #[error("Permission to read the location was denied")]
    PermissionDenied,
    #[error("Unable to retrieve your location: {0}")]
    Unavailable(String),
}

/// Asynchronous source of the user's position.
pub trait Geolocator: Send + Sync {
    fn locate(
        &self,
    ) -> impl Future<Output = std::result::Result<UserLocation, GeolocationError>> + Send;
}

/// A locator answering with a preconfigured position (e.g. from `--near`),
/// or `Unsupported` when there is none.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocator(pub Option<UserLocation>);

impl Geolocator for FixedLocator {
    async fn locate(&self) -> std::result::Result<UserLocation, GeolocationError> {
        match self.0 {
            Some(location) if location.is_finite() => Ok(location),
            Some(_) => Err(GeolocationError::Unavailable(
                "position has non-finite components".into(),
            )),
            None => Err(GeolocationError::Unsupported),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CountryDbError;
    use crate::gate::LatestLocator;
    use crate::model::Coordinate;

    #[tokio::test]
    async fn fixed_locator_outcomes() {
        let here = Coordinate::new(47.37, 8.54);
        assert_eq!(FixedLocator(Some(here)).locate().await, Ok(here));
        assert_eq!(FixedLocator(None).locate().await, Err(GeolocationError::Unsupported));
        assert!(matches!(
            FixedLocator(Some(Coordinate::new(f64::INFINITY, 0.0))).locate().await,
            Err(GeolocationError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn latest_locator_maps_failures() {
        let locator = LatestLocator::new(FixedLocator(None));
        let err = locator.locate().await.unwrap_err();
        assert!(matches!(
            err,
            CountryDbError::Geolocation(GeolocationError::Unsupported)
        ));
    }
}
