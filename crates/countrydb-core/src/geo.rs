// crates/countrydb-core/src/geo.rs

//! Great-circle distance and coordinate validation.

use crate::config::EARTH_RADIUS_KM;
use crate::error::{CountryDbError, Result};
use crate::model::Coordinate;

/// Haversine distance in kilometres on a spherical earth.
///
/// Non-finite input yields `NaN`; callers are expected to filter such
/// coordinates out first (see [`Coordinate::finite`]).
///
/// ```rust
/// use countrydb_core::geo::distance;
///
/// let london_paris = distance(51.5074, -0.1278, 48.8566, 2.3522);
/// assert!((london_paris - 343.0).abs() < 5.0);
/// ```
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// [`distance`] over named coordinates.
#[inline]
pub fn distance_between(a: Coordinate, b: Coordinate) -> f64 {
    distance(a.lat, a.lon, b.lat, b.lon)
}

/// Validates raw `lat`/`lon` parameters at a request boundary.
///
/// Unlike the list pipeline, which silently falls back to defaults, a lookup
/// endpoint rejects bad coordinates with [`CountryDbError::InvalidInput`].
pub fn parse_coordinate(lat: Option<&str>, lon: Option<&str>) -> Result<Coordinate> {
    let (lat, lon) = match (lat.map(str::trim), lon.map(str::trim)) {
        (Some(lat), Some(lon)) if !lat.is_empty() && !lon.is_empty() => (lat, lon),
        _ => return Err(CountryDbError::InvalidInput("lat and lon are required".into())),
    };

    let invalid = || CountryDbError::InvalidInput("invalid coordinates".into());
    let lat: f64 = lat.parse().map_err(|_| invalid())?;
    let lon: f64 = lon.parse().map_err(|_| invalid())?;

    let coordinate = Coordinate::new(lat, lon);
    if !coordinate.is_finite() || lat.abs() > 90.0 || lon.abs() > 180.0 {
        return Err(invalid());
    }
    Ok(coordinate)
}
