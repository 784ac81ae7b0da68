// crates/countrydb-core/src/model.rs

//! Domain types. Upstream payload shapes live in [`crate::raw`] and are
//! converted into these once, at the ingestion boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// The user's position, as reported by a [`crate::geolocation::Geolocator`].
/// Never persisted.
pub type UserLocation = Coordinate;

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a coordinate from a `[lat, lon]` array. Shorter arrays give `None`.
    pub fn from_pair(pair: &[f64]) -> Option<Self> {
        match pair {
            [lat, lon, ..] => Some(Self::new(*lat, *lon)),
            _ => None,
        }
    }

    /// Both components present and finite.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// `Some(self)` when finite, for use in fallback chains.
    pub fn finite(self) -> Option<Self> {
        self.is_finite().then_some(self)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code, e.g. "EUR".
    pub code: String,
    pub name: String,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Flag {
    pub png: String,
    pub svg: String,
    pub alt: Option<String>,
}

/// A country record as consumed by the list and detail views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-3 code (`cca3`). Unique.
    pub code: String,
    /// ISO 3166-1 alpha-2 code (`cca2`), when the source provides it.
    pub iso2: Option<String>,
    /// Common display name, e.g. "France".
    pub name: String,
    pub official_name: Option<String>,
    pub region: String,
    pub subregion: Option<String>,
    pub population: u64,
    /// Country centroid.
    pub latlng: Option<Coordinate>,
    /// Capital city position, preferred over the centroid when present.
    pub capital_latlng: Option<Coordinate>,

    // Display-only fields, never read by the pipeline or the aggregator.
    pub capital: Vec<String>,
    /// Sorted list of (language code, language name).
    pub languages: Vec<(String, String)>,
    pub currencies: Vec<Currency>,
    pub flag: Flag,
}

impl Country {
    /// Minimal record; the remaining fields default to empty.
    pub fn new(code: impl Into<String>, name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            iso2: None,
            name: name.into(),
            official_name: None,
            region: region.into(),
            subregion: None,
            population: 0,
            latlng: None,
            capital_latlng: None,
            capital: Vec::new(),
            languages: Vec::new(),
            currencies: Vec::new(),
            flag: Flag::default(),
        }
    }

    pub fn with_population(mut self, population: u64) -> Self {
        self.population = population;
        self
    }

    pub fn with_latlng(mut self, lat: f64, lon: f64) -> Self {
        self.latlng = Some(Coordinate::new(lat, lon));
        self
    }

    pub fn with_capital(mut self, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        self.capital = vec![name.into()];
        self.capital_latlng = Some(Coordinate::new(lat, lon));
        self
    }

    /// Position used for distance ranking: capital if present, else centroid.
    ///
    /// A non-finite candidate is skipped, not returned.
    pub fn position(&self) -> Option<Coordinate> {
        self.capital_latlng
            .and_then(Coordinate::finite)
            .or_else(|| self.latlng.and_then(Coordinate::finite))
    }

    /// First capital name, if any.
    pub fn capital_name(&self) -> Option<&str> {
        self.capital.first().map(String::as_str)
    }

    /// Whether `key` names this country (cca3 or cca2, case-insensitive).
    pub fn matches_code(&self, key: &str) -> bool {
        let key = key.trim();
        self.code.eq_ignore_ascii_case(key)
            || self
                .iso2
                .as_deref()
                .is_some_and(|iso2| iso2.eq_ignore_ascii_case(key))
    }
}

// -----------------------------------------------------------------------------
// AUXILIARY RECORDS
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Short group, e.g. "Clouds".
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Current conditions at a coordinate. Metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub temp: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// Encyclopedia summary for a title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    pub extract: String,
    pub thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub url: String,
    pub thumb_url: String,
    pub alt: Option<String>,
    /// Attribution: photographer display name.
    pub author: String,
    pub author_username: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageSet {
    pub images: Vec<Image>,
    /// Total hits reported by the search, not the number returned.
    pub total: u64,
}

impl ImageSet {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

// -----------------------------------------------------------------------------
// AGGREGATE
// -----------------------------------------------------------------------------

/// Which tier of the coordinate fallback chain produced the weather position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSource {
    /// Supplied by the caller, e.g. carried over from a list-page selection.
    Explicit,
    Capital,
    Centroid,
    None,
}

impl CoordinateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateSource::Explicit => "explicit",
            CoordinateSource::Capital => "capital",
            CoordinateSource::Centroid => "centroid",
            CoordinateSource::None => "none",
        }
    }
}

/// Best-effort auxiliary data. `None` means "not available", whatever the cause.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Auxiliaries {
    pub weather: Option<Weather>,
    pub summary: Option<Summary>,
    pub images: Option<ImageSet>,
}

/// Composite detail-page record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub primary: Country,
    pub auxiliaries: Auxiliaries,
    pub resolved_coordinate: Option<Coordinate>,
    pub coordinate_source: CoordinateSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_needs_two_components() {
        assert_eq!(Coordinate::from_pair(&[]), None);
        assert_eq!(Coordinate::from_pair(&[46.0]), None);
        assert_eq!(
            Coordinate::from_pair(&[46.0, 2.0]),
            Some(Coordinate::new(46.0, 2.0))
        );
    }

    #[test]
    fn position_prefers_capital_then_centroid() {
        let fr = Country::new("FRA", "France", "Europe")
            .with_latlng(46.0, 2.0)
            .with_capital("Paris", 48.87, 2.33);
        assert_eq!(fr.position(), Some(Coordinate::new(48.87, 2.33)));

        let mut centroid_only = fr.clone();
        centroid_only.capital_latlng = None;
        assert_eq!(centroid_only.position(), Some(Coordinate::new(46.0, 2.0)));

        let mut broken_capital = fr.clone();
        broken_capital.capital_latlng = Some(Coordinate::new(f64::NAN, 2.33));
        assert_eq!(broken_capital.position(), Some(Coordinate::new(46.0, 2.0)));

        assert_eq!(Country::new("ATA", "Antarctica", "Antarctic").position(), None);
    }

    #[test]
    fn code_match_accepts_cca2_and_cca3() {
        let mut de = Country::new("DEU", "Germany", "Europe");
        de.iso2 = Some("DE".into());
        assert!(de.matches_code("deu"));
        assert!(de.matches_code(" de "));
        assert!(!de.matches_code("DNK"));
    }

    #[test]
    fn coordinate_source_serializes_lowercase() {
        let json = serde_json::to_string(&CoordinateSource::Capital).unwrap();
        assert_eq!(json, "\"capital\"");
    }
}
