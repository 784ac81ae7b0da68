// crates/countrydb-core/src/raw.rs

//! Raw upstream payloads, exactly as the JSON APIs return them.
//!
//! NOTE: These mirror third-party schemas and are *not* part of the public
//! API. Convert with the `From` impls below; nothing past the ingestion
//! boundary should see `[lat, lon]` arrays.

use crate::model::{
    Condition, Coordinate, Country, Currency, Flag, Image, ImageSet, Summary, Thumbnail, Weather,
};
use serde::Deserialize;
use std::collections::BTreeMap;

// -----------------------------------------------------------------------------
// REST COUNTRIES (v3.1)
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NameRaw {
    pub common: String,
    #[serde(default)]
    pub official: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FlagsRaw {
    #[serde(default)]
    pub png: String,
    #[serde(default)]
    pub svg: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CurrencyRaw {
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CapitalInfoRaw {
    #[serde(default)]
    pub latlng: Vec<f64>,
}

/// Raw country from `restcountries.com/v3.1`. The list endpoint is queried
/// with a `fields=` filter, so everything except the name may be missing.
#[derive(Debug, Deserialize)]
pub struct CountryRaw {
    pub name: NameRaw,
    #[serde(default)]
    pub cca2: Option<String>,
    #[serde(default)]
    pub cca3: String,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub flags: FlagsRaw,
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    #[serde(default)]
    pub currencies: BTreeMap<String, CurrencyRaw>,
    #[serde(default)]
    pub latlng: Vec<f64>,
    #[serde(rename = "capitalInfo", default)]
    pub capital_info: CapitalInfoRaw,
}

pub type CountriesRaw = Vec<CountryRaw>;

impl From<CountryRaw> for Country {
    fn from(raw: CountryRaw) -> Self {
        Country {
            code: raw.cca3,
            iso2: raw.cca2.filter(|s| !s.is_empty()),
            name: raw.name.common,
            official_name: raw.name.official,
            region: raw.region,
            subregion: raw.subregion,
            population: raw.population,
            latlng: Coordinate::from_pair(&raw.latlng),
            capital_latlng: Coordinate::from_pair(&raw.capital_info.latlng),
            capital: raw.capital,
            // BTreeMap iteration is already sorted by key
            languages: raw.languages.into_iter().collect(),
            currencies: raw
                .currencies
                .into_iter()
                .map(|(code, c)| Currency {
                    code,
                    name: c.name,
                    symbol: c.symbol,
                })
                .collect(),
            flag: Flag {
                png: raw.flags.png,
                svg: raw.flags.svg,
                alt: raw.flags.alt,
            },
        }
    }
}

// -----------------------------------------------------------------------------
// OPENWEATHER (One Call 3.0)
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ConditionRaw {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct CurrentRaw {
    pub temp: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    #[serde(default)]
    pub weather: Vec<ConditionRaw>,
}

#[derive(Debug, Deserialize)]
pub struct WeatherRaw {
    pub current: CurrentRaw,
}

impl From<WeatherRaw> for Weather {
    fn from(raw: WeatherRaw) -> Self {
        Weather {
            temp: raw.current.temp,
            humidity: raw.current.humidity,
            wind_speed: raw.current.wind_speed,
            conditions: raw
                .current
                .weather
                .into_iter()
                .map(|c| Condition {
                    main: c.main,
                    description: c.description,
                    icon: c.icon,
                })
                .collect(),
        }
    }
}

// -----------------------------------------------------------------------------
// WIKIPEDIA (REST page summary)
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ThumbnailRaw {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRaw {
    pub title: String,
    #[serde(default)]
    pub extract: String,
    #[serde(default)]
    pub thumbnail: Option<ThumbnailRaw>,
}

impl From<SummaryRaw> for Summary {
    fn from(raw: SummaryRaw) -> Self {
        Summary {
            title: raw.title,
            extract: raw.extract,
            thumbnail: raw.thumbnail.map(|t| Thumbnail {
                source: t.source,
                width: t.width,
                height: t.height,
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// UNSPLASH (search/photos)
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PhotoUrlsRaw {
    pub regular: String,
    #[serde(default)]
    pub small: String,
    pub thumb: String,
    #[serde(default)]
    pub raw: String,
}

#[derive(Debug, Deserialize)]
pub struct PhotoUserRaw {
    pub name: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct PhotoRaw {
    pub id: String,
    pub urls: PhotoUrlsRaw,
    #[serde(default)]
    pub alt_description: Option<String>,
    pub user: PhotoUserRaw,
}

#[derive(Debug, Deserialize)]
pub struct PhotoSearchRaw {
    #[serde(default)]
    pub results: Vec<PhotoRaw>,
    #[serde(default)]
    pub total: u64,
}

impl PhotoSearchRaw {
    /// Keeps at most `limit` photos.
    pub fn into_image_set(self, limit: usize) -> ImageSet {
        ImageSet {
            images: self
                .results
                .into_iter()
                .take(limit)
                .map(|p| Image {
                    id: p.id,
                    url: p.urls.regular,
                    thumb_url: p.urls.thumb,
                    alt: p.alt_description.filter(|s| !s.is_empty()),
                    author: p.user.name,
                    author_username: p.user.username,
                })
                .collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_arrays_become_named_coordinates() {
        let json = r#"{
            "name": {"common": "France", "official": "French Republic"},
            "cca2": "FR",
            "cca3": "FRA",
            "capital": ["Paris"],
            "region": "Europe",
            "population": 67391582,
            "flags": {"png": "fr.png", "svg": "fr.svg"},
            "languages": {"fra": "French"},
            "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
            "latlng": [46.0, 2.0],
            "capitalInfo": {"latlng": [48.87, 2.33]}
        }"#;
        let raw: CountryRaw = serde_json::from_str(json).unwrap();
        let country = Country::from(raw);
        assert_eq!(country.code, "FRA");
        assert_eq!(country.iso2.as_deref(), Some("FR"));
        assert_eq!(country.latlng, Some(Coordinate::new(46.0, 2.0)));
        assert_eq!(country.capital_latlng, Some(Coordinate::new(48.87, 2.33)));
        assert_eq!(country.languages, vec![("fra".into(), "French".into())]);
        assert_eq!(country.currencies[0].code, "EUR");
    }

    #[test]
    fn sparse_list_entry_still_parses() {
        // The list endpoint only returns the requested fields; Antarctica has
        // no capital and an empty capitalInfo.
        let json = r#"{
            "name": {"common": "Antarctica"},
            "cca3": "ATA",
            "region": "Antarctic",
            "population": 1000,
            "capitalInfo": {}
        }"#;
        let country = Country::from(serde_json::from_str::<CountryRaw>(json).unwrap());
        assert_eq!(country.capital_latlng, None);
        assert_eq!(country.latlng, None);
        assert!(country.capital.is_empty());
    }

    #[test]
    fn photo_search_is_truncated_and_blank_alt_dropped() {
        let json = r#"{
            "total": 120,
            "results": [
                {"id": "a", "urls": {"regular": "r1", "thumb": "t1"}, "alt_description": "", "user": {"name": "Ann", "username": "ann"}},
                {"id": "b", "urls": {"regular": "r2", "thumb": "t2"}, "alt_description": "Eiffel", "user": {"name": "Bo", "username": "bo"}},
                {"id": "c", "urls": {"regular": "r3", "thumb": "t3"}, "alt_description": null, "user": {"name": "Cy", "username": "cy"}}
            ]
        }"#;
        let set = serde_json::from_str::<PhotoSearchRaw>(json)
            .unwrap()
            .into_image_set(2);
        assert_eq!(set.images.len(), 2);
        assert_eq!(set.total, 120);
        assert_eq!(set.images[0].alt, None);
        assert_eq!(set.images[1].alt.as_deref(), Some("Eiffel"));
    }
}
