// crates/countrydb-core/src/detail.rs

//! # Detail Presentation
//!
//! Turns an [`AggregateResult`] into display strings. Every auxiliary has a
//! fallback, so a detail page always renders in full even when all three
//! auxiliary fetches failed.

use crate::model::{AggregateResult, CoordinateSource, Country, Image, Weather};
use serde::Serialize;
use std::fmt;

pub const WEATHER_UNAVAILABLE: &str = "Weather data not available";

const FALLBACK_TOPICS: [&str; 3] = ["landmarks", "culture", "nature"];

/// What the image strip shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum Gallery {
    Photos(Vec<Image>),
    /// Search phrases to show in place of photos.
    Fallback(Vec<String>),
}

/// Display-ready detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub code: String,
    pub name: String,
    pub official_name: Option<String>,
    pub region: String,
    pub subregion: Option<String>,
    pub capital: Option<String>,
    /// Population with thousands separators, e.g. "67,391,582".
    pub population: String,
    pub languages: Vec<String>,
    pub currencies: Vec<String>,
    pub flag: String,
    pub weather: String,
    /// Where the weather was taken, e.g. "Paris (capital)".
    pub weather_location: Option<String>,
    pub description: String,
    pub gallery: Gallery,
}

impl DetailView {
    pub fn new(result: &AggregateResult) -> Self {
        let country = &result.primary;
        let aux = &result.auxiliaries;

        let weather = aux
            .weather
            .as_ref()
            .map(weather_line)
            .unwrap_or_else(|| WEATHER_UNAVAILABLE.to_string());

        let description = aux
            .summary
            .as_ref()
            .map(|s| s.extract.trim())
            .filter(|extract| !extract.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_description(country));

        let gallery = match &aux.images {
            Some(set) if !set.is_empty() => Gallery::Photos(set.images.clone()),
            _ => Gallery::Fallback(fallback_queries(&country.name)),
        };

        Self {
            code: country.code.clone(),
            name: country.name.clone(),
            official_name: country.official_name.clone(),
            region: country.region.clone(),
            subregion: country.subregion.clone(),
            capital: country.capital_name().map(str::to_string),
            population: group_thousands(country.population),
            languages: country.languages.iter().map(|(_, name)| name.clone()).collect(),
            currencies: country
                .currencies
                .iter()
                .map(|c| match &c.symbol {
                    Some(symbol) => format!("{} ({}, {symbol})", c.name, c.code),
                    None => format!("{} ({})", c.name, c.code),
                })
                .collect(),
            flag: country.flag.png.clone(),
            weather,
            weather_location: weather_location(result),
            description,
            gallery,
        }
    }
}

impl From<&AggregateResult> for DetailView {
    fn from(result: &AggregateResult) -> Self {
        Self::new(result)
    }
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.name, self.code)?;
        if let Some(official) = &self.official_name {
            writeln!(f, "  official:   {official}")?;
        }
        match &self.subregion {
            Some(sub) => writeln!(f, "  region:     {} / {sub}", self.region)?,
            None => writeln!(f, "  region:     {}", self.region)?,
        }
        if let Some(capital) = &self.capital {
            writeln!(f, "  capital:    {capital}")?;
        }
        writeln!(f, "  population: {}", self.population)?;
        if !self.languages.is_empty() {
            writeln!(f, "  languages:  {}", self.languages.join(", "))?;
        }
        if !self.currencies.is_empty() {
            writeln!(f, "  currencies: {}", self.currencies.join(", "))?;
        }
        match &self.weather_location {
            Some(at) => writeln!(f, "  weather:    {} [{at}]", self.weather)?,
            None => writeln!(f, "  weather:    {}", self.weather)?,
        }
        writeln!(f)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f)?;
        match &self.gallery {
            Gallery::Photos(images) => {
                for image in images {
                    writeln!(f, "  [photo] {} (by {})", image.url, image.author)?;
                }
            }
            Gallery::Fallback(queries) => {
                for query in queries {
                    writeln!(f, "  [search] {query}")?;
                }
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// HELPERS
// -----------------------------------------------------------------------------

/// `"21.4°C, broken clouds, humidity 60%, wind 3.6 m/s"`
pub fn weather_line(weather: &Weather) -> String {
    let conditions = weather
        .conditions
        .iter()
        .map(|c| c.description.as_str())
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let mut line = format!("{:.1}°C", weather.temp);
    if !conditions.is_empty() {
        line.push_str(", ");
        line.push_str(&conditions);
    }
    line.push_str(&format!(
        ", humidity {:.0}%, wind {:.1} m/s",
        weather.humidity, weather.wind_speed
    ));
    line
}

/// Used when no encyclopedia summary is available.
pub fn default_description(country: &Country) -> String {
    format!(
        "{} is a country in {} with a population of {}.",
        country.name,
        country.region,
        group_thousands(country.population)
    )
}

pub fn fallback_queries(name: &str) -> Vec<String> {
    FALLBACK_TOPICS
        .iter()
        .map(|topic| format!("{name} {topic}"))
        .collect()
}

fn weather_location(result: &AggregateResult) -> Option<String> {
    let coordinate = result.resolved_coordinate?;
    match result.coordinate_source {
        CoordinateSource::Capital => Some(match result.primary.capital_name() {
            Some(capital) => format!("{capital} (capital)"),
            None => format!("{coordinate} (capital)"),
        }),
        CoordinateSource::Centroid | CoordinateSource::Explicit => Some(format!(
            "{coordinate} ({})",
            result.coordinate_source.as_str()
        )),
        CoordinateSource::None => None,
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
