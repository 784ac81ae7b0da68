// crates/countrydb-core/src/pipeline.rs

//! # List Pipeline
//!
//! `(countries, state, location) -> ListView`, always in this order:
//!
//! 1. text filter (case-insensitive substring on the display name)
//! 2. region filter
//! 3. distance sort (only with `sortByDistance` *and* a location)
//! 4. pagination
//!
//! The pipeline borrows the input and never fails. Malformed state has
//! already been replaced by defaults in [`crate::query::decode`]; a page past
//! the end simply yields no items.

use crate::geo::distance_between;
use crate::model::{Country, UserLocation};
use crate::query::{QueryState, RegionFilter};
use crate::text::{NameMatch, TextMatch};
use log::debug;
use std::cmp::Ordering;

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<'a> {
    /// At most `page_size` countries, in display order.
    pub items: Vec<&'a Country>,
    /// Number of countries that survived filtering.
    pub total_items: usize,
    /// `ceil(total_items / page_size)`, 0 when nothing matched.
    pub total_pages: usize,
}

impl ListView<'_> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Pipeline with its matching options. The default matches the free
/// function [`list_view`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ListPipeline {
    pub text_match: TextMatch,
}

impl ListPipeline {
    pub fn new(text_match: TextMatch) -> Self {
        Self { text_match }
    }

    pub fn run<'a>(
        &self,
        countries: &'a [Country],
        state: &QueryState,
        location: Option<UserLocation>,
    ) -> ListView<'a> {
        let matched = filter_by_text(countries.iter(), &state.search_text, self.text_match);
        let matched = filter_by_region(matched, &state.region);

        let ordered = match location {
            Some(origin) if state.sort_by_distance => sort_by_distance(matched, origin),
            _ => matched,
        };

        debug!(
            "list pipeline: {} of {} countries matched (query={:?}, region={})",
            ordered.len(),
            countries.len(),
            state.search_text,
            state.region.as_str()
        );

        paginate(ordered, state.page, state.page_size)
    }
}

/// Runs the pipeline with case-insensitive matching.
///
/// ```rust
/// use countrydb_core::prelude::*;
///
/// let countries = vec![
///     Country::new("FRA", "France", "Europe"),
///     Country::new("DEU", "Germany", "Europe"),
/// ];
/// let state = decode("?query=fra", &Config::default());
/// let view = list_view(&countries, &state, None);
/// assert_eq!(view.items.len(), 1);
/// assert_eq!(view.items[0].name, "France");
/// ```
pub fn list_view<'a>(
    countries: &'a [Country],
    state: &QueryState,
    location: Option<UserLocation>,
) -> ListView<'a> {
    ListPipeline::default().run(countries, state, location)
}

// -----------------------------------------------------------------------------
// STAGES
// -----------------------------------------------------------------------------

/// Stage 1. Empty text keeps everything.
pub fn filter_by_text<'a>(
    countries: impl Iterator<Item = &'a Country>,
    text: &str,
    mode: TextMatch,
) -> Vec<&'a Country> {
    if text.is_empty() {
        return countries.collect();
    }
    let needle = mode.needle(text);
    countries
        .filter(|c| mode.contains(c.name_str(), &needle))
        .collect()
}

/// Stage 2.
pub fn filter_by_region<'a>(countries: Vec<&'a Country>, region: &RegionFilter) -> Vec<&'a Country> {
    match region {
        RegionFilter::All => countries,
        RegionFilter::Only(_) => countries
            .into_iter()
            .filter(|c| region.matches(&c.region))
            .collect(),
    }
}

/// Stage 3. Ascending distance from `origin`; countries without a usable
/// position keep their relative order at the tail.
///
/// A non-finite origin leaves the order untouched.
pub fn sort_by_distance<'a>(countries: Vec<&'a Country>, origin: UserLocation) -> Vec<&'a Country> {
    if !origin.is_finite() {
        debug!("distance sort skipped: non-finite origin {origin}");
        return countries;
    }

    let mut keyed: Vec<(Option<f64>, &'a Country)> = countries
        .into_iter()
        .map(|c| (c.position().map(|p| distance_between(origin, p)), c))
        .collect();

    // `sort_by` is stable, which the tail ordering relies on.
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, c)| c).collect()
}

/// Stage 4. `page` is 1-based and not clamped.
pub fn paginate(countries: Vec<&Country>, page: u32, page_size: u32) -> ListView<'_> {
    let total_items = countries.len();
    let page_size = page_size.max(1) as usize;
    let total_pages = total_items.div_ceil(page_size);

    let start = (page.max(1) as usize - 1).saturating_mul(page_size);
    let items = countries
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect();

    ListView {
        items,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::Coordinate;
    use crate::query::decode;

    fn sample() -> Vec<Country> {
        vec![
            Country::new("FRA", "France", "Europe").with_capital("Paris", 48.87, 2.33),
            Country::new("DEU", "Germany", "Europe").with_capital("Berlin", 52.52, 13.40),
            Country::new("ESP", "Spain", "Europe").with_latlng(40.0, -4.0),
            Country::new("ATA", "Antarctica", "Antarctic"),
            Country::new("JPN", "Japan", "Asia").with_capital("Tokyo", 35.68, 139.75),
            Country::new("BVT", "Bouvet Island", "Antarctic"),
            Country::new("ZAF", "South Africa", "Africa").with_capital("Pretoria", -25.7, 28.2),
        ]
    }

    fn names(view: &ListView<'_>) -> Vec<String> {
        view.items.iter().map(|c| c.name.clone()).collect()
    }

    fn state(query: &str) -> QueryState {
        decode(query, &Config::default())
    }

    #[test]
    fn text_filter_is_case_insensitive_substring() {
        let countries = sample();
        let view = list_view(&countries, &state("?query=FRA"), None);
        assert_eq!(names(&view), vec!["France"]);

        let view = list_view(&countries, &state("?query=an"), None);
        assert_eq!(names(&view), vec!["France", "Germany", "Antarctica", "Japan", "Bouvet Island"]);
    }

    #[test]
    fn text_filter_is_not_tokenized() {
        let countries = sample();
        let view = list_view(&countries, &state("?query=h+af"), None);
        assert_eq!(names(&view), vec!["South Africa"]);
        let view = list_view(&countries, &state("?query=africa+south"), None);
        assert!(view.is_empty());
    }

    #[test]
    fn folded_matching_is_opt_in() {
        let countries = vec![Country::new("ALA", "Åland Islands", "Europe")];
        let query = state("?query=aland");
        assert!(list_view(&countries, &query, None).is_empty());
        let folded = ListPipeline::new(TextMatch::Folded).run(&countries, &query, None);
        assert_eq!(folded.items.len(), 1);
    }

    #[test]
    fn region_filter() {
        let countries = sample();
        let view = list_view(&countries, &state("?region=Antarctic"), None);
        assert_eq!(names(&view), vec!["Antarctica", "Bouvet Island"]);

        let view = list_view(&countries, &state("?region=Atlantis"), None);
        assert_eq!(view.total_pages, 0);
    }

    #[test]
    fn distance_sort_puts_unlocated_last_in_input_order() {
        let countries = sample();
        let london = Coordinate::new(51.5074, -0.1278);
        let view = list_view(&countries, &state("?sortByDistance=true"), Some(london));
        assert_eq!(
            names(&view),
            vec!["France", "Germany", "Spain", "South Africa", "Japan", "Antarctica", "Bouvet Island"]
        );
    }

    #[test]
    fn distance_sort_needs_both_flag_and_location() {
        let countries = sample();
        let unsorted = names(&list_view(&countries, &state(""), None));
        let tokyo = Coordinate::new(35.68, 139.75);

        assert_eq!(names(&list_view(&countries, &state(""), Some(tokyo))), unsorted);
        assert_eq!(
            names(&list_view(&countries, &state("?sortByDistance=true"), None)),
            unsorted
        );
        let sorted = list_view(&countries, &state("?sortByDistance=true"), Some(tokyo));
        assert_eq!(sorted.items[0].name, "Japan");
    }

    #[test]
    fn non_finite_origin_keeps_order() {
        let countries = sample();
        let unsorted = names(&list_view(&countries, &state(""), None));
        let bad = Coordinate::new(f64::NAN, 0.0);
        let view = list_view(&countries, &state("?sortByDistance=true"), Some(bad));
        assert_eq!(names(&view), unsorted);
    }

    #[test]
    fn pagination_boundary() {
        let countries: Vec<Country> = (0..16)
            .map(|i| Country::new(format!("C{i:02}"), format!("Country {i}"), "Europe"))
            .collect();

        let page1 = list_view(&countries, &state(""), None);
        assert_eq!(page1.total_pages, 2);
        assert_eq!(page1.items.len(), 15);

        let page2 = list_view(&countries, &state("?page=2"), None);
        assert_eq!(page2.items.len(), 1);
        assert_eq!(page2.items[0].code, "C15");

        let page3 = list_view(&countries, &state("?page=3"), None);
        assert!(page3.items.is_empty());
        assert_eq!(page3.total_pages, 2);
    }

    #[test]
    fn no_matches_means_zero_pages() {
        let countries = sample();
        let view = list_view(&countries, &state("?query=zzz"), None);
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.total_items, 0);
    }

    #[test]
    fn deterministic() {
        let countries = sample();
        let s = state("?query=a&sortByDistance=true&pageSize=3&page=2");
        let origin = Some(Coordinate::new(0.0, 0.0));
        let first = list_view(&countries, &s, origin);
        for _ in 0..10 {
            assert_eq!(list_view(&countries, &s, origin), first);
        }
    }
}
