//! List view example for countrydb-rs
//!
//! This example demonstrates how to:
//! - Read list state out of a query string
//! - Run the filter -> sort -> paginate pipeline
//! - Drive the pager through list controls

use countrydb_rs::prelude::*;

fn sample() -> Vec<Country> {
    vec![
        Country::new("FRA", "France", "Europe").with_capital("Paris", 48.87, 2.33),
        Country::new("DEU", "Germany", "Europe").with_capital("Berlin", 52.52, 13.40),
        Country::new("ITA", "Italy", "Europe").with_capital("Rome", 41.9, 12.48),
        Country::new("ESP", "Spain", "Europe").with_capital("Madrid", 40.4, -3.68),
        Country::new("PRT", "Portugal", "Europe").with_capital("Lisbon", 38.72, -9.13),
        Country::new("JPN", "Japan", "Asia").with_capital("Tokyo", 35.68, 139.75),
        Country::new("CIV", "Côte d'Ivoire", "Africa").with_latlng(8.0, -5.0),
    ]
}

fn print_page(countries: &[Country], href: &str, config: &Config, here: Option<UserLocation>) {
    let state = decode(href, config);
    let view = list_view(countries, &state, here);
    println!("{href:?} -> {} match, page {}/{}", view.total_items, state.page, view.total_pages);
    for country in &view.items {
        println!("  - {} ({})", country.name, country.code);
    }
    println!();
}

fn main() {
    println!("=== countrydb-rs List View Example ===\n");
    let config = Config::default().with_default_page_size(3);
    let countries = sample();

    // Example 1: filters from the query string
    println!("--- Example 1: Europe, page size 3 ---");
    print_page(&countries, "?region=Europe", &config, None);

    // Example 2: the pager
    println!("--- Example 2: Next page ---");
    let nav = MemoryNavigator::new("?region=Europe");
    ListAction::Next.dispatch(&nav, 2, &config);
    print_page(&countries, &nav.location(), &config, None);
    println!("pager window: {:?}\n", page_window(2, 2));

    // Example 3: nearest first, from Zurich
    println!("--- Example 3: Sorted by distance from Zurich ---");
    let zurich = UserLocation::new(47.37, 8.54);
    ListAction::NearMe.dispatch(&nav, 2, &config);
    print_page(&countries, &nav.location(), &config, Some(zurich));

    // Example 4: accent folding is opt-in
    println!("--- Example 4: 'cote' with and without folding ---");
    let state = decode("?query=cote", &config);
    let plain = list_view(&countries, &state, None);
    let folded = ListPipeline::new(TextMatch::Folded).run(&countries, &state, None);
    println!("case-insensitive: {} match", plain.total_items);
    println!("folded:           {} match", folded.total_items);
}
