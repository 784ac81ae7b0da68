//! Detail aggregation example for countrydb-rs
//!
//! Runs the detail aggregator against local collaborators, one of which is
//! missing its credential, and prints the page with its fallbacks.

use countrydb_rs::prelude::*;

struct Unconfigured;

impl WeatherSource for Unconfigured {
    async fn current_weather(&self, _at: Coordinate) -> Result<Weather> {
        Err(CountryDbError::MissingCredential("OPENWEATHER_API_KEY"))
    }
}

impl ImageSource for Unconfigured {
    async fn images(&self, _query: &str) -> Result<ImageSet> {
        Err(CountryDbError::MissingCredential("UNSPLASH_ACCESS_KEY"))
    }
}

struct Encyclopedia;

impl SummarySource for Encyclopedia {
    async fn summary(&self, title: &str) -> Result<Option<Summary>> {
        Ok((title == "Switzerland").then(|| Summary {
            title: title.to_string(),
            extract: "Switzerland is a landlocked country in Central Europe.".to_string(),
            thumbnail: None,
        }))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== countrydb-rs Offline Aggregation Example ===\n");

    let catalog = Catalog::new(vec![
        Country::new("CHE", "Switzerland", "Europe")
            .with_population(8_654_622)
            .with_capital("Bern", 46.92, 7.47),
        Country::new("ATA", "Antarctica", "Antarctic").with_population(1_000),
    ]);
    let aggregator = DetailAggregator::new(&catalog, Unconfigured, Encyclopedia, Unconfigured);

    for code in ["che", "ata"] {
        let result = aggregator.aggregate_key(code).await?;
        println!(
            "weather coordinate: {:?} via {}",
            result.resolved_coordinate,
            result.coordinate_source.as_str()
        );
        println!("{}", DetailView::new(&result));
    }

    // A missing primary is the only hard failure.
    match aggregator.aggregate_key("XYZ").await {
        Err(e) => println!("XYZ -> {e} (status {})", e.status_code()),
        Ok(_) => println!("XYZ unexpectedly found"),
    }
    Ok(())
}
