//! countrydb: command-line interface for countrydb-core
//!
//! This binary drives the list pipeline and the detail aggregator from the
//! terminal.
//!
//! Usage examples
//! --------------
//!
//! - One page of the list, from flags or from a raw query string
//!   $ countrydb list --query united --region Americas
//!   $ countrydb list --params "?query=fra&page=2"
//!
//! - Sort by distance from a position
//!   $ countrydb list --near 47.37,8.54
//!
//! - Detail page (weather, summary and photos are best-effort)
//!   $ countrydb country FRA
//!   $ countrydb country jpn --json
//!
//! - Weather at a coordinate
//!   $ countrydb weather --lat 48.85 --lon 2.35
//!
//! - Favorites, anonymous or per user
//!   $ countrydb favorites add FRA
//!   $ countrydb favorites --user alice list
//!
//! - Interactive search
//!   $ countrydb browse --params "?region=Europe"
//!
//! Data source
//! -----------
//!
//! The country list comes from REST Countries and is cached on disk when
//! `--cache` (or `COUNTRYDB_CACHE`) is set. `--input <dump.json>` reads a
//! saved `/v3.1/all` response instead and needs no network for the list.
//! Weather needs `OPENWEATHER_API_KEY`, photos need `UNSPLASH_ACCESS_KEY`;
//! without them those sections fall back.
mod args;
mod browse;
mod render;

use crate::args::{CliArgs, Commands, FavoritesAction, ListArgs, LogLevel};
use crate::browse::TerminalNavigator;
use crate::render::render_list;
use anyhow::Context;
use clap::Parser;
use countrydb_core::detail::weather_line;
use countrydb_core::http::{
    build_client, live_aggregator, OpenWeatherClient, RestCountriesClient, UnsplashClient,
    WikipediaClient,
};
use countrydb_core::prelude::*;
use log::{info, warn, LevelFilter};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logger(args.log_level);
    let config = build_config(&args);

    match args.command {
        Commands::List(list) => run_list(list, args.input.as_deref(), &config).await?,

        Commands::Country {
            code,
            lat,
            lon,
            name,
            json,
        } => {
            let mut request = DetailRequest::new(code.trim());
            if lat.is_some() || lon.is_some() {
                let hint = parse_coordinate(lat.as_deref(), lon.as_deref())?;
                request = request.with_coordinate(hint);
            }
            if let Some(name) = name {
                request = request.with_name(name);
            }

            let outcome = match args.input.as_deref() {
                Some(path) => {
                    let catalog = Catalog::load_json(path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    aggregate_offline(&catalog, &config, &request).await
                }
                None => live_aggregator(&config)?.aggregate(&request).await,
            };

            match outcome {
                Ok(result) if json => println!("{}", serde_json::to_string_pretty(&result)?),
                Ok(result) => print!("{}", DetailView::new(&result)),
                Err(e) if e.is_not_found() => anyhow::bail!("No country found for: {code}"),
                Err(e) => {
                    let status = e.status_code();
                    return Err(anyhow::Error::new(e)
                        .context(format!("detail page for {code} failed (status {status})")));
                }
            }
        }

        Commands::Weather { lat, lon } => {
            let at = parse_coordinate(lat.as_deref(), lon.as_deref())?;
            let client =
                OpenWeatherClient::new(build_client(&config)?, config.openweather_api_key.clone())?;
            let weather = client.current_weather(at).await?;
            println!("{}", weather_line(&weather));
            println!("{}", serde_json::to_string_pretty(&weather)?);
        }

        Commands::Favorites { file, user, action } => {
            let store = FileFavorites::new(file);
            run_favorites(&store, user.as_deref(), action)?;
        }

        Commands::Browse { params, near } => {
            let catalog = load_catalog(args.input.as_deref(), &config).await?;
            let near = near.map(|(lat, lon)| UserLocation::new(lat, lon));
            let navigator = Arc::new(TerminalNavigator::new(
                catalog.countries().to_vec(),
                params,
                ListPipeline::default(),
                near,
                config.clone(),
            ));
            browse::run(navigator, config).await?;
        }
    }

    Ok(())
}

fn init_logger(level: LogLevel) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level.into());
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper_util", LevelFilter::Info);
    builder.filter_module("rustls", LevelFilter::Warn);
    // env_logger can only be initialized once per process
    let _ = builder.try_init();
}

/// Environment first, then explicit flags.
fn build_config(args: &CliArgs) -> Config {
    let mut config = Config::from_env();
    let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
    if let Some(key) = non_empty(&args.openweather_key) {
        config.openweather_api_key = Some(key);
    }
    if let Some(key) = non_empty(&args.unsplash_key) {
        config.unsplash_access_key = Some(key);
    }
    if let Some(cache) = &args.cache {
        config.catalog_cache = Some(cache.clone());
    }
    config
}

async fn load_catalog(input: Option<&Path>, config: &Config) -> anyhow::Result<Catalog> {
    if let Some(path) = input {
        return Catalog::load_json(path).with_context(|| format!("reading {}", path.display()));
    }
    let source = RestCountriesClient::new(build_client(config)?)?;
    let catalog = Catalog::load_or_fetch(
        &source,
        config.catalog_cache.as_deref(),
        config.catalog_max_age,
    )
    .await
    .context("loading the country list")?;
    Ok(catalog)
}

async fn run_list(list: ListArgs, input: Option<&Path>, config: &Config) -> anyhow::Result<()> {
    let mut updates = Vec::new();
    if let Some(query) = list.query {
        updates.push(QueryUpdate::Query(query));
    }
    if let Some(region) = list.region {
        updates.push(QueryUpdate::Region(RegionFilter::parse(&region)));
    }
    if let Some(page) = list.page {
        updates.push(QueryUpdate::Page(page.max(1)));
    }
    if let Some(size) = list.page_size.filter(|s| *s > 0) {
        updates.push(QueryUpdate::PageSize(size));
    }
    if list.near.is_some() {
        updates.push(QueryUpdate::SortByDistance(true));
    }

    let href = encode(&list.params, &updates, config);
    let state = decode(&href, config);

    let location = list_location(state.sort_by_distance, list.near).await;

    let catalog = load_catalog(input, config).await?;
    let text_match = if list.fold_accents {
        TextMatch::Folded
    } else {
        TextMatch::CaseInsensitive
    };
    let view = ListPipeline::new(text_match).run(catalog.countries(), &state, location);
    info!("{} of {} countries match", view.total_items, catalog.len());
    print!("{}", render_list(&href, &state, &view, location));
    Ok(())
}

/// Only asks for a position when the list is going to be sorted by it.
async fn list_location(sort_by_distance: bool, near: Option<(f64, f64)>) -> Option<UserLocation> {
    if !sort_by_distance {
        return None;
    }
    let locator = FixedLocator(near.map(|(lat, lon)| UserLocation::new(lat, lon)));
    match locator.locate().await {
        Ok(location) => Some(location),
        Err(e) => {
            warn!("{e}; showing the list unsorted");
            None
        }
    }
}

async fn aggregate_offline(
    catalog: &Catalog,
    config: &Config,
    request: &DetailRequest,
) -> countrydb_core::Result<AggregateResult> {
    let client = build_client(config)?;
    DetailAggregator::new(
        catalog,
        OpenWeatherClient::new(client.clone(), config.openweather_api_key.clone())?,
        WikipediaClient::new(client.clone())?,
        UnsplashClient::new(client, config.unsplash_access_key.clone())?,
    )
    .aggregate(request)
    .await
}

fn run_favorites(
    store: &dyn FavoritesStore,
    user: Option<&str>,
    action: FavoritesAction,
) -> anyhow::Result<()> {
    let scope = user.unwrap_or("anonymous");
    match action {
        FavoritesAction::List => {
            let codes = store.list(user)?;
            if codes.is_empty() {
                println!("No favorites yet ({scope}).");
            }
            for code in codes {
                println!("{code}");
            }
        }
        FavoritesAction::Add { code } => {
            let code = code.trim().to_uppercase();
            if store.add(user, &code)? {
                println!("Added {code} ({scope})");
            } else {
                println!("{code} is already a favorite ({scope})");
            }
        }
        FavoritesAction::Remove { code } => {
            let code = code.trim().to_uppercase();
            if store.remove(user, &code)? {
                println!("Removed {code} ({scope})");
            } else {
                println!("{code} was not a favorite ({scope})");
            }
        }
        FavoritesAction::Toggle { code } => {
            let code = code.trim().to_uppercase();
            let now = if store.toggle(user, &code)? {
                "added"
            } else {
                "removed"
            };
            println!("{code} {now} ({scope})");
        }
    }
    Ok(())
}
