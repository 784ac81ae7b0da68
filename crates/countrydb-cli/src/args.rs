use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for countrydb
#[derive(Debug, Parser)]
#[command(
    name = "countrydb",
    version,
    about = "Browse countries, their weather, summaries and photos from the terminal"
)]
pub struct CliArgs {
    /// Log verbosity (RUST_LOG still applies per module)
    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// REST Countries JSON dump to use instead of the live list (.json or .json.gz)
    #[arg(short = 'i', long = "input", global = true)]
    pub input: Option<PathBuf>,

    /// Binary cache for the live country list
    #[arg(long = "cache", env = "COUNTRYDB_CACHE", global = true)]
    pub cache: Option<PathBuf>,

    /// OpenWeather One Call API key
    #[arg(
        long = "openweather-key",
        env = "OPENWEATHER_API_KEY",
        hide_env_values = true,
        global = true
    )]
    pub openweather_key: Option<String>,

    /// Unsplash access key
    #[arg(
        long = "unsplash-key",
        env = "UNSPLASH_ACCESS_KEY",
        hide_env_values = true,
        global = true
    )]
    pub unsplash_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show one page of the country list
    List(ListArgs),

    /// Show the detail page of a country
    Country {
        /// ISO3 or ISO2 code (e.g. FRA, de)
        code: String,

        /// Latitude to take the weather at (needs --lon)
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,

        /// Longitude to take the weather at (needs --lat)
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<String>,

        /// Title for the summary and photo lookups
        #[arg(long)]
        name: Option<String>,

        /// Print the raw aggregate as JSON
        #[arg(long)]
        json: bool,
    },

    /// Current weather at a coordinate
    Weather {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<String>,
    },

    /// Manage favorite countries
    Favorites {
        /// Favorites file
        #[arg(long = "file", default_value = "countrydb-favorites.json")]
        file: PathBuf,

        /// User scope; anonymous when omitted
        #[arg(long)]
        user: Option<String>,

        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Interactive search: each stdin line is the new search box content,
    /// lines starting with ':' are controls (:next, :prev, :page N,
    /// :region NAME, :size N, :distance, :quit)
    Browse {
        /// Starting query string, e.g. "?region=Europe"
        #[arg(long, default_value = "")]
        params: String,

        /// Position for distance sorting, as LAT,LON
        #[arg(long, value_parser = parse_lat_lon, allow_hyphen_values = true)]
        near: Option<(f64, f64)>,
    },
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Raw query string to start from, e.g. "?query=fra&page=2"
    #[arg(long, default_value = "")]
    pub params: String,

    /// Search text (overrides --params)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Region filter, "All" clears it
    #[arg(short, long)]
    pub region: Option<String>,

    #[arg(short, long)]
    pub page: Option<u32>,

    #[arg(long = "page-size")]
    pub page_size: Option<u32>,

    /// Sort by distance from LAT,LON
    #[arg(long, value_parser = parse_lat_lon, allow_hyphen_values = true)]
    pub near: Option<(f64, f64)>,

    /// Match accented names without the accents ("cote" finds "Côte d'Ivoire")
    #[arg(long = "fold-accents")]
    pub fold_accents: bool,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    List,
    Add { code: String },
    Remove { code: String },
    Toggle { code: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn parse_lat_lon(s: &str) -> Result<(f64, f64), String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {s:?}"))?;
    let coordinate = countrydb_core::geo::parse_coordinate(Some(lat.trim()), Some(lon.trim()))
        .map_err(|e| e.to_string())?;
    Ok((coordinate.lat, coordinate.lon))
}
