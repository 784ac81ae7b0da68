// crates/countrydb-core/src/catalog.rs

//! # Country Catalog
//!
//! The full country list the list pipeline runs over, plus its on-disk
//! cache. The cache is a bincode blob (gzip-compressed with the `compact`
//! feature) and is considered fresh for [`crate::config::CATALOG_MAX_AGE`].

use crate::error::{CountryDbError, Result};
use crate::model::Country;
use crate::raw::CountriesRaw;
use crate::source::CountrySource;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::{Duration, SystemTime};

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

/// Bumped whenever [`Country`] changes shape; older caches are rebuilt.
const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    countries: Vec<Country>,
}

/// In-memory country list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    countries: Vec<Country>,
}

impl Catalog {
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Find a country by cca3, then cca2, case-insensitive (e.g. "fra", "FR").
    pub fn find(&self, key: &str) -> Option<&Country> {
        let key = key.trim();
        self.countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(key))
            .or_else(|| self.countries.iter().find(|c| c.matches_code(key)))
    }

    /// Distinct region labels present in the data, sorted.
    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = self
            .countries
            .iter()
            .map(|c| c.region.as_str())
            .filter(|r| !r.is_empty())
            .collect();
        regions.sort_unstable();
        regions.dedup();
        regions
    }

    // -------------------------------------------------------------------------
    // LOADING
    // -------------------------------------------------------------------------

    /// Fetches the full list from `source`.
    pub async fn fetch<S: CountrySource>(source: &S) -> Result<Self> {
        let countries = source.countries().await?;
        info!("fetched {} countries", countries.len());
        Ok(Self::new(countries))
    }

    /// **Smart Load:** Checks the cache, otherwise fetches and re-caches.
    ///
    /// 1. A fresh, readable cache is returned as-is.
    /// 2. Otherwise the list is fetched and the cache rewritten (best-effort).
    /// 3. If the fetch fails, a stale cache is better than nothing.
    pub async fn load_or_fetch<S: CountrySource>(
        source: &S,
        cache: Option<&Path>,
        max_age: Duration,
    ) -> Result<Self> {
        let Some(path) = cache else {
            return Self::fetch(source).await;
        };

        if is_cache_fresh(path, max_age) {
            match Self::load_cache(path) {
                Ok(catalog) => {
                    debug!("catalog cache hit: {}", path.display());
                    return Ok(catalog);
                }
                Err(e) => warn!("ignoring unreadable catalog cache {}: {e}", path.display()),
            }
        }

        match Self::fetch(source).await {
            Ok(catalog) => {
                if let Err(e) = catalog.save_cache(path) {
                    warn!("could not write catalog cache {}: {e}", path.display());
                }
                Ok(catalog)
            }
            Err(fetch_err) => match Self::load_cache(path) {
                Ok(stale) => {
                    warn!("using stale catalog cache after fetch failure: {fetch_err}");
                    Ok(stale)
                }
                Err(_) => Err(fetch_err),
            },
        }
    }

    /// Reads a REST Countries JSON dump (`/v3.1/all` response), e.g. one
    /// saved with `curl`. A `.gz` file is decompressed with `compact`.
    pub fn load_json(path: &Path) -> Result<Self> {
        let reader: Box<dyn Read> = if is_gzip_path(path) {
            open_stream(path)?
        } else {
            Box::new(BufReader::new(File::open(path)?))
        };
        let raw: CountriesRaw = serde_json::from_reader(reader)?;
        let countries: Vec<Country> = raw.into_iter().map(Country::from).collect();
        info!("loaded {} countries from {}", countries.len(), path.display());
        Ok(Self::new(countries))
    }

    pub fn load_cache(path: &Path) -> Result<Self> {
        let reader = open_stream(path)?;
        let file: CacheFile = bincode::deserialize_from(reader)?;
        if file.version != CACHE_FORMAT_VERSION {
            return Err(CountryDbError::InvalidInput(format!(
                "catalog cache version {} (expected {CACHE_FORMAT_VERSION})",
                file.version
            )));
        }
        Ok(Self::new(file.countries))
    }

    pub fn save_cache(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        let file = CacheFile {
            version: CACHE_FORMAT_VERSION,
            countries: self.countries.clone(),
        };

        #[cfg(feature = "compact")]
        {
            let mut encoder = GzEncoder::new(&mut writer, Compression::default());
            bincode::serialize_into(&mut encoder, &file)?;
            encoder.finish()?;
        }
        #[cfg(not(feature = "compact"))]
        bincode::serialize_into(&mut writer, &file)?;

        writer.flush()?;
        Ok(())
    }
}

impl CountrySource for Catalog {
    async fn country(&self, key: &str) -> Result<Country> {
        self.find(key)
            .cloned()
            .ok_or_else(|| CountryDbError::EntityNotFound(key.to_string()))
    }

    async fn countries(&self) -> Result<Vec<Country>> {
        Ok(self.countries.clone())
    }
}

// -----------------------------------------------------------------------------
// INTERNAL TRANSPORT HELPERS
// -----------------------------------------------------------------------------

/// Opens a file, buffers it, and optionally wraps it in a Gzip decoder.
fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let reader = BufReader::new(File::open(path)?);

    #[cfg(feature = "compact")]
    {
        Ok(Box::new(GzDecoder::new(reader)))
    }

    #[cfg(not(feature = "compact"))]
    {
        Ok(Box::new(reader))
    }
}

fn is_gzip_path(path: &Path) -> bool {
    cfg!(feature = "compact") && path.extension().is_some_and(|ext| ext == "gz")
}

fn is_cache_fresh(path: &Path, max_age: Duration) -> bool {
    let modified = match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    match SystemTime::now().duration_since(modified) {
        Ok(age) => age < max_age,
        // mtime in the future: clock skew, refetch
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Upstream {
        fail: bool,
        calls: AtomicUsize,
    }

    impl Upstream {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl CountrySource for Upstream {
        async fn country(&self, key: &str) -> Result<Country> {
            Err(CountryDbError::EntityNotFound(key.to_string()))
        }

        async fn countries(&self) -> Result<Vec<Country>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CountryDbError::UpstreamUnavailable("503".into()));
            }
            Ok(vec![
                Country::new("FRA", "France", "Europe").with_capital("Paris", 48.87, 2.33),
                Country::new("JPN", "Japan", "Asia"),
            ])
        }
    }

    #[test]
    fn find_by_cca3_then_cca2() {
        let mut de = Country::new("DEU", "Germany", "Europe");
        de.iso2 = Some("DE".into());
        let catalog = Catalog::new(vec![Country::new("FRA", "France", "Europe"), de]);
        assert_eq!(catalog.find("fra").unwrap().name, "France");
        assert_eq!(catalog.find("DE").unwrap().name, "Germany");
        assert!(catalog.find("XX").is_none());
        assert_eq!(catalog.regions(), vec!["Europe"]);
    }

    #[tokio::test]
    async fn cache_round_trip_and_hit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries.bin");
        let upstream = Upstream::new(false);

        let first = Catalog::load_or_fetch(&upstream, Some(&path), Duration::from_secs(600))
            .await
            .unwrap();
        assert!(path.exists());
        let second = Catalog::load_or_fetch(&upstream, Some(&path), Duration::from_secs(600))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_cache_is_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries.bin");
        Catalog::new(vec![Country::new("OLD", "Old", "Europe")])
            .save_cache(&path)
            .unwrap();

        let upstream = Upstream::new(false);
        let catalog = Catalog::load_or_fetch(&upstream, Some(&path), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_cache_survives_upstream_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries.bin");
        Catalog::new(vec![Country::new("OLD", "Old", "Europe")])
            .save_cache(&path)
            .unwrap();

        let catalog = Catalog::load_or_fetch(&Upstream::new(true), Some(&path), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(catalog.countries()[0].code, "OLD");
    }

    #[tokio::test]
    async fn no_cache_and_no_upstream_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");
        let err = Catalog::load_or_fetch(&Upstream::new(true), Some(&path), Duration::ZERO)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn json_dump_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all.json");
        fs::write(
            &path,
            r#"[{"name":{"common":"Japan"},"cca3":"JPN","region":"Asia","latlng":[36.0,138.0]}]"#,
        )
        .unwrap();
        let catalog = Catalog::load_json(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.countries()[0].name, "Japan");
        assert!(Catalog::load_json(&dir.path().join("nope.json")).is_err());
    }

    #[tokio::test]
    async fn catalog_is_a_country_source() {
        let catalog = Catalog::fetch(&Upstream::new(false)).await.unwrap();
        assert_eq!(catalog.country("jpn").await.unwrap().name, "Japan");
        assert!(catalog.country("XYZ").await.unwrap_err().is_not_found());
    }
}
