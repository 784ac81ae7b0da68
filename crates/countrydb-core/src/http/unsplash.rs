// crates/countrydb-core/src/http/unsplash.rs

use super::{endpoint, parse_base};
use crate::config::{MAX_IMAGES, UNSPLASH_ACCESS_KEY_ENV};
use crate::error::{CountryDbError, Result};
use crate::model::ImageSet;
use crate::raw::PhotoSearchRaw;
use crate::source::ImageSource;
use log::debug;
use reqwest::header::AUTHORIZATION;
use url::Url;

pub const UNSPLASH_BASE: &str = "https://api.unsplash.com";

/// Unsplash photo search.
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    client: reqwest::Client,
    base: Url,
    access_key: Option<String>,
}

impl UnsplashClient {
    pub fn new(client: reqwest::Client, access_key: Option<String>) -> Result<Self> {
        Self::with_base_url(client, access_key, UNSPLASH_BASE)
    }

    pub fn with_base_url(
        client: reqwest::Client,
        access_key: Option<String>,
        base: &str,
    ) -> Result<Self> {
        Ok(Self {
            client,
            base: parse_base(base)?,
            access_key,
        })
    }

    pub fn search_url(&self, query: &str) -> Url {
        let mut url = endpoint(&self.base, &["search", "photos"]);
        url.query_pairs_mut()
            .append_pair("query", query.trim())
            .append_pair("per_page", &MAX_IMAGES.to_string());
        url
    }
}

impl ImageSource for UnsplashClient {
    async fn images(&self, query: &str) -> Result<ImageSet> {
        let Some(key) = self.access_key.as_deref() else {
            return Err(CountryDbError::MissingCredential(UNSPLASH_ACCESS_KEY_ENV));
        };
        let url = self.search_url(query);
        debug!("GET {url}");

        let raw: PhotoSearchRaw = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Client-ID {key}"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(raw.into_image_set(MAX_IMAGES))
    }
}
