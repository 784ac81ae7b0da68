// crates/countrydb-core/src/http/wikipedia.rs

use super::{endpoint, parse_base};
use crate::error::Result;
use crate::model::Summary;
use crate::raw::SummaryRaw;
use crate::source::SummarySource;
use log::debug;
use reqwest::StatusCode;
use url::Url;

pub const WIKIPEDIA_BASE: &str = "https://en.wikipedia.org/api/rest_v1";

/// Wikipedia REST page summaries.
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: reqwest::Client,
    base: Url,
}

impl WikipediaClient {
    pub fn new(client: reqwest::Client) -> Result<Self> {
        Self::with_base_url(client, WIKIPEDIA_BASE)
    }

    pub fn with_base_url(client: reqwest::Client, base: &str) -> Result<Self> {
        Ok(Self {
            client,
            base: parse_base(base)?,
        })
    }

    /// Titles use underscores for spaces, as in article URLs.
    pub fn summary_url(&self, title: &str) -> Url {
        let title = title.trim().replace(' ', "_");
        endpoint(&self.base, &["page", "summary", &title])
    }
}

impl SummarySource for WikipediaClient {
    async fn summary(&self, title: &str) -> Result<Option<Summary>> {
        if title.trim().is_empty() {
            return Ok(None);
        }
        let url = self.summary_url(title);
        debug!("GET {url}");

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let raw: SummaryRaw = response.error_for_status()?.json().await?;
        Ok(Some(raw.into()))
    }
}
