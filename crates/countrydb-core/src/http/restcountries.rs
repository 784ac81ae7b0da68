// crates/countrydb-core/src/http/restcountries.rs

use super::{endpoint, parse_base};
use crate::error::{CountryDbError, Result};
use crate::model::Country;
use crate::raw::CountriesRaw;
use crate::source::CountrySource;
use log::debug;
use reqwest::StatusCode;
use url::Url;

pub const REST_COUNTRIES_BASE: &str = "https://restcountries.com/v3.1";

/// Fields the list view reads. `/all` rejects requests naming more than
/// [`MAX_ALL_FIELDS`]; languages, currencies and subregion come from the
/// per-country `/alpha` lookup.
pub const LIST_FIELDS: &str = "name,cca2,cca3,capital,region,population,flags,latlng,capitalInfo";

pub const MAX_ALL_FIELDS: usize = 10;

/// REST Countries v3.1.
#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    client: reqwest::Client,
    base: Url,
}

impl RestCountriesClient {
    pub fn new(client: reqwest::Client) -> Result<Self> {
        Self::with_base_url(client, REST_COUNTRIES_BASE)
    }

    pub fn with_base_url(client: reqwest::Client, base: &str) -> Result<Self> {
        Ok(Self {
            client,
            base: parse_base(base)?,
        })
    }

    pub fn all_url(&self) -> Url {
        let mut url = endpoint(&self.base, &["all"]);
        url.query_pairs_mut().append_pair("fields", LIST_FIELDS);
        url
    }

    pub fn alpha_url(&self, code: &str) -> Url {
        endpoint(&self.base, &["alpha", code.trim()])
    }
}

impl CountrySource for RestCountriesClient {
    async fn country(&self, key: &str) -> Result<Country> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CountryDbError::InvalidInput("empty country code".into()));
        }
        let url = self.alpha_url(key);
        debug!("GET {url}");

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(CountryDbError::EntityNotFound(key.to_string()));
        }
        // The alpha endpoint answers with an array, even for one code.
        let raw: CountriesRaw = response.error_for_status()?.json().await?;
        raw.into_iter()
            .map(Country::from)
            .find(|c| c.matches_code(key))
            .ok_or_else(|| CountryDbError::EntityNotFound(key.to_string()))
    }

    async fn countries(&self) -> Result<Vec<Country>> {
        let url = self.all_url();
        debug!("GET {url}");
        let raw: CountriesRaw = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(raw.into_iter().map(Country::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls() {
        let client = RestCountriesClient::new(reqwest::Client::new()).unwrap();
        assert_eq!(
            client.alpha_url(" fra ").as_str(),
            "https://restcountries.com/v3.1/alpha/fra"
        );
        let all = client.all_url();
        assert_eq!(all.path(), "/v3.1/all");
        assert!(all.query().unwrap().starts_with("fields=name%2Ccca2%2Ccca3"));
    }

    #[test]
    fn list_fields_fit_the_all_endpoint() {
        let fields: Vec<&str> = LIST_FIELDS.split(',').collect();
        assert!(fields.len() <= MAX_ALL_FIELDS, "{} fields", fields.len());
        for needed in ["cca3", "name", "region", "latlng", "capitalInfo"] {
            assert!(fields.contains(&needed), "missing {needed}");
        }
    }

    #[tokio::test]
    async fn blank_code_is_rejected_before_any_request() {
        let client = RestCountriesClient::new(reqwest::Client::new()).unwrap();
        assert_eq!(client.country("  ").await.unwrap_err().status_code(), 400);
    }
}
