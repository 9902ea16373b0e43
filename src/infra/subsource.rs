use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::{Catalog, ReleaseEntry, SubId, TitleEntry};
use super::retry::{retry_transient, RetryPolicy};
use crate::config::Settings;
use crate::error::CatalogError;

#[derive(Debug)]
pub struct SubsourceClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    found: Vec<TitleEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MovieRequest<'a> {
    movie_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    season: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct MovieResponse {
    #[serde(default)]
    subs: Vec<ReleaseEntry>,
}

#[derive(Debug, Serialize)]
struct SubRequest<'a> {
    movie: &'a str,
    lang: &'a str,
    id: &'a SubId,
}

#[derive(Debug, Deserialize)]
struct SubResponse {
    sub: SubData,
}

#[derive(Debug, Deserialize)]
struct SubData {
    #[serde(rename = "downloadToken")]
    download_token: String,
}

impl SubsourceClient {
    pub fn new(settings: &Settings) -> Result<Self, CatalogError> {
        let client = Client::builder().timeout(settings.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: settings.api_url.clone(),
            retry: RetryPolicy::with_attempts(settings.max_attempts),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// POSTs a JSON body; only the transport is retried, decoding is not.
    fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, CatalogError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let text = retry_transient(&self.retry, endpoint, || {
            let response = self
                .client
                .post(self.url(endpoint))
                .header(CONTENT_TYPE, "application/json")
                .json(body)
                .send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(CatalogError::Status(status.as_u16()));
            }
            Ok(response.text()?)
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl Catalog for SubsourceClient {
    fn search_title(&self, query: &str) -> Result<Vec<TitleEntry>, CatalogError> {
        let response: SearchResponse = self.post("searchMovie", &SearchRequest { query })?;
        debug!(query = query, found = response.found.len(), "Catalog search");
        Ok(response.found)
    }

    fn list_releases(
        &self,
        link_name: &str,
        season: Option<&str>,
    ) -> Result<Vec<ReleaseEntry>, CatalogError> {
        let response: MovieResponse = self.post(
            "getMovie",
            &MovieRequest {
                movie_name: link_name,
                season,
            },
        )?;
        Ok(response.subs)
    }

    fn resolve_download(&self, release: &ReleaseEntry) -> Result<String, CatalogError> {
        let response: SubResponse = self.post(
            "getSub",
            &SubRequest {
                movie: &release.link_name,
                lang: &release.lang,
                id: &release.sub_id,
            },
        )?;
        Ok(response.sub.download_token)
    }

    fn fetch_archive(&self, token: &str) -> Result<Vec<u8>, CatalogError> {
        let url = self.url(&format!("downloadSub/{token}"));
        retry_transient(&self.retry, "downloadSub", || {
            let response = self
                .client
                .get(&url)
                .header(CONTENT_TYPE, "application/json")
                .send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(CatalogError::Status(status.as_u16()));
            }
            Ok(response.bytes()?.to_vec())
        })
    }
}
