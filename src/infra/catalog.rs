use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CatalogError;

/// A title advertised by the catalog search.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleEntry {
    pub title: String,
    pub link_name: String,
    #[serde(default)]
    pub seasons: Vec<SeasonEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonEntry {
    pub number: u32,
}

/// Release identifiers come back as numbers or strings depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubId {
    Number(u64),
    Text(String),
}

impl fmt::Display for SubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubId::Number(n) => write!(f, "{n}"),
            SubId::Text(s) => f.write_str(s),
        }
    }
}

/// One subtitle release of a title, as listed by the catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseEntry {
    pub release_name: String,
    pub lang: String,
    pub sub_id: SubId,
    pub link_name: String,
}

/// The remote subtitle index.
pub trait Catalog {
    fn search_title(&self, query: &str) -> Result<Vec<TitleEntry>, CatalogError>;

    /// `season` is a label like `season-1`; `None` for titles without seasons.
    fn list_releases(
        &self,
        link_name: &str,
        season: Option<&str>,
    ) -> Result<Vec<ReleaseEntry>, CatalogError>;

    /// Exchanges a release for a short-lived download token.
    fn resolve_download(&self, release: &ReleaseEntry) -> Result<String, CatalogError>;

    fn fetch_archive(&self, token: &str) -> Result<Vec<u8>, CatalogError>;
}
