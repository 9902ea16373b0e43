use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::CatalogError;
use crate::infra::catalog::{Catalog, ReleaseEntry, SeasonEntry, SubId, TitleEntry};

#[derive(Default)]
pub struct FakeCatalog {
    pub titles: Vec<TitleEntry>,
    /// (link name, season label) -> releases
    pub releases: HashMap<(String, Option<String>), Vec<ReleaseEntry>>,
    /// sub id -> archive bytes
    pub archives: HashMap<String, Vec<u8>>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeCatalog {
    pub fn with_title(mut self, title: &str, link_name: &str, seasons: &[u32]) -> Self {
        self.titles.push(TitleEntry {
            title: title.to_string(),
            link_name: link_name.to_string(),
            seasons: seasons.iter().map(|&number| SeasonEntry { number }).collect(),
        });
        self
    }

    pub fn with_release(
        mut self,
        link_name: &str,
        season: Option<&str>,
        id: u64,
        release_name: &str,
        lang: &str,
    ) -> Self {
        self.releases
            .entry((link_name.to_string(), season.map(str::to_string)))
            .or_default()
            .push(release(link_name, id, release_name, lang));
        self
    }

    pub fn with_archive(mut self, id: u64, bytes: Vec<u8>) -> Self {
        self.archives.insert(id.to_string(), bytes);
        self
    }

    pub fn downloads(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| c.strip_prefix("fetch:").map(str::to_string))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

pub fn release(link_name: &str, id: u64, release_name: &str, lang: &str) -> ReleaseEntry {
    ReleaseEntry {
        release_name: release_name.to_string(),
        lang: lang.to_string(),
        sub_id: SubId::Number(id),
        link_name: link_name.to_string(),
    }
}

impl Catalog for FakeCatalog {
    fn search_title(&self, query: &str) -> Result<Vec<TitleEntry>, CatalogError> {
        self.record(format!("search:{query}"));
        Ok(self.titles.clone())
    }

    fn list_releases(
        &self,
        link_name: &str,
        season: Option<&str>,
    ) -> Result<Vec<ReleaseEntry>, CatalogError> {
        self.record(format!("releases:{link_name}:{season:?}"));
        Ok(self
            .releases
            .get(&(link_name.to_string(), season.map(str::to_string)))
            .cloned()
            .unwrap_or_default())
    }

    fn resolve_download(&self, release: &ReleaseEntry) -> Result<String, CatalogError> {
        self.record(format!("resolve:{}", release.sub_id));
        let id = release.sub_id.to_string();
        if self.archives.contains_key(&id) {
            Ok(id)
        } else {
            Err(CatalogError::Status(404))
        }
    }

    fn fetch_archive(&self, token: &str) -> Result<Vec<u8>, CatalogError> {
        self.record(format!("fetch:{token}"));
        self.archives
            .get(token)
            .cloned()
            .ok_or(CatalogError::Status(404))
    }
}
