use std::path::PathBuf;

/// A discovered file whose metadata could not be used for grouping.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("no title could be extracted from {0}")]
    MissingTitle(PathBuf),
}

/// Failure talking to the remote catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned HTTP {0}")]
    Status(u16),

    #[error("unexpected catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("run deadline exceeded")]
    DeadlineExceeded,
}

impl CatalogError {
    /// Timeouts, connection failures, 408, 429 and 5xx are worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Http(e) => e.is_timeout() || e.is_connect() || e.is_body(),
            CatalogError::Status(code) => {
                *code == 408 || *code == 429 || (500..600).contains(code)
            }
            CatalogError::Decode(_) | CatalogError::DeadlineExceeded => false,
        }
    }
}

/// A (title, season) group that could not be resolved against the catalog.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("catalog lookup failed for title '{title}' (best score {best:.0})")]
    TitleNotFound { title: String, best: f64 },

    #[error("no matching season {season} for '{title}'")]
    NoMatchingSeason { title: String, season: u32 },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Failure of one candidate download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("cannot find download link: {0}")]
    Resolve(#[source] CatalogError),

    #[error("archive fetch failed: {0}")]
    Fetch(#[source] CatalogError),

    #[error("invalid archive: {0}")]
    Archive(String),

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("run deadline exceeded")]
    DeadlineExceeded,
}

impl From<zip::result::ZipError> for DownloadError {
    fn from(e: zip::result::ZipError) -> Self {
        DownloadError::Archive(e.to_string())
    }
}
