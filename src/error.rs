use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a crawl.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("malformed config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("cannot parse {url}: {reason}")]
    Parse { url: String, reason: &'static str },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

impl Error {
    pub(crate) fn browser(e: impl std::fmt::Display) -> Self {
        Self::Browser(e.to_string())
    }
}

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("seed URLs must be a non-empty list of http(s) URLs, got {0:?}")]
    IncorrectSeedUrl(String),

    #[error("total number of articles to parse must be at least 1")]
    IncorrectNumberOfArticles,

    #[error("total number of articles {0} is out of range 1..={1}")]
    NumberOfArticlesOutOfRange(usize, usize),

    #[error("header {0:?} is not a valid HTTP header")]
    IncorrectHeaders(String),

    #[error("unknown encoding label {0:?}")]
    IncorrectEncoding(String),

    #[error("timeout {0}s is out of range {1}..={2}")]
    IncorrectTimeout(u64, u64, u64),

    #[error("delay range {0}..={1} is empty")]
    IncorrectDelay(u64, u64),

    #[error("max pages must be at least 1")]
    IncorrectMaxPages,

    #[error("thread count must be at least 1")]
    IncorrectThreadCount,
}
