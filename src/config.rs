use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use encoding_rs::Encoding;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;

use crate::error::{ConfigError, Error};
use crate::Result;

pub const DEFAULT_CONFIG_PATH: &str = "scraper_config.json";
pub const DEFAULT_OUTPUT_DIR: &str = "tmp";
pub const SPREADSHEET_FILE: &str = "job_offers.csv";
pub const WORKBOOK_FILE: &str = "job_offers.xlsx";
pub const CHART_FILE: &str = "statistics_careerspace.html";

/// No upper bound on how many listings a run may collect.
pub const NUM_ARTICLES_UPPER_LIMIT: Option<usize> = None;
pub const TIMEOUT_LOWER_LIMIT: u64 = 1;
pub const TIMEOUT_UPPER_LIMIT: u64 = 60;

static SEED_URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^/\s]+/.*$").expect("static pattern"));

/// How listing URLs are discovered on the category page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingMode {
    /// Plain HTTP requests with a `page=N` query parameter.
    #[default]
    Paginated,
    /// Headless Chrome scrolling the rendered catalogue.
    InfiniteScroll,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    pub seed_urls: Vec<String>,
    #[serde(rename = "total_articles_to_find_and_parse")]
    pub total_articles: usize,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub encoding: String,
    /// Seconds to wait for a response.
    pub timeout: u64,
    pub should_verify_certificate: bool,
    pub headless_mode: bool,

    #[serde(default)]
    pub listing_mode: ListingMode,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default = "default_thread_count")]
    pub thread_count: usize,
    #[serde(default = "default_min_delay")]
    pub min_delay_secs: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_secs: u64,
}

fn default_max_pages() -> usize {
    50
}

fn default_thread_count() -> usize {
    1
}

fn default_min_delay() -> u64 {
    2
}

fn default_max_delay() -> u64 {
    5
}

impl ScraperConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: PathBuf::from(path),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.seed_urls.is_empty() {
            return Err(ConfigError::IncorrectSeedUrl(String::new()));
        }
        if let Some(bad) = self
            .seed_urls
            .iter()
            .find(|u| !SEED_URL_PATTERN.is_match(u) || url::Url::parse(u).is_err())
        {
            return Err(ConfigError::IncorrectSeedUrl(bad.clone()));
        }

        if self.total_articles < 1 {
            return Err(ConfigError::IncorrectNumberOfArticles);
        }
        if let Some(limit) = NUM_ARTICLES_UPPER_LIMIT {
            if self.total_articles > limit {
                return Err(ConfigError::NumberOfArticlesOutOfRange(
                    self.total_articles,
                    limit,
                ));
            }
        }

        self.header_map()?;

        // reqwest silently decodes unknown labels as UTF-8
        if Encoding::for_label(self.encoding.trim().as_bytes()).is_none() {
            return Err(ConfigError::IncorrectEncoding(self.encoding.clone()));
        }

        if !(TIMEOUT_LOWER_LIMIT..=TIMEOUT_UPPER_LIMIT).contains(&self.timeout) {
            return Err(ConfigError::IncorrectTimeout(
                self.timeout,
                TIMEOUT_LOWER_LIMIT,
                TIMEOUT_UPPER_LIMIT,
            ));
        }

        if self.min_delay_secs > self.max_delay_secs {
            return Err(ConfigError::IncorrectDelay(
                self.min_delay_secs,
                self.max_delay_secs,
            ));
        }

        if self.max_pages == 0 {
            return Err(ConfigError::IncorrectMaxPages);
        }

        if self.thread_count == 0 {
            return Err(ConfigError::IncorrectThreadCount);
        }

        Ok(())
    }

    /// Request headers as reqwest expects them.
    pub fn header_map(&self) -> std::result::Result<HeaderMap, ConfigError> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConfigError::IncorrectHeaders(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ConfigError::IncorrectHeaders(name.clone()))?;
            map.insert(header, value);
        }
        Ok(map)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            seed_urls: vec!["https://careerspace.app/jobs/it/".to_string()],
            total_articles: 100,
            headers: HashMap::new(),
            encoding: "utf-8".to_string(),
            timeout: 10,
            should_verify_certificate: true,
            headless_mode: true,
            listing_mode: ListingMode::default(),
            max_pages: default_max_pages(),
            thread_count: default_thread_count(),
            min_delay_secs: default_min_delay(),
            max_delay_secs: default_max_delay(),
        }
    }
}
