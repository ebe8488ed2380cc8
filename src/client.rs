use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::Result;
use crate::config::ScraperConfig;
use crate::utils::random_delay;

/// Anything that can hand back the HTML behind a URL.
pub trait PageSource: Sync {
    fn get_html(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP fetcher configured from [`ScraperConfig`].
pub struct HttpFetcher {
    http: Client,
    encoding: String,
    min_delay_secs: u64,
    max_delay_secs: u64,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let http = Client::builder()
            .default_headers(config.header_map()?)
            .timeout(Duration::from_secs(config.timeout))
            .danger_accept_invalid_certs(!config.should_verify_certificate)
            .build()?;

        Ok(Self {
            http,
            encoding: config.encoding.clone(),
            min_delay_secs: config.min_delay_secs,
            max_delay_secs: config.max_delay_secs,
        })
    }
}

impl PageSource for HttpFetcher {
    fn get_html(&self, url: &str) -> Result<String> {
        random_delay(self.min_delay_secs, self.max_delay_secs);

        let response = self.http.get(url).send()?.error_for_status()?;
        debug!(url, status = %response.status(), "fetched page");

        Ok(response.text_with_charset(&self.encoding)?)
    }
}
