use std::collections::HashSet;
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions, Tab};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use scraper::Html;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::{Listing, Result};

/// Consecutive pages without a single new URL before giving up.
const MAX_PAGES_WITHOUT_NEW: usize = 2;

pub trait JobCrawler {
    fn fetch_html(&self, url: &str) -> Result<String>;

    /// Absolute URLs of every listing card on a catalogue page, in page order.
    fn parse_listing_urls(&self, html: &str) -> Vec<String>;
}

/// Keeps the first occurrence of each URL and stops at `limit`.
/// Returns how many URLs were new.
fn merge_urls(
    collected: &mut Vec<String>,
    seen: &mut HashSet<String>,
    found: Vec<String>,
    limit: usize,
) -> usize {
    let before = collected.len();
    for url in found {
        if collected.len() >= limit {
            break;
        }
        if seen.insert(url.clone()) {
            collected.push(url);
        }
    }
    collected.len() - before
}

pub trait JobListPaginatedCrawler: JobCrawler {
    fn build_page_url(&self, base_url: &str, page: usize) -> Result<String>;

    fn collect_listing_urls(
        &self,
        seed_urls: &[String],
        limit: usize,
        max_pages: usize,
    ) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        'seeds: for seed in seed_urls {
            let mut no_new_count = 0;

            for page in 1..=max_pages {
                if urls.len() >= limit {
                    break 'seeds;
                }

                let page_url = self.build_page_url(seed, page)?;
                let html = self.fetch_html(&page_url)?;
                let found = self.parse_listing_urls(&html);

                if found.is_empty() {
                    debug!(page, seed = %seed, "no listing cards, category exhausted");
                    break;
                }

                let new_count = merge_urls(&mut urls, &mut seen, found, limit);
                info!(page, new = new_count, total = urls.len(), "listing page parsed");

                no_new_count = if new_count == 0 { no_new_count + 1 } else { 0 };
                if no_new_count >= MAX_PAGES_WITHOUT_NEW {
                    debug!(no_new_count, "no new listings, stopping");
                    break;
                }
            }
        }

        Ok(urls)
    }
}

pub trait JobListInfiniteScrollCrawler: JobCrawler {
    fn wait_for_list_page_load(&self, tab: &Arc<Tab>) -> Result<()>;

    fn create_browser(&self, headless: bool) -> Result<Browser> {
        Browser::new(LaunchOptions {
            headless,
            args: vec![
                OsStr::new("--start-maximized"),
                OsStr::new("--disable-blink-features=AutomationControlled"),
            ],
            ..Default::default()
        })
        .map_err(Error::browser)
    }

    fn go_next_page(&self, tab: &Arc<Tab>) -> Result<()> {
        tab.evaluate("window.scrollTo(0, document.body.scrollHeight)", false)
            .map_err(Error::browser)?;
        Ok(())
    }

    fn page_height(&self, tab: &Arc<Tab>) -> Result<Option<u64>> {
        let height = tab
            .evaluate("document.body.scrollHeight", false)
            .map_err(Error::browser)?
            .value
            .and_then(|v| v.as_u64());
        Ok(height)
    }

    /// Scrolls the catalogue until `limit` URLs are found, the page stops
    /// growing, or `max_scrolls` scrolls were made.
    fn scroll_listing_urls(
        &self,
        browser: &Browser,
        seed_url: &str,
        limit: usize,
        max_scrolls: usize,
    ) -> Result<Vec<String>> {
        let tab = browser.new_tab().map_err(Error::browser)?;
        tab.navigate_to(seed_url).map_err(Error::browser)?;
        self.wait_for_list_page_load(&tab)?;

        let mut seen = HashSet::new();
        let mut urls = Vec::new();
        let mut last_height = self.page_height(&tab)?;

        for scroll in 1..=max_scrolls {
            if urls.len() >= limit {
                break;
            }

            self.go_next_page(&tab)?;
            let html = tab.get_content().map_err(Error::browser)?;
            let found = self.parse_listing_urls(&html);
            let new_count = merge_urls(&mut urls, &mut seen, found, limit);
            info!(scroll, new = new_count, total = urls.len(), "catalogue scrolled");

            std::thread::sleep(Duration::from_secs(2));
            let new_height = self.page_height(&tab)?;
            if new_height == last_height {
                debug!(scroll, "page height unchanged, end of catalogue");
                break;
            }
            last_height = new_height;
        }

        Ok(urls)
    }
}

pub trait JobFieldExtractor {
    fn extract_title(&self, document: &Html) -> Option<String>;

    fn extract_employer(&self, document: &Html) -> Option<String>;

    /// Location chips: city names mixed with work-mode markers.
    fn extract_location_labels(&self, document: &Html) -> Vec<String>;

    fn extract_wage_text(&self, document: &Html) -> Option<String>;
}

pub trait DetailCrawler: JobCrawler + Sync {
    fn parse_detail(&self, url: &str, html: &str) -> Result<Listing>;

    fn fetch_detail(&self, url: &str) -> Result<Listing> {
        let html = self.fetch_html(url)?;
        self.parse_detail(url, &html)
    }

    /// Fetches every detail page, skipping the ones that fail.
    /// Output keeps the order of `urls`.
    fn fetch_details(&self, urls: &[String], thread_count: usize) -> Result<Vec<Listing>> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(thread_count.max(1))
            .build()?;

        let listings: Vec<Option<Listing>> = pool.install(|| {
            urls.par_iter()
                .enumerate()
                .map(|(idx, url)| match self.fetch_detail(url) {
                    Ok(listing) => {
                        info!(
                            idx,
                            title = %listing.title,
                            level = listing.qualification_level.label(),
                            "listing parsed"
                        );
                        Some(listing)
                    }
                    Err(e) => {
                        warn!(idx, url = %url, error = %e, "skipping listing");
                        None
                    }
                })
                .collect()
        });

        Ok(listings.into_iter().flatten().collect())
    }
}
