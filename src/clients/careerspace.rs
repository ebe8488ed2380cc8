use std::sync::{Arc, LazyLock};

use headless_chrome::Tab;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::info;
use url::Url;

use crate::classifier::classify;
use crate::client::{HttpFetcher, PageSource};
use crate::config::{ListingMode, ScraperConfig};
use crate::crawler::{
    DetailCrawler, JobCrawler, JobFieldExtractor, JobListInfiniteScrollCrawler,
    JobListPaginatedCrawler,
};
use crate::error::{ConfigError, Error};
use crate::pipeline::Crawler;
use crate::utils::normalize_ws;
use crate::{Listing, Result};

const BASE_URL: &str = "https://careerspace.app";
const REMOTE_LABELS: [&str; 2] = ["удаленно", "удалённо"];
const HYBRID_LABELS: [&str; 1] = ["гибрид"];

/// Digit groups may be split by spaces, NBSP, commas or dots.
static WAGE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:[\s,.][0-9]{3})*").expect("static pattern"));
// Prefixes may be glued to the amount (`от100 000`) but not part of a word.
static WAGE_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^\p{L}])от(?:[^\p{L}]|$)").expect("static pattern")
});
static WAGE_TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^\p{L}])до(?:[^\p{L}]|$)").expect("static pattern")
});

/// Crawler for the careerspace.app vacancy catalogue.
pub struct CareerspaceClient<S = HttpFetcher> {
    base_url: String,
    source: S,
    config: ScraperConfig,
}

impl CareerspaceClient<HttpFetcher> {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let source = HttpFetcher::new(&config)?;
        Ok(Self::with_source(config, source))
    }
}

impl<S: PageSource> CareerspaceClient<S> {
    pub fn with_source(config: ScraperConfig, source: S) -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            source,
            config,
        }
    }

    fn collect_urls(&self) -> Result<Vec<String>> {
        let limit = self.config.total_articles;
        let max_pages = self.config.max_pages;

        match self.config.listing_mode {
            ListingMode::Paginated => {
                self.collect_listing_urls(&self.config.seed_urls, limit, max_pages)
            }
            ListingMode::InfiniteScroll => {
                let seed = self
                    .config
                    .seed_urls
                    .first()
                    .ok_or_else(|| ConfigError::IncorrectSeedUrl(String::new()))?;
                let browser = self.create_browser(self.config.headless_mode)?;
                self.scroll_listing_urls(&browser, seed, limit, max_pages)
            }
        }
    }

    /// `/job/<id>` links only; anything deeper or elsewhere is not a vacancy.
    fn listing_url(&self, href: &str) -> Option<String> {
        (href.starts_with("/job/") && href.matches('/').count() == 2 && href.len() > 5)
            .then(|| format!("{}{}", self.base_url, href))
    }
}

impl<S: PageSource> JobCrawler for CareerspaceClient<S> {
    fn fetch_html(&self, url: &str) -> Result<String> {
        self.source.get_html(url)
    }

    fn parse_listing_urls(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let Ok(card_selector) = Selector::parse("a.job-card__i") else {
            return Vec::new();
        };

        document
            .select(&card_selector)
            .filter_map(|card| card.value().attr("href"))
            .filter_map(|href| self.listing_url(href.trim()))
            .collect()
    }
}

impl<S: PageSource> JobListPaginatedCrawler for CareerspaceClient<S> {
    fn build_page_url(&self, base_url: &str, page: usize) -> Result<String> {
        let mut url = Url::parse(base_url)?;
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "page")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("page", &page.to_string());

        Ok(url.into())
    }
}

impl<S: PageSource> JobListInfiniteScrollCrawler for CareerspaceClient<S> {
    fn wait_for_list_page_load(&self, tab: &Arc<Tab>) -> Result<()> {
        tab.wait_for_element("a.job-card__i").map_err(Error::browser)?;
        Ok(())
    }
}

impl<S: PageSource> JobFieldExtractor for CareerspaceClient<S> {
    fn extract_title(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse("div.j-d-h__inner h3").ok()?;
        let title = document.select(&selector).next()?.text().collect::<String>();
        Some(normalize_ws(&title))
    }

    fn extract_employer(&self, document: &Html) -> Option<String> {
        ["div.j-d-h__company.cs-df-alc", "div.j-d-cm__name"]
            .iter()
            .filter_map(|css| Selector::parse(css).ok())
            .find_map(|selector| {
                let el = document.select(&selector).next()?;
                Some(normalize_ws(&el.text().collect::<String>()))
            })
    }

    fn extract_location_labels(&self, document: &Html) -> Vec<String> {
        let Ok(selector) = Selector::parse("div.j-d-h__inner span.job-lb__tx") else {
            return Vec::new();
        };

        document
            .select(&selector)
            .map(|span| normalize_ws(&span.text().collect::<String>()))
            .filter(|label| !label.is_empty())
            .collect()
    }

    fn extract_wage_text(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse("div.j-d__content span.price").ok()?;
        let price = document.select(&selector).next()?;
        Some(normalize_ws(&price.text().collect::<String>()))
    }
}

impl<S: PageSource> DetailCrawler for CareerspaceClient<S> {
    fn parse_detail(&self, url: &str, html: &str) -> Result<Listing> {
        let document = Html::parse_document(html);

        let title = self
            .extract_title(&document)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Parse {
                url: url.to_string(),
                reason: "vacancy header has no title",
            })?;
        let employer = self.extract_employer(&document).unwrap_or_default();

        let mut listing = Listing::new(title, employer, url.to_string());
        listing.qualification_level = classify(&listing.title);

        let (city, remote, hybrid) = split_location(self.extract_location_labels(&document));
        listing.city = city;
        listing.remote_possible = remote;
        listing.hybrid_possible = hybrid;

        if let Some(wage) = self.extract_wage_text(&document) {
            (listing.wage_min, listing.wage_max) = parse_wage_range(&wage);
        }

        Ok(listing)
    }
}

impl<S: PageSource> Crawler for CareerspaceClient<S> {
    fn start_crawl(&self) -> Result<Vec<Listing>> {
        info!(mode = ?self.config.listing_mode, "collecting careerspace vacancy links");
        let urls = self.collect_urls()?;
        info!(count = urls.len(), "vacancy links collected");

        let listings = self.fetch_details(&urls, self.config.thread_count)?;
        info!(
            parsed = listings.len(),
            skipped = urls.len() - listings.len(),
            "✅ vacancies parsed"
        );
        Ok(listings)
    }
}

/// Splits location chips into `(city, remote, hybrid)`.
/// The first chip that is not a work-mode marker is the city.
pub fn split_location(labels: Vec<String>) -> (Option<String>, bool, bool) {
    let mut remote = false;
    let mut hybrid = false;
    let mut city = None;

    for label in labels {
        let lower = label.to_lowercase();
        if REMOTE_LABELS.contains(&lower.as_str()) {
            remote = true;
        } else if HYBRID_LABELS.contains(&lower.as_str()) {
            hybrid = true;
        } else if city.is_none() {
            city = Some(label);
        }
    }

    (city, remote, hybrid)
}

/// Parses a price badge such as `от 150 000 ₽` or `100 000 – 200 000 ₽`
/// into `(min, max)`. A single bare amount is both bounds, and an inverted
/// range is treated as unparseable.
pub fn parse_wage_range(text: &str) -> (Option<u64>, Option<u64>) {
    let amounts: Vec<u64> = WAGE_NUMBER
        .find_iter(text)
        .filter_map(|m| {
            m.as_str()
                .chars()
                .filter(char::is_ascii_digit)
                .collect::<String>()
                .parse()
                .ok()
        })
        .collect();

    let from = WAGE_FROM.is_match(text);
    let to = WAGE_TO.is_match(text);

    let range = match (from, to, amounts.as_slice()) {
        (_, _, []) => (None, None),
        (true, true, [min, max, ..]) => (Some(*min), Some(*max)),
        (true, _, [min, ..]) => (Some(*min), None),
        (false, true, [max, ..]) => (None, Some(*max)),
        (false, false, [min, max, ..]) => (Some(*min), Some(*max)),
        (false, false, [single]) => (Some(*single), Some(*single)),
    };

    match range {
        (Some(min), Some(max)) if min > max => (None, None),
        range => range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QualificationLevel;
    use std::collections::HashMap;
    use std::io::ErrorKind;
    use std::sync::Mutex;

    /// Serves canned pages and records every requested URL.
    #[derive(Default)]
    struct FakeSource {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn page(mut self, url: &str, html: impl Into<String>) -> Self {
            self.pages.insert(url.to_string(), html.into());
            self
        }
    }

    impl PageSource for FakeSource {
        fn get_html(&self, url: &str) -> Result<String> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| std::io::Error::new(ErrorKind::NotFound, url.to_string()).into())
        }
    }

    const SEED: &str = "https://careerspace.app/jobs/it/";

    fn config() -> ScraperConfig {
        ScraperConfig {
            total_articles: 10,
            max_pages: 5,
            min_delay_secs: 0,
            max_delay_secs: 0,
            ..Default::default()
        }
    }

    fn catalogue(ids: &[u32]) -> String {
        let cards: String = ids
            .iter()
            .map(|id| format!(r#"<a class="job-card__i" href="/job/{id}">card {id}</a>"#))
            .collect();
        format!("<html><body><div class=\"jobs\">{cards}</div></body></html>")
    }

    fn detail(title: &str, labels: &[&str], company: &str, price: &str) -> String {
        let chips: String = labels
            .iter()
            .map(|l| format!(r#"<span class="job-lb__tx"> {l} </span>"#))
            .collect();
        format!(
            r#"<html><body>
              <div class="j-d-h__inner"><h3>{title}</h3><div>{chips}</div></div>
              <div class="j-d-h__company cs-df-alc"> {company} </div>
              <div class="j-d__content"><span class="price">{price}</span></div>
            </body></html>"#
        )
    }

    fn page_url(page: usize) -> String {
        format!("{SEED}?page={page}")
    }

    #[test]
    fn listing_urls_keep_only_vacancy_links() {
        let client = CareerspaceClient::with_source(config(), FakeSource::default());
        let html = r#"
            <a class="job-card__i" href="/job/101">ok</a>
            <a class="job-card__i" href="/job/101/apply">nested</a>
            <a class="job-card__i" href="/company/7">company</a>
            <a class="job-card__i" href="/job/">empty</a>
            <a class="other" href="/job/102">not a card</a>
            <a class="job-card__i">no href</a>
            <a class="job-card__i" href="/job/103">ok</a>
        "#;

        assert_eq!(
            client.parse_listing_urls(html),
            vec![
                "https://careerspace.app/job/101".to_string(),
                "https://careerspace.app/job/103".to_string(),
            ]
        );
    }

    #[test]
    fn page_url_replaces_existing_page_param() {
        let client = CareerspaceClient::with_source(config(), FakeSource::default());
        assert_eq!(client.build_page_url(SEED, 1).unwrap(), page_url(1));
        assert_eq!(
            client
                .build_page_url("https://careerspace.app/jobs/it/?sort=new&page=4", 2)
                .unwrap(),
            "https://careerspace.app/jobs/it/?sort=new&page=2"
        );
        assert!(matches!(client.build_page_url("not a url", 1), Err(Error::Url(_))));
    }

    #[test]
    fn pagination_stops_on_empty_page() {
        let source = FakeSource::default()
            .page(&page_url(1), catalogue(&[1, 2]))
            .page(&page_url(2), catalogue(&[2, 3]))
            .page(&page_url(3), catalogue(&[]));
        let client = CareerspaceClient::with_source(config(), source);

        let urls = client.collect_listing_urls(&[SEED.to_string()], 10, 5).unwrap();
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[2], "https://careerspace.app/job/3");
        assert_eq!(client.source.requested.lock().unwrap().len(), 3);
    }

    #[test]
    fn pagination_stops_when_pages_repeat() {
        let source = FakeSource::default()
            .page(&page_url(1), catalogue(&[1, 2]))
            .page(&page_url(2), catalogue(&[1, 2]))
            .page(&page_url(3), catalogue(&[1, 2]))
            .page(&page_url(4), catalogue(&[9]));
        let client = CareerspaceClient::with_source(config(), source);

        let urls = client.collect_listing_urls(&[SEED.to_string()], 10, 5).unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(client.source.requested.lock().unwrap().len(), 3);
    }

    #[test]
    fn pagination_respects_limit_and_max_pages() {
        let source = FakeSource::default()
            .page(&page_url(1), catalogue(&[1, 2, 3]))
            .page(&page_url(2), catalogue(&[4, 5, 6]));
        let client = CareerspaceClient::with_source(config(), source);

        let urls = client.collect_listing_urls(&[SEED.to_string()], 4, 5).unwrap();
        assert_eq!(urls.len(), 4);

        let urls = client.collect_listing_urls(&[SEED.to_string()], 100, 1).unwrap();
        assert_eq!(urls.len(), 3);
    }

    #[test]
    fn listing_page_failure_aborts() {
        let client = CareerspaceClient::with_source(config(), FakeSource::default());
        assert!(client.collect_listing_urls(&[SEED.to_string()], 10, 5).is_err());
    }

    #[test]
    fn detail_page_fields() {
        let client = CareerspaceClient::with_source(config(), FakeSource::default());
        let html = detail(
            "Senior Rust разработчик",
            &["Москва", "Удаленно", "Гибрид"],
            "Яндекс",
            "от 300 000 ₽",
        );

        let listing = client
            .parse_detail("https://careerspace.app/job/1", &html)
            .unwrap();

        assert_eq!(listing.title, "Senior Rust разработчик");
        assert_eq!(listing.qualification_level, QualificationLevel::Senior);
        assert_eq!(listing.employer, "Яндекс");
        assert_eq!(listing.city.as_deref(), Some("Москва"));
        assert!(listing.remote_possible);
        assert!(listing.hybrid_possible);
        assert_eq!((listing.wage_min, listing.wage_max), (Some(300_000), None));
        assert_eq!(listing.url, "https://careerspace.app/job/1");
    }

    #[test]
    fn employer_falls_back_to_company_block() {
        let client = CareerspaceClient::with_source(config(), FakeSource::default());
        let html = r#"
            <div class="j-d-h__inner"><h3>Аналитик</h3></div>
            <div class="j-d-cm__name">  ООО Ромашка </div>
        "#;

        let listing = client.parse_detail("u", html).unwrap();
        assert_eq!(listing.employer, "ООО Ромашка");
        assert_eq!(listing.city, None);
        assert_eq!(listing.qualification_level, QualificationLevel::NotSpecified);
        assert_eq!((listing.wage_min, listing.wage_max), (None, None));
    }

    #[test]
    fn detail_without_header_is_parse_error() {
        let client = CareerspaceClient::with_source(config(), FakeSource::default());
        let err = client.parse_detail("u", "<html><h3>loose</h3></html>").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn failed_details_are_skipped_in_order() {
        let source = FakeSource::default()
            .page("https://careerspace.app/job/1", detail("Junior QA", &[], "A", "50 000 ₽"))
            .page("https://careerspace.app/job/3", detail("Middle QA", &[], "C", "до 90 000 ₽"))
            .page("https://careerspace.app/job/4", "<html>broken</html>");
        let client = CareerspaceClient::with_source(config(), source);
        let urls: Vec<String> = (1..=4)
            .map(|id| format!("https://careerspace.app/job/{id}"))
            .collect();

        let listings = client.fetch_details(&urls, 2).unwrap();
        let titles: Vec<_> = listings.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, ["Junior QA", "Middle QA"]);
        assert_eq!(listings[0].wage_min, Some(50_000));
        assert_eq!(listings[0].wage_max, Some(50_000));
        assert_eq!(listings[1].wage_max, Some(90_000));
    }

    #[test]
    fn location_markers_are_not_cities() {
        let labels = |l: &[&str]| l.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert_eq!(split_location(labels(&["Удаленно"])), (None, true, false));
        assert_eq!(
            split_location(labels(&["Гибрид", "Санкт-Петербург", "Казань"])),
            (Some("Санкт-Петербург".to_string()), false, true)
        );
        assert_eq!(split_location(Vec::new()), (None, false, false));
    }

    #[test]
    fn wage_ranges() {
        assert_eq!(parse_wage_range("от 150 000 ₽"), (Some(150_000), None));
        assert_eq!(parse_wage_range("до 200\u{a0}000 ₽"), (None, Some(200_000)));
        assert_eq!(
            parse_wage_range("от 100 000 до 180 000 ₽"),
            (Some(100_000), Some(180_000))
        );
        assert_eq!(
            parse_wage_range("100 000 - 200 000 ₽"),
            (Some(100_000), Some(200_000))
        );
        assert_eq!(
            parse_wage_range("120 000 – 160 000 ₽"),
            (Some(120_000), Some(160_000))
        );
        assert_eq!(parse_wage_range("90 000 ₽"), (Some(90_000), Some(90_000)));
        assert_eq!(parse_wage_range("По договоренности"), (None, None));
        assert_eq!(
            parse_wage_range("150,000 - 200,000 ₽"),
            (Some(150_000), Some(200_000))
        );
        assert_eq!(parse_wage_range("от100 000 ₽"), (Some(100_000), None));
        assert_eq!(parse_wage_range("до200 000 ₽"), (None, Some(200_000)));
        assert_eq!(parse_wage_range("300 000 - 100 000 ₽"), (None, None));
    }
}
