pub mod classifier;
pub mod client;
pub mod clients;
pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod utils;
pub mod visualizer;
pub mod writer;

pub use classifier::classify;
pub use client::{HttpFetcher, PageSource};
pub use clients::CareerspaceClient;
pub use config::{ListingMode, ScraperConfig};
pub use crawler::{
    DetailCrawler, JobCrawler, JobListInfiniteScrollCrawler, JobListPaginatedCrawler,
};
pub use error::{ConfigError, Error};
pub use models::{Listing, QualificationLevel};
pub use pipeline::{CrawlPipeline, Crawler};
pub use visualizer::{count_levels, render_chart, save_chart};
pub use writer::{load_from_csv, prepare_output_dir, save_to_csv, save_to_xlsx};

pub type Result<T> = std::result::Result<T, Error>;
