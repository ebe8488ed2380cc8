use std::path::Path;

use tracing::info;

use crate::visualizer::save_chart;
use crate::writer::{load_from_csv, save_to_csv, save_to_xlsx};
use crate::{Listing, Result};

pub trait Crawler {
    fn start_crawl(&self) -> Result<Vec<Listing>>;
}

pub struct CrawlPipeline;

#[must_use = "pipeline must end with .chart() or .finish() to write anything"]
pub struct PipelineWithListings {
    listings: Vec<Listing>,
}

impl CrawlPipeline {
    pub fn new() -> Self {
        Self
    }

    pub fn crawl<C>(self, client: C) -> Result<PipelineWithListings>
    where
        C: Crawler,
    {
        let listings = client.start_crawl()?;
        Ok(PipelineWithListings { listings })
    }

    /// Starts from listings scraped earlier.
    pub fn from_listings(self, listings: Vec<Listing>) -> PipelineWithListings {
        PipelineWithListings { listings }
    }

    /// Starts from a spreadsheet written by [`PipelineWithListings::save_and_then`].
    pub fn from_spreadsheet(self, path: impl AsRef<Path>) -> Result<PipelineWithListings> {
        let path = path.as_ref();
        let listings = load_from_csv(path)?;
        info!(path = %path.display(), rows = listings.len(), "spreadsheet loaded");
        Ok(self.from_listings(listings))
    }
}

impl Default for CrawlPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineWithListings {
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn save_and_then(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        save_to_csv(&self.listings, path)?;
        info!(path = %path.display(), rows = self.listings.len(), "✅ spreadsheet saved");
        Ok(self)
    }

    pub fn save_xlsx_and_then(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        save_to_xlsx(&self.listings, path)?;
        info!(path = %path.display(), rows = self.listings.len(), "✅ workbook saved");
        Ok(self)
    }

    pub fn chart(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        save_chart(&self.listings, path)?;
        info!(path = %path.display(), "✅ chart saved");
        Ok(self)
    }

    pub fn finish(self) -> Vec<Listing> {
        self.listings
    }
}
