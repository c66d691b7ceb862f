use crate::writer::save_to_csv;
use crate::{Result, RunSummary};

/// Entry point of a crawl: `CrawlPipeline::new().crawl(client)?.save(path)`.
pub struct CrawlPipeline;

#[must_use = "pipeline must end with .save() to execute"]
pub struct PipelineWithReviews {
    summary: RunSummary,
}

impl CrawlPipeline {
    pub fn new() -> Self {
        Self
    }

    pub fn crawl<C>(self, client: C) -> Result<PipelineWithReviews>
    where
        C: Crawler,
    {
        let summary = client.start_crawl()?;
        Ok(PipelineWithReviews { summary })
    }
}

impl Default for CrawlPipeline {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Crawler {
    fn start_crawl(&self) -> Result<RunSummary>;
}

impl PipelineWithReviews {
    /// Write the collected rows and hand the summary back, partial runs
    /// included.
    pub fn save(self, path: impl Into<String>) -> Result<RunSummary> {
        let path = path.into();
        save_to_csv(&self.summary.reviews, &path)?;
        println!("✅ saved {} reviews to {}", self.summary.reviews.len(), path);
        Ok(self.summary)
    }
}
