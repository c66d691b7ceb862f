pub mod crawler;
pub mod error;
pub mod extract;
pub mod glassdoor;
pub mod models;
pub mod pipeline;
pub mod writer;

pub use crawler::{Capture, PagerState, ReviewCrawler};
pub use error::CrawlError;
pub use extract::{extract_review, ReviewSource};
pub use glassdoor::{
    CrawlStrategy, Credentials, GlassdoorClient, GlassdoorCrawlConfig, SortOrder,
};
pub use models::{PassSummary, Review, RunSummary, SkipCounts, StopReason};
pub use pipeline::{Crawler, CrawlPipeline};
pub use writer::save_to_csv;

pub type Result<T> = std::result::Result<T, CrawlError>;
