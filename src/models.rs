use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CrawlError;

/// One scraped review. Field order is the CSV column order; a `None`
/// field means its anchor text was absent or extraction failed, and it
/// serializes as an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: Option<String>,
    pub date: Option<String>,
    pub employee_title: Option<String>,
    pub location: Option<String>,
    pub review_title: Option<String>,
    pub overall_rating: Option<f64>,
    pub pros: Option<String>,
    pub cons: Option<String>,
    pub advice: Option<String>,
}

/// Why a traversal pass stopped.
#[derive(Debug)]
pub enum StopReason {
    /// The page-number listing showed no page beyond the selected one.
    NoMorePages,
    /// The pass collected at least its review limit.
    LimitReached,
    /// Two consecutive fetches of the same page yielded zero reviews.
    DeadPage,
    /// A page failed mid-processing; rows collected so far are kept.
    PageFailure(CrawlError),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::NoMorePages => write!(f, "no further pages"),
            StopReason::LimitReached => write!(f, "review limit reached"),
            StopReason::DeadPage => write!(f, "page kept coming back empty"),
            StopReason::PageFailure(err) => write!(f, "aborted mid-page: {err}"),
        }
    }
}

/// Reviews dropped before extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipCounts {
    /// Featured/promoted cards, excluded from the dataset entirely.
    pub featured: usize,
    /// Cards with no author block (blocked reviews), dropped whole.
    pub blocked: usize,
}

/// Outcome of one traversal pass over a listing.
#[derive(Debug)]
pub struct PassSummary {
    pub pages: u32,
    pub accepted: usize,
    pub skipped: SkipCounts,
    pub stop: StopReason,
}

/// Everything a crawl run produced, partial or not.
#[derive(Debug)]
pub struct RunSummary {
    pub reviews: Vec<Review>,
    pub passes: Vec<PassSummary>,
}
