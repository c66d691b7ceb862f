use crate::extract::{extract_review, ReviewSource};
use crate::models::{PassSummary, Review, SkipCounts, StopReason};
use crate::Result;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fixed wait after the first load of a listing page.
pub const START_SETTLE: Duration = Duration::from_secs(1);
/// Fixed wait after a reload or a next-page click, so the page can
/// re-render before the next fetch.
pub const PAGE_SETTLE: Duration = Duration::from_secs(4);

/// What one review container turned out to be.
pub enum Capture {
    /// Promoted card; excluded from extraction entirely.
    Featured,
    /// No author block; the whole record is dropped.
    Blocked,
    Review(ReviewSource),
}

/// Mutable traversal state for one pass, created at pass start and
/// discarded when the pass ends.
#[derive(Debug)]
pub struct PagerState {
    /// 1-based page number currently under the cursor.
    pub page: u32,
    /// Running row index; advances for every container seen, skips
    /// included, so the index space stays stable.
    pub row_index: usize,
    /// False once two consecutive fetches of a page came back empty.
    pub live: bool,
}

impl PagerState {
    pub fn new(page: u32) -> Self {
        Self {
            page,
            row_index: 0,
            live: true,
        }
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn bump_row(&mut self) {
        self.row_index += 1;
    }

    pub fn mark_dead(&mut self) {
        self.live = false;
    }
}

/// Stop decision evaluated after each fully-processed page. The limit is
/// post-hoc: a page is never truncated mid-way, so the final count may
/// overshoot the limit by up to one page.
pub fn stop_after_page(
    state: &PagerState,
    accepted: usize,
    limit: usize,
    more_pages: bool,
) -> Option<StopReason> {
    if !state.live {
        return Some(StopReason::DeadPage);
    }
    if accepted >= limit {
        return Some(StopReason::LimitReached);
    }
    if !more_pages {
        return Some(StopReason::NoMorePages);
    }
    None
}

/// Drives one browser tab through a paginated review listing. Site
/// specifics (selectors, indicators) come from the implementor; the
/// traversal loop and its failure handling live here.
pub trait ReviewCrawler {
    fn create_browser(&self, headless: bool) -> Result<Browser> {
        let browser = Browser::new(LaunchOptions {
            headless,
            args: vec![
                &std::ffi::OsString::from(format!("--user-agent={}", USER_AGENT)),
                &std::ffi::OsString::from("--disable-blink-features=AutomationControlled"),
            ],
            ..Default::default()
        })?;
        Ok(browser)
    }

    /// All review containers currently rendered on the page.
    fn review_blocks<'a>(&self, tab: &'a Tab) -> Result<Vec<Element<'a>>>;

    /// Classify one container and capture its text form.
    fn capture(&self, review: &Element) -> Capture;

    /// Page number shown by the selected-page indicator.
    fn current_page(&self, tab: &Tab) -> Result<u32>;

    /// Whether the page-number listing shows a page beyond the selected
    /// one. An absent listing means there is nothing further.
    fn has_more_pages(&self, tab: &Tab) -> bool;

    /// Trigger the next-page control and wait for the page to settle.
    fn advance_page(&self, tab: &Tab) -> Result<()>;

    fn settle(&self) -> Duration {
        PAGE_SETTLE
    }

    /// One traversal pass from the current page, appending accepted rows
    /// until a stop condition fires. Failures mid-page terminate the pass,
    /// never the rows already collected.
    fn crawl_pass(&self, tab: &Arc<Tab>, rows: &mut Vec<Review>, limit: usize) -> PassSummary {
        let start_count = rows.len();
        let page = self.current_page(tab).unwrap_or_else(|err| {
            log::warn!("no page indicator found, assuming page 1: {err}");
            1
        });
        let mut state = PagerState::new(page);
        let mut skipped = SkipCounts::default();
        let mut pages = 0u32;

        log::info!("starting from page {}, collecting up to {} reviews", state.page, limit);
        thread::sleep(START_SETTLE);

        let stop = loop {
            if let Err(err) = self.scrape_page(tab, &mut state, rows, &mut skipped) {
                break StopReason::PageFailure(err);
            }
            pages += 1;

            let accepted = rows.len() - start_count;
            let more = self.has_more_pages(tab);
            if let Some(stop) = stop_after_page(&state, accepted, limit, more) {
                break stop;
            }

            log::info!("moving to page {}", state.page + 1);
            if let Err(err) = self.advance_page(tab) {
                break StopReason::PageFailure(err);
            }
            state.next_page();
        };

        PassSummary {
            pages,
            accepted: rows.len() - start_count,
            skipped,
            stop,
        }
    }

    /// Fetch and process the page under the cursor. An empty fetch gets
    /// one reload retry; a second empty fetch marks the pager dead.
    fn scrape_page(
        &self,
        tab: &Arc<Tab>,
        state: &mut PagerState,
        rows: &mut Vec<Review>,
        skipped: &mut SkipCounts,
    ) -> Result<()> {
        log::info!("pulling reviews from page {}", state.page);
        let mut blocks = self.review_blocks(tab)?;
        log::info!("found {} reviews on page {}", blocks.len(), state.page);

        if blocks.is_empty() {
            tab.reload(false, None)?;
            thread::sleep(self.settle());
            blocks = self.review_blocks(tab)?;
            log::info!(
                "found {} reviews on page {} after reload",
                blocks.len(),
                state.page
            );
            if blocks.is_empty() {
                state.mark_dead();
                return Ok(());
            }
        }

        for block in &blocks {
            match self.capture(block) {
                Capture::Featured => {
                    log::info!("discarding featured review at row {}", state.row_index);
                    skipped.featured += 1;
                }
                Capture::Blocked => {
                    log::info!("discarding blocked review at row {}", state.row_index);
                    skipped.blocked += 1;
                }
                Capture::Review(source) => {
                    let review = extract_review(&source);
                    log::info!(
                        "captured \"{}\" ({})",
                        review.review_title.as_deref().unwrap_or("untitled"),
                        review.date.as_deref().unwrap_or("no date")
                    );
                    rows.push(review);
                }
            }
            state.bump_row();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_pager_is_live() {
        let state = PagerState::new(3);
        assert!(state.live);
        assert_eq!(state.page, 3);
        assert_eq!(state.row_index, 0);
    }

    #[test]
    fn dead_pager_stops_regardless_of_remaining_pages() {
        let mut state = PagerState::new(1);
        state.mark_dead();
        let stop = stop_after_page(&state, 0, 100, true);
        assert!(matches!(stop, Some(StopReason::DeadPage)));
    }

    #[test]
    fn limit_is_checked_after_the_page_completes() {
        let state = PagerState::new(3);
        // 10 accepted per page against a limit of 25: pages one and two
        // keep going, page three stops with 30 rows retained.
        assert!(stop_after_page(&state, 10, 25, true).is_none());
        assert!(stop_after_page(&state, 20, 25, true).is_none());
        let stop = stop_after_page(&state, 30, 25, true);
        assert!(matches!(stop, Some(StopReason::LimitReached)));
    }

    #[test]
    fn exhausted_listing_stops() {
        let state = PagerState::new(8);
        let stop = stop_after_page(&state, 5, 100, false);
        assert!(matches!(stop, Some(StopReason::NoMorePages)));
    }

    #[test]
    fn row_index_advances_past_skips() {
        let mut state = PagerState::new(1);
        for _ in 0..10 {
            state.bump_row();
        }
        assert_eq!(state.row_index, 10);
    }
}
