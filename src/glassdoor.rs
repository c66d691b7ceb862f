use crate::crawler::{Capture, ReviewCrawler, PAGE_SETTLE};
use crate::error::CrawlError;
use crate::extract::ReviewSource;
use crate::models::RunSummary;
use crate::pipeline::Crawler;
use crate::Result;
use headless_chrome::{Element, Tab};
use std::thread;
use std::time::Duration;

const LOGIN_URL: &str = "https://www.glassdoor.com/profile/login_input.htm";
/// Fixed wait after submitting the login form.
const LOGIN_SETTLE: Duration = Duration::from_secs(3);

const REVIEW_SEL: &str = ".empReview";
const FEATURED_SEL: &str = ".featuredFlag";
const AUTHOR_INFO_SEL: &str = ".authorInfo";
const AUTHOR_TITLE_SEL: &str = ".authorJobTitle";
const AUTHOR_LOCATION_SEL: &str = ".authorLocation";
const TITLE_LINK_SEL: &str = ".reviewLink";
const BODY_SEL: &str = ".gdReview";
const SHOW_MORE_SEL: &str = ".v2__EIReviewDetailsV2__continueReading";
const FOOTER_SEL: &str = ".common__EiReviewDetailsStyle__socialHelpfulcontainer";
const SELECTED_PAGE_SEL: &str = ".selected";
const PAGE_LIST_SEL: &str = ".pageContainer";
const NEXT_BUTTON_SEL: &str = ".nextButton";
const REVIEW_COUNT_SEL: &str = r#"h2[data-test="overallReviewCount"]"#;
const USERNAME_SEL: &str = r#"input[name="username"]"#;
const PASSWORD_SEL: &str = r#"input[name="password"]"#;
const SUBMIT_SEL: &str = r#"button[type="submit"]"#;

/// Listing sort orders, applied as query-string filters on the base URL.
#[derive(Debug, Clone, Copy)]
pub enum SortOrder {
    Popular,
    LowestRated,
    HighestRated,
}

impl SortOrder {
    pub fn query_filter(&self) -> &'static str {
        match self {
            Self::Popular => "?filter.iso3Language=eng",
            Self::LowestRated => "?sort.sortType=OR&sort.ascending=true&filter.iso3Language=eng",
            Self::HighestRated => "?sort.sortType=OR&sort.ascending=false&filter.iso3Language=eng",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum CrawlStrategy {
    /// One traversal from the given URL, capped at the configured limit.
    SinglePass,
    /// Popular, then lowest-rated, then highest-rated orderings, each
    /// capped at a third of min(site-reported total, configured limit).
    RatingSpread,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct GlassdoorCrawlConfig {
    /// URL of the first page of a company's reviews.
    pub url: String,
    /// Target number of reviews; checked after each page, so a run may
    /// overshoot by up to one page.
    pub limit: usize,
    pub headless: bool,
    /// When set, the session is authenticated before traversal begins.
    pub credentials: Option<Credentials>,
    pub strategy: CrawlStrategy,
}

pub struct GlassdoorClient {
    config: GlassdoorCrawlConfig,
}

impl GlassdoorClient {
    pub fn new(config: GlassdoorCrawlConfig) -> Self {
        Self { config }
    }

    pub fn crawl(&self) -> Result<RunSummary> {
        let browser = self.create_browser(self.config.headless)?;
        let tab = browser.new_tab()?;

        if let Some(creds) = &self.config.credentials {
            self.sign_in(&tab, creds)?;
        }

        tab.navigate_to(&self.config.url)?;
        tab.wait_until_navigated()?;

        let mut rows = Vec::new();
        let mut passes = Vec::new();

        match self.config.strategy {
            CrawlStrategy::SinglePass => {
                passes.push(self.crawl_pass(&tab, &mut rows, self.config.limit));
            }
            CrawlStrategy::RatingSpread => {
                let total = self.total_review_count(&tab)?;
                let per_pass = total.min(self.config.limit) / 3;
                log::info!("site reports {total} reviews, {per_pass} per ordering");

                for order in [SortOrder::Popular, SortOrder::LowestRated, SortOrder::HighestRated]
                {
                    log::info!("scraping the {order:?} ordering");
                    let url = format!("{}{}", self.config.url, order.query_filter());
                    tab.navigate_to(&url)?;
                    tab.wait_until_navigated()?;
                    passes.push(self.crawl_pass(&tab, &mut rows, per_pass));
                }
            }
        }

        Ok(RunSummary { reviews: rows, passes })
    }

    fn sign_in(&self, tab: &Tab, creds: &Credentials) -> Result<()> {
        log::info!("signing in as {}", creds.email);
        self.submit_login_form(tab, creds)
            .map_err(|err| CrawlError::Login(err.to_string()))
    }

    fn submit_login_form(&self, tab: &Tab, creds: &Credentials) -> anyhow::Result<()> {
        tab.navigate_to(LOGIN_URL)?;
        tab.wait_until_navigated()?;

        let email_field = tab.wait_for_element(USERNAME_SEL)?;
        let password_field = tab.find_element(PASSWORD_SEL)?;
        let submit = tab.find_element(SUBMIT_SEL)?;

        email_field.type_into(&creds.email)?;
        password_field.type_into(&creds.password)?;
        submit.click()?;

        thread::sleep(LOGIN_SETTLE);
        Ok(())
    }

    /// Site-reported total from the review-count heading.
    fn total_review_count(&self, tab: &Tab) -> Result<usize> {
        let heading = tab
            .find_element(REVIEW_COUNT_SEL)?
            .get_inner_text()?;
        parse_review_total(&heading).ok_or(CrawlError::ReviewCount(heading))
    }
}

impl ReviewCrawler for GlassdoorClient {
    fn review_blocks<'a>(&self, tab: &'a Tab) -> Result<Vec<Element<'a>>> {
        // An empty page surfaces as a query error; fold it into the empty
        // case so the reload-retry path governs it.
        Ok(tab.find_elements(REVIEW_SEL).unwrap_or_default())
    }

    fn capture(&self, review: &Element) -> Capture {
        if review.find_element(FEATURED_SEL).is_ok() {
            return Capture::Featured;
        }
        let author = match review.find_element(AUTHOR_INFO_SEL) {
            Ok(author) => author,
            Err(_) => return Capture::Blocked,
        };
        // Rating, anonymity and the location gate all read the container
        // text as first rendered, before any expansion.
        let full_text = match review.get_inner_text() {
            Ok(text) => text,
            Err(_) => return Capture::Blocked,
        };

        // Unfold the body before reading it; absent control or a failed
        // click leaves the body as-is.
        if let Ok(body) = review.find_element(BODY_SEL) {
            if let Ok(more) = body.find_element(SHOW_MORE_SEL) {
                let _ = more.click();
            }
        }

        let title_link = review.find_element(TITLE_LINK_SEL).ok();

        Capture::Review(ReviewSource {
            full_text,
            author_title: element_text(author.find_element(AUTHOR_TITLE_SEL)),
            author_location: element_text(author.find_element(AUTHOR_LOCATION_SEL)),
            title_text: title_link.as_ref().and_then(|el| el.get_inner_text().ok()),
            title_href: title_link
                .as_ref()
                .and_then(|el| el.get_attribute_value("href").ok().flatten()),
            body_text: element_text(review.find_element(BODY_SEL)),
            footer_text: element_text(review.find_element(FOOTER_SEL)),
        })
    }

    fn current_page(&self, tab: &Tab) -> Result<u32> {
        let text = tab.find_element(SELECTED_PAGE_SEL)?.get_inner_text()?;
        text.trim()
            .parse()
            .map_err(|_| CrawlError::Pager(text))
    }

    fn has_more_pages(&self, tab: &Tab) -> bool {
        let current = self.current_page(tab);
        let listing = tab
            .find_element(PAGE_LIST_SEL)
            .and_then(|el| el.get_inner_text());
        match (current, listing) {
            (Ok(current), Ok(listing)) => {
                last_listed_page(&listing).is_some_and(|last| last != current)
            }
            _ => false,
        }
    }

    fn advance_page(&self, tab: &Tab) -> Result<()> {
        tab.find_element(NEXT_BUTTON_SEL)?.click()?;
        thread::sleep(PAGE_SETTLE);
        Ok(())
    }
}

impl Crawler for GlassdoorClient {
    fn start_crawl(&self) -> Result<RunSummary> {
        self.crawl()
    }
}

fn element_text(found: anyhow::Result<Element<'_>>) -> Option<String> {
    found.ok().and_then(|el| el.get_inner_text().ok())
}

/// Highest page number shown by the page-number listing.
fn last_listed_page(listing: &str) -> Option<u32> {
    listing.split_whitespace().last()?.parse().ok()
}

/// The count lives in whitespace token 4 of the heading and may use a
/// `k` abbreviation: `1.5k` reads as 1500, `10k` as 10000.
fn parse_review_total(heading: &str) -> Option<usize> {
    let token = heading.split_whitespace().nth(4)?.to_lowercase();
    let token = token.replace(',', "");
    let expanded = match token.strip_suffix('k') {
        Some(prefix) if prefix.contains('.') => format!("{}00", prefix.replace('.', "")),
        Some(prefix) => format!("{}000", prefix),
        None => token,
    };
    expanded.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_total_expands_k_abbreviations() {
        assert_eq!(parse_review_total("Showing 10 of over 10k reviews"), Some(10_000));
        assert_eq!(parse_review_total("Showing 10 of over 1.5k reviews"), Some(1_500));
        assert_eq!(parse_review_total("Showing 10 of over 2,340 reviews"), Some(2_340));
    }

    #[test]
    fn review_total_missing_on_short_or_garbled_heading() {
        assert_eq!(parse_review_total("too short"), None);
        assert_eq!(parse_review_total("Showing 10 of over many reviews"), None);
    }

    #[test]
    fn last_listed_page_reads_the_trailing_number() {
        assert_eq!(last_listed_page("1 2 3 4 87"), Some(87));
        assert_eq!(last_listed_page("1"), Some(1));
        assert_eq!(last_listed_page("1 2 Next"), None);
        assert_eq!(last_listed_page(""), None);
    }

    #[test]
    fn sort_orders_map_to_query_filters() {
        assert_eq!(SortOrder::Popular.query_filter(), "?filter.iso3Language=eng");
        assert!(SortOrder::LowestRated.query_filter().contains("ascending=true"));
        assert!(SortOrder::HighestRated.query_filter().contains("ascending=false"));
    }
}
