use thiserror::Error;

/// Run-level failures, kept distinct so callers can tell a dead browser
/// from a page the site simply renders differently.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("browser automation failed: {0}")]
    Browser(anyhow::Error),

    #[error("could not read the selected page indicator: {0:?}")]
    Pager(String),

    #[error("could not parse the total review count from {0:?}")]
    ReviewCount(String),

    #[error("login failed: {0}")]
    Login(String),

    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// headless_chrome surfaces anyhow::Error from every browser action.
impl From<anyhow::Error> for CrawlError {
    fn from(err: anyhow::Error) -> Self {
        CrawlError::Browser(err)
    }
}
