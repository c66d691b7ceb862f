//! Field extraction over the rendered text of one review card.
//!
//! Every field is derived by anchor search and splitting; a failed lookup
//! makes that field missing without touching the rest of the record.

use crate::models::Review;

const PROS_LABEL: &str = "\nPros";
const CONS_LABEL: &str = "\nCons";
const ADVICE_BOUNDARY: &str = "\nAdvice to Management";
const ADVICE_ANCHOR: &str = "Advice to Management";
const ANONYMOUS_MARKER: &str = "Anonymous Employee";

/// Text captured from one review container before extraction. Sub-texts
/// are `None` when the element was absent on the page.
#[derive(Debug, Clone, Default)]
pub struct ReviewSource {
    /// Rendered text of the whole container, read before any expansion.
    pub full_text: String,
    /// The author title/date compound, e.g. `"Mar 3, 2021 - Engineer"`.
    pub author_title: Option<String>,
    pub author_location: Option<String>,
    /// Display text of the review title link.
    pub title_text: Option<String>,
    /// Target URL of the review title link.
    pub title_href: Option<String>,
    /// Rendered text of the review body, read after show-more expansion.
    pub body_text: Option<String>,
    /// Rendered text of the helpful/social footer.
    pub footer_text: Option<String>,
}

/// Build the full record; one extractor per field, each failing alone.
pub fn extract_review(src: &ReviewSource) -> Review {
    Review {
        review_id: review_id(src),
        date: review_date(src),
        employee_title: employee_title(src),
        location: location(src),
        review_title: review_title(src),
        overall_rating: overall_rating(src),
        pros: pros(src),
        cons: cons(src),
        advice: advice(src),
    }
}

/// Portion of the author compound before the first `-`, commas removed.
pub fn review_date(src: &ReviewSource) -> Option<String> {
    let compound = src.author_title.as_deref()?;
    let (date, _) = compound.split_once('-')?;
    Some(date.replace(',', "").trim().to_string())
}

/// Second `-`-separated piece of the author compound, unless the card
/// belongs to an anonymous employee.
pub fn employee_title(src: &ReviewSource) -> Option<String> {
    if src.full_text.contains(ANONYMOUS_MARKER) {
        return Some("Anonymous".to_string());
    }
    let compound = src.author_title.as_deref()?;
    let title = compound.split('-').nth(1)?;
    Some(title.trim().to_string())
}

/// Line index 4 of the rendered text reads like "... in City" when a
/// location is present; only then is the location element consulted.
pub fn location(src: &ReviewSource) -> Option<String> {
    let line = src.full_text.lines().nth(4)?;
    if !line.contains("in") {
        return None;
    }
    Some(src.author_location.as_deref()?.trim().to_string())
}

/// Title-link text, stripped of whitespace and surrounding quotes.
pub fn review_title(src: &ReviewSource) -> Option<String> {
    let text = src.title_text.as_deref()?;
    Some(text.trim().trim_matches('"').to_string())
}

/// Trailing `-` token of the href's fifth path segment, up to `.htm`.
pub fn review_id(src: &ReviewSource) -> Option<String> {
    let href = src.title_href.as_deref()?;
    let segment = href.split('/').nth(4)?;
    let tail = segment.split('-').next_back()?;
    let id = &tail[..tail.find(".htm")?];
    Some(id.to_string())
}

/// First line of the rendered text parsed as a float.
pub fn overall_rating(src: &ReviewSource) -> Option<f64> {
    src.full_text.lines().next()?.trim().parse().ok()
}

/// Body substring strictly between the pros and cons labels.
pub fn pros(src: &ReviewSource) -> Option<String> {
    let body = src.body_text.as_deref()?;
    let start = body.find(PROS_LABEL)? + PROS_LABEL.len();
    let end = body.find(CONS_LABEL)?;
    body.get(start..end).map(|s| s.trim().to_string())
}

/// Body substring from after the cons label to the advice label, or to
/// the footer text's position when no advice section exists.
pub fn cons(src: &ReviewSource) -> Option<String> {
    let body = src.body_text.as_deref()?;
    let start = body.find(CONS_LABEL)? + CONS_LABEL.len();
    let end = match body.find(ADVICE_BOUNDARY) {
        Some(idx) => idx,
        None => {
            let footer = src.footer_text.as_deref()?;
            body.find(footer)?
        }
    };
    body.get(start..end).map(|s| s.trim().to_string())
}

/// Body substring from past the advice label to the footer text's
/// position. The skip is the label plus the one separator character
/// that follows it.
pub fn advice(src: &ReviewSource) -> Option<String> {
    let body = src.body_text.as_deref()?;
    let start = body.find(ADVICE_ANCHOR)? + ADVICE_ANCHOR.len() + 1;
    let footer = src.footer_text.as_deref()?;
    let end = body.find(footer)?;
    body.get(start..end).map(|s| s.trim().to_string())
}
