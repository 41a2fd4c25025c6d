//! Extraction of emails and links from page content
//!
//! Everything here is pure: no I/O, no shared state. The worker pool feeds
//! it rendered markup, captured response bodies and anchor targets.

mod emails;
mod links;
mod markup;

pub use emails::{extract_emails, EMAIL_PATTERN};
pub use links::{extract_links, extract_mailto_targets};
pub use markup::{parse_markup, ParsedMarkup};
