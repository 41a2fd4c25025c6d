//! Markup scanning for engines that hand back raw HTML
//!
//! A browser answers `a[href]` queries with resolved URLs itself. The
//! built-in HTTP engine has no DOM, so it runs the same queries here.

use crate::url::resolve_href;
use scraper::{Html, Selector};
use url::Url;

/// Hyperlink and sub-resource targets found in a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMarkup {
    /// Absolute HTTP(S) anchor targets, in document order
    pub anchor_hrefs: Vec<String>,

    /// Raw `mailto:` hrefs
    pub mailto_targets: Vec<String>,

    /// Absolute `<script src>` URLs
    pub script_sources: Vec<String>,
}

/// Parses HTML and collects anchors, mailto hrefs and script sources
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` resolved against `base_url`
/// - `<a href="mailto:...">` as mailto targets
/// - `<script src="...">` resolved against `base_url`
///
/// **Exclude:**
/// - `javascript:`, `tel:`, `data:` and fragment-only anchors
/// - Anything that does not resolve to HTTP(S)
pub fn parse_markup(html: &str, base_url: &Url) -> ParsedMarkup {
    let document = Html::parse_document(html);
    let mut parsed = ParsedMarkup::default();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            let trimmed = href.trim();
            if trimmed
                .get(..7)
                .map(|scheme| scheme.eq_ignore_ascii_case("mailto:"))
                .unwrap_or(false)
            {
                parsed.mailto_targets.push(trimmed.to_string());
            } else if let Some(absolute_url) = resolve_href(trimmed, base_url) {
                parsed.anchor_hrefs.push(absolute_url);
            }
        }
    }

    if let Ok(script_selector) = Selector::parse("script[src]") {
        for element in document.select(&script_selector) {
            if let Some(absolute_url) = element
                .value()
                .attr("src")
                .and_then(|src| resolve_href(src, base_url))
            {
                parsed.script_sources.push(absolute_url);
            }
        }
    }

    parsed
}
