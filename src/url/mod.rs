//! URL handling module for Mailsweep
//!
//! This module provides seed normalization, the same-origin filter, and
//! href resolution for engines that do not resolve links themselves.

mod normalize;
mod resolve;

// Re-export main functions
pub use normalize::normalize_seed;
pub use resolve::resolve_href;

/// Tests whether a discovered link belongs to the crawl
///
/// This is a plain string-prefix comparison against the seed URL, not an
/// authority comparison: `https://example.com.evil.com` passes for an
/// origin prefix of `https://example.com`.
///
/// # Examples
///
/// ```
/// use mailsweep::url::is_same_origin;
///
/// assert!(is_same_origin("https://example.com/about", "https://example.com"));
/// assert!(!is_same_origin("https://other.com/x", "https://example.com"));
/// ```
pub fn is_same_origin(link: &str, origin_prefix: &str) -> bool {
    link.starts_with(origin_prefix)
}
