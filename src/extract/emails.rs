use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Lexical email pattern: `local-part@domain.tld`
///
/// No validation beyond the shape. Tokens such as `icon@2x.png` match too.
pub const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(EMAIL_PATTERN).expect("email pattern is valid");
}

/// Scans a text blob for email-like substrings
///
/// # Examples
///
/// ```
/// use mailsweep::extract::extract_emails;
///
/// let emails = extract_emails("write to contact@site.com or sales@site.com");
/// assert_eq!(emails.len(), 2);
/// assert!(emails.contains("contact@site.com"));
/// ```
pub fn extract_emails(text: &str) -> HashSet<String> {
    EMAIL_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
