use crate::{UrlError, UrlResult};
use url::Url;

/// Schemes recognized at the start of a seed
const SCHEME_PREFIXES: &[&str] = &["http://", "https://"];

/// Normalizes user input into the absolute seed URL used for a crawl
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. If it already starts with `http://` or `https://` (any case), keep it
///    with the scheme lowercased
/// 3. Otherwise prefix `https://`
/// 4. Verify the result parses as an absolute HTTP(S) URL with a host
///
/// The returned string is exactly what the crawl uses as its origin prefix,
/// so no other canonicalization (trailing slash, case, query order) happens.
///
/// # Examples
///
/// ```
/// use mailsweep::url::normalize_seed;
///
/// assert_eq!(normalize_seed("example.com").unwrap(), "https://example.com");
/// assert_eq!(normalize_seed("http://example.com/").unwrap(), "http://example.com/");
/// ```
pub fn normalize_seed(input: &str) -> UrlResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let scheme = SCHEME_PREFIXES.iter().find(|prefix| {
        trimmed
            .get(..prefix.len())
            .map(|head| head.eq_ignore_ascii_case(prefix))
            .unwrap_or(false)
    });

    // Resolved links always carry a lowercase scheme
    let seed = match scheme {
        Some(prefix) => format!("{}{}", prefix, &trimmed[prefix.len()..]),
        None => format!("https://{}", trimmed),
    };

    let parsed = Url::parse(&seed).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(UrlError::InvalidScheme(parsed.scheme().to_string()));
    }

    if parsed.host_str().is_none() {
        return Err(UrlError::Parse(format!("{}: missing host", seed)));
    }

    Ok(seed)
}
