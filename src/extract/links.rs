use crate::render::RenderedPage;
use crate::url::is_same_origin;
use std::collections::HashSet;

const MAILTO_SCHEME: &str = "mailto:";

/// Returns the page's anchor targets that fall under `origin_prefix`
///
/// Mailto targets are not links; they are routed to the email set through
/// [`extract_mailto_targets`] instead.
pub fn extract_links(page: &RenderedPage, origin_prefix: &str) -> HashSet<String> {
    page.anchor_hrefs
        .iter()
        .filter(|href| is_same_origin(href, origin_prefix))
        .cloned()
        .collect()
}

/// Strips `mailto:` hrefs down to their recipient addresses
///
/// Accepts either raw `mailto:` hrefs or targets already stripped by the
/// render engine. Query parameters (`?subject=...`) are dropped and
/// comma-separated recipients are split.
///
/// # Examples
///
/// ```
/// use mailsweep::extract::extract_mailto_targets;
///
/// let targets = extract_mailto_targets(["mailto:sales@site.com?subject=Hi"]);
/// assert!(targets.contains("sales@site.com"));
/// ```
pub fn extract_mailto_targets<I, S>(hrefs: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut targets = HashSet::new();

    for href in hrefs {
        let href = href.as_ref().trim();
        let target = match href.get(..MAILTO_SCHEME.len()) {
            Some(scheme) if scheme.eq_ignore_ascii_case(MAILTO_SCHEME) => {
                &href[MAILTO_SCHEME.len()..]
            }
            _ => href,
        };

        let recipients = target.split('?').next().unwrap_or_default();
        for recipient in recipients.split(',') {
            let recipient = recipient.trim();
            if !recipient.is_empty() {
                targets.insert(recipient.to_string());
            }
        }
    }

    targets
}
