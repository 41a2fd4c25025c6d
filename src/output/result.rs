use serde::Serialize;

/// Settings a crawl actually ran with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub concurrency: usize,
    pub max_pages: usize,
}

/// Immutable outcome of one crawl
///
/// Serialized verbatim by the HTTP server:
///
/// ```json
/// {
///   "domain": "https://example.com",
///   "pagesCrawled": 12,
///   "totalEmails": 2,
///   "emails": ["contact@example.com", "sales@example.com"],
///   "performance": { "concurrency": 3, "maxPages": 30 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// Normalized seed URL the crawl used
    pub domain: String,

    /// Number of visited pages at termination
    pub pages_crawled: usize,

    /// Number of distinct emails
    pub total_emails: usize,

    /// Distinct emails, sorted
    pub emails: Vec<String>,

    pub performance: Performance,

    /// Visited pages whose navigation failed
    #[serde(skip)]
    pub pages_failed: usize,
}

impl CrawlResult {
    /// Builds a result; emails are sorted and deduplicated
    pub fn new(
        domain: String,
        pages_crawled: usize,
        pages_failed: usize,
        mut emails: Vec<String>,
        performance: Performance,
    ) -> Self {
        emails.sort();
        emails.dedup();

        Self {
            domain,
            pages_crawled,
            total_emails: emails.len(),
            emails,
            performance,
            pages_failed,
        }
    }
}
