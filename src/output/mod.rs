//! Output module for crawl results
//!
//! This module handles:
//! - The serializable crawl result returned to callers
//! - Console and JSON rendering for the CLI
//! - Markdown summaries written to disk

mod markdown;
mod result;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use result::{CrawlResult, Performance};

/// Serializes a result as pretty-printed JSON
pub fn to_json(result: &CrawlResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Prints a result to stdout in a formatted manner
pub fn print_result(result: &CrawlResult) {
    println!("=== Crawl Result ===\n");

    println!("Overview:");
    println!("  Domain: {}", result.domain);
    println!(
        "  Pages crawled: {} (budget {})",
        result.pages_crawled, result.performance.max_pages
    );
    println!("  Pages failed: {}", result.pages_failed);
    println!("  Concurrency: {}", result.performance.concurrency);
    println!();

    println!("Emails ({}):", result.total_emails);
    if result.emails.is_empty() {
        println!("  (none found)");
    }
    for email in &result.emails {
        println!("  - {}", email);
    }
}
