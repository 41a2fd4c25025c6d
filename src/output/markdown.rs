//! Markdown summary generation
//!
//! Writes a human-readable record of one crawl next to the JSON result.

use crate::output::CrawlResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary of a crawl result to `output_path`
pub fn generate_markdown_summary(result: &CrawlResult, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_markdown_summary(result);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl result as markdown
pub fn format_markdown_summary(result: &CrawlResult) -> String {
    let mut md = String::new();

    md.push_str("# Mailsweep Crawl Summary\n\n");

    md.push_str("## Crawl\n\n");
    md.push_str(&format!("- **Seed**: {}\n", result.domain));
    md.push_str(&format!(
        "- **Pages crawled**: {} of {} allowed\n",
        result.pages_crawled, result.performance.max_pages
    ));
    md.push_str(&format!("- **Failed navigations**: {}\n", result.pages_failed));
    md.push_str(&format!(
        "- **Concurrency**: {}\n\n",
        result.performance.concurrency
    ));

    md.push_str(&format!("## Emails ({})\n\n", result.total_emails));
    if result.emails.is_empty() {
        md.push_str("_No email addresses found._\n");
    } else {
        md.push_str("| # | Address |\n");
        md.push_str("|---|---------|\n");
        for (i, email) in result.emails.iter().enumerate() {
            md.push_str(&format!("| {} | {} |\n", i + 1, email));
        }
    }

    md
}
