//! Integration tests for the crawler
//!
//! The first half drives the worker pool with a scripted in-memory engine
//! to check budget, deduplication, failure isolation and session cleanup.
//! The second half uses wiremock servers to run the HTTP engine end-to-end.

use async_trait::async_trait;
use mailsweep::config::{CrawlerConfig, RenderConfig};
use mailsweep::crawler::{crawl, Coordinator};
use mailsweep::render::{HttpEngine, RenderEngine, RenderSession, RenderedPage};
use mailsweep::{RenderError, SweepError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ===== Scripted engine =====

#[derive(Clone, Default)]
struct ScriptedPage {
    html: String,
    bodies: Vec<String>,
    links: Vec<String>,
    mailtos: Vec<String>,
    fail: bool,
    delay: Option<Duration>,
}

impl ScriptedPage {
    fn html(html: &str) -> Self {
        Self {
            html: html.to_string(),
            ..Self::default()
        }
    }

    fn linking(links: Vec<String>) -> Self {
        Self {
            links,
            ..Self::default()
        }
    }
}

#[derive(Default)]
struct SiteState {
    pages: HashMap<String, ScriptedPage>,
    navigations: Mutex<HashMap<String, usize>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
    fail_open_after: Option<usize>,
}

#[derive(Clone, Default)]
struct ScriptedEngine {
    site: Arc<SiteState>,
}

impl ScriptedEngine {
    fn new(pages: Vec<(&str, ScriptedPage)>) -> Self {
        Self::with_open_limit(pages, None)
    }

    fn with_open_limit(pages: Vec<(&str, ScriptedPage)>, fail_open_after: Option<usize>) -> Self {
        let site = SiteState {
            pages: pages
                .into_iter()
                .map(|(url, page)| (url.to_string(), page))
                .collect(),
            fail_open_after,
            ..SiteState::default()
        };
        Self {
            site: Arc::new(site),
        }
    }

    fn navigations(&self, url: &str) -> usize {
        self.site
            .navigations
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    fn max_navigations_per_url(&self) -> usize {
        self.site
            .navigations
            .lock()
            .unwrap()
            .values()
            .copied()
            .max()
            .unwrap_or(0)
    }

    fn total_navigations(&self) -> usize {
        self.site.navigations.lock().unwrap().values().sum()
    }

    fn opened(&self) -> usize {
        self.site.opened.load(Ordering::SeqCst)
    }

    fn closed(&self) -> usize {
        self.site.closed.load(Ordering::SeqCst)
    }
}

struct ScriptedSession {
    site: Arc<SiteState>,
}

#[async_trait]
impl RenderEngine for ScriptedEngine {
    async fn new_session(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        let opened = self.site.opened.load(Ordering::SeqCst);
        if let Some(limit) = self.site.fail_open_after {
            if opened >= limit {
                return Err(RenderError::Session("browser refused a new tab".to_string()));
            }
        }

        self.site.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            site: Arc::clone(&self.site),
        }))
    }
}

#[async_trait]
impl RenderSession for ScriptedSession {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<RenderedPage, RenderError> {
        *self
            .site
            .navigations
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        let Some(page) = self.site.pages.get(url).cloned() else {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                message: "HTTP 404".to_string(),
            });
        };

        if let Some(delay) = page.delay {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        if page.fail {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                message: "render crashed".to_string(),
            });
        }

        Ok(RenderedPage {
            url: url.to_string(),
            html: page.html,
            response_bodies: page.bodies,
            anchor_hrefs: page.links,
            mailto_targets: page.mailtos,
        })
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        self.site.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn options(max_pages: usize, concurrency: usize) -> CrawlerConfig {
    CrawlerConfig {
        max_pages,
        concurrency,
        navigation_timeout_ms: 2_000,
    }
}

/// Site where every page links to every other page
fn dense_site(pages: usize) -> Vec<(String, ScriptedPage)> {
    let urls: Vec<String> = (0..pages)
        .map(|i| {
            if i == 0 {
                "https://dense.test".to_string()
            } else {
                format!("https://dense.test/p{}", i)
            }
        })
        .collect();

    urls.iter()
        .enumerate()
        .map(|(i, url)| {
            let mut page = ScriptedPage::linking(urls.clone());
            page.html = format!("<p>person{}@dense.test and shared@dense.test</p>", i);
            (url.clone(), page)
        })
        .collect()
}

fn as_refs(pages: &[(String, ScriptedPage)]) -> Vec<(&str, ScriptedPage)> {
    pages
        .iter()
        .map(|(url, page)| (url.as_str(), page.clone()))
        .collect()
}

// ===== Scripted engine tests =====

#[tokio::test]
async fn test_emails_from_html_bodies_and_mailto_merge_once() {
    let mut seed = ScriptedPage::html("<p>Reach contact@site.com</p>");
    seed.bodies = vec![
        r#"{"sales":"sales@site.com","support":"contact@site.com"}"#.to_string(),
        "not json at all".to_string(),
    ];
    seed.mailtos = vec!["mailto:sales@site.com?subject=Hi".to_string()];
    let engine = ScriptedEngine::new(vec![("https://site.com", seed)]);

    let result = crawl(&engine, "site.com", options(10, 3)).await.unwrap();

    assert_eq!(result.domain, "https://site.com");
    assert_eq!(result.pages_crawled, 1);
    assert_eq!(result.emails, vec!["contact@site.com", "sales@site.com"]);
    assert_eq!(result.total_emails, 2);
}

#[tokio::test]
async fn test_budget_of_one_visits_only_seed() {
    let links = (0..10)
        .map(|i| format!("https://example.com/page{}", i))
        .collect();
    let mut pages = vec![("https://example.com", ScriptedPage::linking(links))];
    let child_urls: Vec<String> = (0..10)
        .map(|i| format!("https://example.com/page{}", i))
        .collect();
    for url in &child_urls {
        pages.push((url.as_str(), ScriptedPage::html("<p>child@example.com</p>")));
    }
    let engine = ScriptedEngine::new(pages);

    let coordinator = Coordinator::new("example.com", options(1, 3)).unwrap();
    let frontier = coordinator.frontier();
    let result = coordinator.run(&engine).await.unwrap();

    assert_eq!(result.pages_crawled, 1);
    assert_eq!(engine.total_navigations(), 1);
    assert_eq!(frontier.pending_count(), 0);
    assert!(result.emails.is_empty());
}

#[tokio::test]
async fn test_seed_timeout_yields_empty_result() {
    let mut seed = ScriptedPage::html("<p>late@slow.test</p>");
    seed.delay = Some(Duration::from_secs(5));
    let engine = ScriptedEngine::new(vec![("https://slow.test", seed)]);

    let options = CrawlerConfig {
        max_pages: 10,
        concurrency: 2,
        navigation_timeout_ms: 100,
    };
    let result = crawl(&engine, "slow.test", options).await.unwrap();

    assert_eq!(result.pages_crawled, 1);
    assert!(result.emails.is_empty());
    assert_eq!(result.pages_failed, 1);
    assert_eq!(engine.closed(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dense_site_visits_each_page_once() {
    let site = dense_site(12);
    let engine = ScriptedEngine::new(as_refs(&site));

    let result = crawl(&engine, "https://dense.test", options(50, 8))
        .await
        .unwrap();

    assert_eq!(result.pages_crawled, 12);
    assert_eq!(engine.max_navigations_per_url(), 1);
    assert_eq!(engine.total_navigations(), 12);
    // 12 personal addresses plus the shared one
    assert_eq!(result.total_emails, 13);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_budget_caps_pages_crawled() {
    let site = dense_site(20);
    let engine = ScriptedEngine::new(as_refs(&site));

    let result = crawl(&engine, "https://dense.test", options(5, 4))
        .await
        .unwrap();

    assert_eq!(result.pages_crawled, 5);
    assert!(engine.total_navigations() <= 5);
    assert_eq!(result.performance.max_pages, 5);
}

#[tokio::test]
async fn test_chain_is_followed_to_the_end() {
    // Only one page is ever available at a time; idle workers must wait
    // rather than exit while the current page may still add links.
    let engine = ScriptedEngine::new(vec![
        (
            "https://chain.test",
            ScriptedPage::linking(vec!["https://chain.test/1".to_string()]),
        ),
        (
            "https://chain.test/1",
            ScriptedPage::linking(vec!["https://chain.test/2".to_string()]),
        ),
        (
            "https://chain.test/2",
            ScriptedPage::linking(vec!["https://chain.test/3".to_string()]),
        ),
        ("https://chain.test/3", ScriptedPage::html("<p>end@chain.test</p>")),
    ]);

    let result = crawl(&engine, "chain.test", options(30, 4)).await.unwrap();

    assert_eq!(result.pages_crawled, 4);
    assert_eq!(result.emails, vec!["end@chain.test"]);
}

#[tokio::test]
async fn test_off_origin_links_are_not_followed() {
    let engine = ScriptedEngine::new(vec![
        (
            "https://home.test",
            ScriptedPage::linking(vec![
                "https://home.test/about".to_string(),
                "https://other.test/x".to_string(),
            ]),
        ),
        ("https://home.test/about", ScriptedPage::html("<p>me@home.test</p>")),
        ("https://other.test/x", ScriptedPage::html("<p>them@other.test</p>")),
    ]);

    let result = crawl(&engine, "home.test", options(30, 2)).await.unwrap();

    assert_eq!(result.pages_crawled, 2);
    assert_eq!(result.emails, vec!["me@home.test"]);
    assert_eq!(engine.navigations("https://other.test/x"), 0);
}

#[tokio::test]
async fn test_failed_pages_are_isolated() {
    let mut broken = ScriptedPage::html("<p>never@mixed.test</p>");
    broken.fail = true;
    let engine = ScriptedEngine::new(vec![
        (
            "https://mixed.test",
            ScriptedPage::linking(vec![
                "https://mixed.test/broken".to_string(),
                "https://mixed.test/missing".to_string(),
                "https://mixed.test/ok".to_string(),
            ]),
        ),
        ("https://mixed.test/broken", broken),
        ("https://mixed.test/ok", ScriptedPage::html("<p>ok@mixed.test</p>")),
    ]);

    let result = crawl(&engine, "mixed.test", options(30, 3)).await.unwrap();

    assert_eq!(result.pages_crawled, 4);
    assert_eq!(result.pages_failed, 2);
    assert_eq!(result.emails, vec!["ok@mixed.test"]);
    // A failed URL is visited, never retried
    assert_eq!(engine.navigations("https://mixed.test/broken"), 1);
    assert_eq!(engine.opened(), 3);
    assert_eq!(engine.closed(), 3);
}

#[tokio::test]
async fn test_session_open_failure_closes_opened_sessions() {
    let engine = ScriptedEngine::with_open_limit(
        vec![("https://tabs.test", ScriptedPage::html("<p>x@tabs.test</p>"))],
        Some(2),
    );

    let result = crawl(&engine, "tabs.test", options(10, 4)).await;

    assert!(matches!(result, Err(SweepError::Render(RenderError::Session(_)))));
    assert_eq!(engine.opened(), 2);
    assert_eq!(engine.closed(), 2);
    assert_eq!(engine.total_navigations(), 0);
}

#[tokio::test]
async fn test_stopped_crawl_returns_partial_result() {
    let engine = ScriptedEngine::new(vec![(
        "https://stop.test",
        ScriptedPage::html("<p>x@stop.test</p>"),
    )]);

    let coordinator = Coordinator::new("stop.test", options(10, 2)).unwrap();
    coordinator.frontier().shutdown();
    let result = coordinator.run(&engine).await.unwrap();

    assert_eq!(result.pages_crawled, 0);
    assert!(result.emails.is_empty());
    assert_eq!(engine.closed(), 2);
}

#[tokio::test]
async fn test_empty_seed_is_rejected_before_any_session() {
    let engine = ScriptedEngine::new(vec![]);

    let result = crawl(&engine, "", options(10, 2)).await;

    assert!(matches!(result, Err(SweepError::Url(_))));
    assert_eq!(engine.opened(), 0);
}

// ===== HTTP engine tests =====

fn http_engine() -> HttpEngine {
    HttpEngine::new(&RenderConfig::default()).expect("Failed to build engine")
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(format!(
            r#"<html><head><script src="/app.js"></script></head><body>
            <a href="/team">Team</a>
            <a href="{}/about">About</a>
            <a href="https://elsewhere.example/">Elsewhere</a>
            <a href="mailto:hello@shop.test?subject=Hi">Mail us</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/app.js"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"window.cfg = { support: "support@shop.test" };"#)
                .insert_header("content-type", "application/javascript"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/team"))
        .respond_with(html_response(format!(
            r#"<html><body><p>jane@shop.test</p><a href="{}/about">About</a></body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_response(
            r#"<html><body><p>Write to hello@shop.test</p></body></html>"#.to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = crawl(&http_engine(), &base_url, options(30, 3))
        .await
        .expect("Crawl failed");

    assert_eq!(result.domain, base_url);
    assert_eq!(result.pages_crawled, 3);
    assert_eq!(result.pages_failed, 0);
    assert_eq!(
        result.emails,
        vec!["hello@shop.test", "jane@shop.test", "support@shop.test"]
    );
}

#[tokio::test]
async fn test_http_errors_count_as_failed_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<a href="/gone">Gone</a><a href="/contact">Contact</a>"#.to_string(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html_response("<p>desk@shop.test</p>".to_string()))
        .mount(&mock_server)
        .await;

    let result = crawl(&http_engine(), &base_url, options(30, 2))
        .await
        .expect("Crawl failed");

    assert_eq!(result.pages_crawled, 3);
    assert_eq!(result.pages_failed, 1);
    assert_eq!(result.emails, vec!["desk@shop.test"]);
}

#[tokio::test]
async fn test_unreadable_response_body_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<script src="/broken.js"></script><script src="/binary.js"></script>
            <script src="/data.js"></script><p>front@shop.test</p>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken.js"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/binary.js"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe, 0x00, 0x80]))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"var m = "data@shop.test";"#))
        .mount(&mock_server)
        .await;

    let result = crawl(&http_engine(), &base_url, options(5, 1))
        .await
        .expect("Crawl failed");

    assert_eq!(result.pages_failed, 0);
    assert_eq!(result.emails, vec!["data@shop.test", "front@shop.test"]);
}

#[tokio::test]
async fn test_latin1_pages_are_decoded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let mut seed = b"<html><body><p>Caf\xE9 contact@cafe.test</p>".to_vec();
    seed.extend_from_slice(b"<a href=\"/team\">\xC9quipe</a></body></html>");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(seed, "text/html; charset=iso-8859-1"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/team"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            b"<p>\xC9quipe: team@cafe.test</p>".to_vec(),
            "text/html; charset=iso-8859-1",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = crawl(&http_engine(), &base_url, options(10, 2))
        .await
        .expect("Crawl failed");

    assert_eq!(result.pages_crawled, 2);
    assert_eq!(result.pages_failed, 0);
    assert_eq!(result.emails, vec!["contact@cafe.test", "team@cafe.test"]);
}

#[tokio::test]
async fn test_uppercase_scheme_seed_follows_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let shouted_seed = base_url.replacen("http://", "HTTP://", 1);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(r#"<a href="/contact">Contact</a>"#.to_string()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html_response("<p>desk@shop.test</p>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = crawl(&http_engine(), &shouted_seed, options(10, 2))
        .await
        .expect("Crawl failed");

    assert_eq!(result.domain, base_url);
    assert_eq!(result.pages_crawled, 2);
    assert_eq!(result.emails, vec!["desk@shop.test"]);
}

#[tokio::test]
async fn test_subresource_cap_limits_script_captures() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<script src="/first.js"></script><script src="/second.js"></script>"#.to_string(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/first.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#""first@shop.test""#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/second.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#""second@shop.test""#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = RenderConfig {
        max_subresources: 1,
        ..RenderConfig::default()
    };
    let engine = HttpEngine::new(&config).expect("Failed to build engine");

    let result = crawl(&engine, &base_url, options(5, 1))
        .await
        .expect("Crawl failed");

    assert_eq!(result.emails, vec!["first@shop.test"]);
}

#[tokio::test]
async fn test_blocked_script_type_is_not_captured() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<script src="/app.js"></script><p>page@shop.test</p>"#.to_string(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/app.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#""js@shop.test""#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = RenderConfig {
        blocked_resource_types: vec!["script".to_string()],
        ..RenderConfig::default()
    };
    let engine = HttpEngine::new(&config).expect("Failed to build engine");

    let result = crawl(&engine, &base_url, options(5, 1))
        .await
        .expect("Crawl failed");

    assert_eq!(result.emails, vec!["page@shop.test"]);
}

#[tokio::test]
async fn test_http_seed_timeout() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            html_response("<p>late@shop.test</p>".to_string()).set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let options = CrawlerConfig {
        max_pages: 10,
        concurrency: 3,
        navigation_timeout_ms: 200,
    };
    let result = crawl(&http_engine(), &base_url, options)
        .await
        .expect("Crawl failed");

    assert_eq!(result.pages_crawled, 1);
    assert_eq!(result.pages_failed, 1);
    assert!(result.emails.is_empty());
}
