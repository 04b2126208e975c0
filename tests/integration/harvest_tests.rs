//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to serve small quote sites and run the full
//! fetch → extract → paginate → write cycle against them.

use quote_harvest::config::{Config, ScraperConfig};
use quote_harvest::crawler::{collect_all, harvest_to_csv, Coordinator};
use quote_harvest::output::read_records;
use quote_harvest::{HarvestError, Record, StopReason};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server, with no delay
fn create_test_config(base_url: &str) -> Config {
    Config {
        scraper: ScraperConfig {
            start_url: format!("{}/", base_url),
            request_timeout_secs: 10,
            page_delay_ms: 0,
            max_pages: None,
        },
        ..Config::default()
    }
}

/// Renders one quote container the way the quote site does
fn quote_html(text: &str, author: &str, tags: &[&str]) -> String {
    let tag_links: String = tags
        .iter()
        .map(|t| format!(r#"<a class="tag" href="/tag/{t}/page/1/">{t}</a> "#))
        .collect();
    format!(
        r#"<div class="quote" itemscope itemtype="http://schema.org/CreativeWork">
        <span class="text" itemprop="text">{text}</span>
        <span>by <small class="author" itemprop="author">{author}</small>
        <a href="/author/{author}">(about)</a></span>
        <div class="tags">Tags: {tag_links}</div>
    </div>"#
    )
}

/// Renders a full listing page with an optional next link
fn page_html(quotes: &[String], next_href: Option<&str>) -> String {
    let pager = match next_href {
        Some(href) => format!(
            r#"<nav><ul class="pager"><li class="next"><a href="{href}">Next <span aria-hidden="true">&rarr;</span></a></li></ul></nav>"#
        ),
        None => String::new(),
    };
    format!(
        r#"<!DOCTYPE html><html lang="en"><head><title>Quotes to Scrape</title></head>
        <body><div class="container"><div class="row"><div class="col-md-8">
        {}
        {}
        </div></div></div></body></html>"#,
        quotes.join("\n"),
        pager
    )
}

fn empty_page_html() -> String {
    r#"<html><body><div class="col-md-8">No quotes found!
        <nav><ul class="pager"><li class="previous"><a href="/page/1/">Previous</a></li></ul></nav>
        </div></body></html>"#
        .to_string()
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_pages_keep_visitation_order() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        page_html(
            &[
                quote_html("P1Q1", "Author A", &["a"]),
                quote_html("P1Q2", "Author B", &[]),
            ],
            Some("/page/2/"),
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/page/2/",
        page_html(
            &[
                quote_html("P2Q1", "Author C", &["b", "c"]),
                quote_html("P2Q2", "Author A", &["a"]),
            ],
            None,
        ),
    )
    .await;

    let harvest = collect_all(create_test_config(&mock_server.uri()))
        .await
        .expect("Harvest failed");

    let texts: Vec<&str> = harvest.records.iter().map(|r| r.text()).collect();
    assert_eq!(texts, vec!["P1Q1", "P1Q2", "P2Q1", "P2Q2"]);
    assert_eq!(harvest.pages_visited, 2);
    assert_eq!(harvest.stop_reason, StopReason::LastPage);
    assert_eq!(harvest.records[2].tags(), &["b", "c"]);
}

#[tokio::test]
async fn test_empty_page_stops_harvest() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        page_html(&[quote_html("Q1", "A", &[])], Some("/page/2/")),
    )
    .await;
    mount_page(
        &mock_server,
        "/page/2/",
        page_html(&[quote_html("Q2", "B", &[])], Some("/page/3/")),
    )
    .await;

    // Page 3 is past the end of content, but still links onwards
    Mock::given(method("GET"))
        .and(path("/page/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "{}<li class=\"next\"><a href=\"/page/4/\">Next</a></li>",
            empty_page_html()
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(
            &[quote_html("never", "nobody", &[])],
            None,
        )))
        .expect(0) // Should never be called
        .mount(&mock_server)
        .await;

    let harvest = collect_all(create_test_config(&mock_server.uri()))
        .await
        .expect("Harvest failed");

    assert_eq!(harvest.records.len(), 2);
    assert_eq!(harvest.pages_visited, 3);
    assert_eq!(harvest.stop_reason, StopReason::EmptyPage);

    // Wiremock will automatically verify expect(0) when the mock server drops
}

#[tokio::test]
async fn test_empty_first_page_yields_nothing() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", empty_page_html()).await;

    let harvest = collect_all(create_test_config(&mock_server.uri()))
        .await
        .expect("Harvest failed");

    assert!(harvest.records.is_empty());
    assert_eq!(harvest.pages_visited, 1);
    assert_eq!(harvest.stop_reason, StopReason::EmptyPage);
}

#[tokio::test]
async fn test_single_page_scenario_writes_three_lines() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        page_html(
            &[
                quote_html("T1", "Auth1", &["love", "life"]),
                quote_html("T2", "Auth2", &[]),
            ],
            None,
        ),
    )
    .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output_path = dir.path().join("quotes.csv");

    let harvest = harvest_to_csv(create_test_config(&mock_server.uri()), &output_path)
        .await
        .expect("Harvest failed");
    assert_eq!(harvest.stop_reason, StopReason::LastPage);

    let content = std::fs::read_to_string(&output_path).expect("Failed to read CSV");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "text,author,tags");
    assert_eq!(lines[1], "T1,Auth1,\"love, life\"");
    assert_eq!(lines[2], "T2,Auth2,");
}

#[tokio::test]
async fn test_server_error_on_page_two_aborts_without_output() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        page_html(&[quote_html("Q1", "A", &["x"])], Some("/page/2/")),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output_path = dir.path().join("quotes.csv");

    let result = harvest_to_csv(create_test_config(&mock_server.uri()), &output_path).await;

    match result {
        Err(HarvestError::Fetch { url, status }) => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/page/2/"));
        }
        other => panic!("Expected fetch error, got {:?}", other),
    }
    assert!(!output_path.exists(), "No CSV should be written on failure");
}

#[tokio::test]
async fn test_not_found_start_page_is_fetch_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = collect_all(create_test_config(&mock_server.uri()))
        .await
        .expect_err("Harvest should fail");
    assert!(err.is_fetch_error());
    assert!(matches!(err, HarvestError::Fetch { status: 404, .. }));
}

#[tokio::test]
async fn test_request_timeout_is_fetch_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page_html(&[quote_html("slow", "A", &[])], None))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.scraper.request_timeout_secs = 1;

    let err = collect_all(config)
        .await
        .expect_err("Harvest should time out");
    assert!(matches!(err, HarvestError::Timeout { .. }));
    assert!(err.is_fetch_error());
}

#[tokio::test]
async fn test_malformed_container_is_extraction_error() {
    let mock_server = MockServer::start().await;

    let broken = r#"<div class="quote"><span class="text">no author here</span></div>"#;
    mount_page(
        &mock_server,
        "/",
        page_html(&[quote_html("ok", "A", &[]), broken.to_string()], None),
    )
    .await;

    let err = collect_all(create_test_config(&mock_server.uri()))
        .await
        .expect_err("Harvest should fail");
    assert!(matches!(err, HarvestError::Extraction { .. }));
    assert!(!err.is_fetch_error());
}

#[tokio::test]
async fn test_round_trip_through_csv() {
    let mock_server = MockServer::start().await;

    let page1: Vec<String> = (1..=10)
        .map(|i| quote_html(&format!("Quote {i}, with a comma"), &format!("Author {i}"), &["one", "two"]))
        .collect();
    let page2: Vec<String> = (11..=15)
        .map(|i| quote_html(&format!("Quote {i}"), &format!("Author {i}"), &[]))
        .collect();

    mount_page(&mock_server, "/", page_html(&page1, Some("/page/2/"))).await;
    mount_page(&mock_server, "/page/2/", page_html(&page2, None)).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output_path = dir.path().join("quotes.csv");

    let harvest = harvest_to_csv(create_test_config(&mock_server.uri()), &output_path)
        .await
        .expect("Harvest failed");

    let content = std::fs::read_to_string(&output_path).expect("Failed to read CSV");
    assert_eq!(content.lines().count(), 15 + 1);

    let read_back: Vec<Record> = read_records(&output_path).expect("Failed to read records");
    assert_eq!(read_back.len(), 15);
    assert_eq!(read_back, harvest.records);
    assert_eq!(read_back[0].tags(), &["one", "two"]);
    assert!(read_back[14].tags().is_empty());
}

#[tokio::test]
async fn test_page_limit_stops_early() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        page_html(&[quote_html("Q1", "A", &[])], Some("/page/2/")),
    )
    .await;
    mount_page(
        &mock_server,
        "/page/2/",
        page_html(&[quote_html("Q2", "B", &[])], Some("/page/3/")),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/page/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(
            &[quote_html("Q3", "C", &[])],
            None,
        )))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.scraper.max_pages = Some(2);

    let harvest = collect_all(config).await.expect("Harvest failed");

    assert_eq!(harvest.records.len(), 2);
    assert_eq!(harvest.pages_visited, 2);
    assert_eq!(harvest.stop_reason, StopReason::PageLimit);
}

#[tokio::test]
async fn test_path_relative_next_links_resolve_against_base() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        page_html(&[quote_html("Q1", "A", &[])], Some("page/2/")),
    )
    .await;
    mount_page(
        &mock_server,
        "/page/2/",
        page_html(&[quote_html("Q2", "B", &[])], Some("page/3/")),
    )
    .await;
    mount_page(
        &mock_server,
        "/page/3/",
        page_html(&[quote_html("Q3", "C", &[])], None),
    )
    .await;

    let harvest = collect_all(create_test_config(&mock_server.uri()))
        .await
        .expect("Harvest failed");

    let texts: Vec<&str> = harvest.records.iter().map(|r| r.text()).collect();
    assert_eq!(texts, vec!["Q1", "Q2", "Q3"]);
    assert_eq!(harvest.pages_visited, 3);
    assert_eq!(harvest.stop_reason, StopReason::LastPage);
}

#[tokio::test]
async fn test_extraction_error_names_failing_page() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        page_html(&[quote_html("Q1", "A", &[])], Some("/page/2/")),
    )
    .await;
    mount_page(
        &mock_server,
        "/page/2/",
        page_html(
            &[r#"<div class="quote"><small class="author">B</small></div>"#.to_string()],
            None,
        ),
    )
    .await;

    let err = collect_all(create_test_config(&mock_server.uri()))
        .await
        .expect_err("Harvest should fail");
    match err {
        HarvestError::Extraction { url, message } => {
            assert!(url.ends_with("/page/2/"), "unexpected url {}", url);
            assert!(message.contains("text"));
        }
        other => panic!("Expected extraction error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_next_link_back_to_visited_page_stops() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        page_html(&[quote_html("Q1", "A", &[])], Some("/page/2/")),
    )
    .await;
    mount_page(
        &mock_server,
        "/page/2/",
        page_html(&[quote_html("Q2", "B", &[])], Some("/")),
    )
    .await;

    let harvest = collect_all(create_test_config(&mock_server.uri()))
        .await
        .expect("Harvest failed");

    assert_eq!(harvest.records.len(), 2);
    assert_eq!(harvest.stop_reason, StopReason::LoopDetected);
}

#[tokio::test]
async fn test_page_delay_is_applied_between_pages() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        page_html(&[quote_html("Q1", "A", &[])], Some("/page/2/")),
    )
    .await;
    mount_page(
        &mock_server,
        "/page/2/",
        page_html(&[quote_html("Q2", "B", &[])], None),
    )
    .await;

    let mut config = create_test_config(&mock_server.uri());
    config.scraper.page_delay_ms = 200;

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let start = std::time::Instant::now();
    let harvest = coordinator.run().await.expect("Harvest failed");

    assert_eq!(harvest.records.len(), 2);
    assert!(start.elapsed() >= Duration::from_millis(200));
}
