//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end: real HTTP transport, real CSV file.

use quote_sieve::config::Config;
use quote_sieve::crawler::run_crawl;
use quote_sieve::output::FailureKind;
use quote_sieve::CrawlSummary;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, pages: u32, workers: usize, output: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.page_count = pages;
    config.crawler.worker_count = workers;
    config.crawler.fetch_timeout = Duration::from_secs(5);
    config.crawler.pacing_delay = Duration::from_millis(10); // Very short for testing
    config.source.url_template = format!("{}/page/{{}}/", base_url);
    config.output.path = output.to_path_buf();
    config
}

/// Renders a listing page in the quotes layout; tags are comma separated
fn listing_page(quotes: &[(&str, &str, &str)]) -> String {
    let blocks: String = quotes
        .iter()
        .map(|(text, author, tags)| {
            let tags: String = tags
                .split(',')
                .filter(|tag| !tag.is_empty())
                .map(|tag| format!(r#"<a class="tag" href="/tag/{0}/page/1/">{0}</a>"#, tag))
                .collect();
            format!(
                r#"<div class="quote" itemscope>
                    <span class="text" itemprop="text">{}</span>
                    <span>by <small class="author" itemprop="author">{}</small>
                    <a href="/author/x">(about)</a></span>
                    <div class="tags">Tags: {}</div>
                </div>"#,
                text, author, tags
            )
        })
        .collect();

    format!(
        r#"<html><head><title>Quotes to Scrape</title></head>
        <body><div class="container"><div class="row"><div class="col-md-8">{}</div></div></div></body></html>"#,
        blocks
    )
}

/// Mounts a 200 listing page at /page/{n}/
async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/page/{}/", page)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Runs the blocking crawl off the async test runtime
async fn crawl(config: Config) -> CrawlSummary {
    tokio::task::spawn_blocking(move || run_crawl(config))
        .await
        .expect("Crawl thread panicked")
        .expect("Crawl failed")
}

/// Reads the output file as (header, rows)
fn read_output(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open output");
    let header = reader
        .headers()
        .expect("Missing header")
        .iter()
        .map(String::from)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.expect("Bad row").iter().map(String::from).collect())
        .collect();
    (header, rows)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_duplicate_quote_written_once() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        listing_page(&[
            ("“First.”", "Ann", "one"),
            ("“Second.”", "Bob", "two,shared"),
            ("“Third.”", "Cy", ""),
        ]),
    )
    .await;
    mount_page(
        &mock_server,
        2,
        listing_page(&[
            ("“Fourth.”", "Dee", "four"),
            ("“First.”", "Ann", "one"),
            ("“Fifth.”", "Eve", "five"),
        ]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("quotes.csv");
    let config = create_test_config(&mock_server.uri(), 2, 5, &output);

    let summary = crawl(config).await;

    let (header, rows) = read_output(&output);
    assert_eq!(header, vec!["Quote", "Author", "Tags"]);
    assert_eq!(rows.len(), 5, "Expected 5 unique quotes, got {:?}", rows);

    let firsts = rows.iter().filter(|row| row[0] == "“First.”").count();
    assert_eq!(firsts, 1);

    let second = rows
        .iter()
        .find(|row| row[0] == "“Second.”")
        .expect("Missing second quote");
    assert_eq!(second[1], "Bob");
    assert_eq!(second[2], "two,shared");

    assert_eq!(summary.pages_processed, 2);
    assert_eq!(summary.records_extracted, 6);
    assert_eq!(summary.records_written, 5);
    assert_eq!(summary.duplicates_dropped, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_page_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, listing_page(&[("a", "A", "")])).await;
    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, 3, listing_page(&[("c", "C", "")])).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("quotes.csv");
    let config = create_test_config(&mock_server.uri(), 3, 2, &output);

    let summary = crawl(config).await;

    let (_, rows) = read_output(&output);
    let texts: BTreeSet<String> = rows.into_iter().map(|row| row[0].clone()).collect();
    assert_eq!(texts, BTreeSet::from(["a".to_string(), "c".to_string()]));

    assert_eq!(summary.pages_total, 3);
    assert_eq!(summary.pages_processed, 2);
    assert_eq!(summary.failures_of(FailureKind::HttpStatus), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_zero_pages_writes_header_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0) // Should never be called
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("quotes.csv");
    let config = create_test_config(&mock_server.uri(), 0, 5, &output);

    let summary = crawl(config).await;

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "Quote,Author,Tags\n"
    );
    assert_eq!(summary.pages_total, 0);
    assert_eq!(summary.records_written, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_more_workers_than_pages_fetch_each_page_once() {
    let mock_server = MockServer::start().await;

    for page in 1..=3 {
        let text = format!("quote {}", page);
        mount_page(&mock_server, page, listing_page(&[(text.as_str(), "A", "t")])).await;
    }

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("quotes.csv");
    let config = create_test_config(&mock_server.uri(), 3, 12, &output);

    let summary = crawl(config).await;

    // Each mock expects exactly one request; verified when mock_server drops
    assert_eq!(summary.pages_processed, 3);
    assert_eq!(read_output(&output).1.len(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_repeated_runs_produce_same_rows() {
    let mock_server = MockServer::start().await;

    for page in 1..=4u32 {
        // Consecutive pages overlap by two quotes
        let quotes: Vec<String> = (page..page + 3).map(|i| format!("quote {}", i)).collect();
        let body = listing_page(&[
            (quotes[0].as_str(), "A", "x"),
            (quotes[1].as_str(), "B", ""),
            (quotes[2].as_str(), "C", "y,z"),
        ]);
        Mock::given(method("GET"))
            .and(path(format!("/page/{}/", page)))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("quotes.csv");

    let first = crawl(create_test_config(&mock_server.uri(), 4, 3, &output)).await;
    let first_rows: BTreeSet<Vec<String>> = read_output(&output).1.into_iter().collect();

    // Same path: the second run must truncate the first run's output
    let second = crawl(create_test_config(&mock_server.uri(), 4, 3, &output)).await;
    let (_, second_rows) = read_output(&output);
    let second_len = second_rows.len();
    let second_rows: BTreeSet<Vec<String>> = second_rows.into_iter().collect();

    assert_eq!(first_rows, second_rows);
    assert_eq!(second_len, 6);
    assert_eq!(first.records_written, second.records_written);
    assert!(first.records_written <= first.records_extracted);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_slow_page_times_out_without_blocking_run() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, listing_page(&[("fast", "A", "")])).await;
    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&[("slow", "B", "")]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("quotes.csv");
    let mut config = create_test_config(&mock_server.uri(), 2, 2, &output);
    config.crawler.fetch_timeout = Duration::from_millis(300);

    let summary = crawl(config).await;

    let (_, rows) = read_output(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "fast");
    assert_eq!(summary.failures_of(FailureKind::Transport), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_page_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, listing_page(&[("kept", "A", "")])).await;
    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="quote"><span class="text">no author here</span></div>"#,
        ))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("quotes.csv");
    let config = create_test_config(&mock_server.uri(), 2, 2, &output);

    let summary = crawl(config).await;

    let (_, rows) = read_output(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(summary.failures_of(FailureKind::Extraction), 1);
}
