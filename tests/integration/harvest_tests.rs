//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a small fake catalog and run the
//! crawl and reconcile steps end-to-end against a SQLite file.

use catalog_harvest::config::{CatalogConfig, Config, HttpConfig, RateLimitConfig, StorageConfig};
use catalog_harvest::crawler::{crawl, PageFetcher};
use catalog_harvest::harvest::{harvest_with, run_harvest};
use catalog_harvest::storage::{SqliteStorage, Storage};
use catalog_harvest::{CatalogCursor, HarvestError, Item};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(server_uri: &str, start: u32, end: u32, db_path: &Path) -> Config {
    Config {
        catalog: CatalogConfig {
            base_url: format!("{}/catalogue/page-", server_uri),
            page_suffix: ".html".to_string(),
            default_page_limit: 100,
            start_page: start,
            end_page: end,
        },
        rate_limit: RateLimitConfig {
            interval_ms: 5, // Very short for testing
            max_delay_ms: 10,
        },
        http: HttpConfig {
            timeout_secs: 5,
            connect_timeout_secs: 2,
        },
        storage: StorageConfig {
            database_path: db_path.display().to_string(),
        },
    }
}

fn rating_label(rating: u8) -> &'static str {
    match rating {
        1 => "One",
        2 => "Two",
        3 => "Three",
        4 => "Four",
        5 => "Five",
        _ => "Zero",
    }
}

/// Renders a listing page the way the catalog site does
fn catalog_page(page: u32, total: u32, items: &[Item]) -> String {
    let pods: String = items
        .iter()
        .map(|item| {
            format!(
                r#"<li><article class="product_pod">
                    <p class="star-rating {}"><i class="icon-star"></i></p>
                    <h3><a href="../item/index.html" title="{}">{}</a></h3>
                    <div class="product_price"><p class="price_color">{}</p></div>
                </article></li>"#,
                rating_label(item.rating),
                item.title,
                item.title,
                item.price
            )
        })
        .collect();

    format!(
        r#"<html><head><title>All products</title></head><body>
        <ol class="row">{}</ol>
        <ul class="pager"><li class="current">
            Page {} of {}
        </li></ul>
        </body></html>"#,
        pods, page, total
    )
}

fn page_items(page: u32) -> Vec<Item> {
    (1..=3)
        .map(|n| Item::new(format!("Book {}-{}", page, n), format!("£{}.{}0", page * 10, n), n as u8))
        .collect()
}

async fn mount_page(server: &MockServer, page: u32, total: u32, items: &[Item]) {
    Mock::given(method("GET"))
        .and(path(format!("/catalogue/page-{}.html", page)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(catalog_page(page, total, items))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, page: u32, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/catalogue/page-{}.html", page)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_harvest_and_idempotent_rerun() {
    let mock_server = MockServer::start().await;
    for page in 1..=3 {
        mount_page(&mock_server, page, 3, &page_items(page)).await;
    }

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.db");
    let config = create_test_config(&mock_server.uri(), 1, 3, &db_path);
    let mut storage = SqliteStorage::new(&db_path).expect("Failed to open store");

    let summary = run_harvest(&config, &mut storage)
        .await
        .expect("Harvest failed");

    assert_eq!(summary.pages_attempted, 3);
    assert_eq!(summary.pages_skipped(), 0);
    assert_eq!(summary.discovered_page_limit, Some(3));
    assert_eq!(summary.items_scraped, 9);

    let reconciled = summary.reconcile.as_ref().expect("Reconcile did not run");
    assert_eq!(reconciled.inserted, 9);
    assert_eq!(reconciled.updated, 0);
    assert!(summary.is_clean());
    assert_eq!(storage.count_items().unwrap(), 9);

    // Same catalog again: nothing to write
    mock_server.reset().await;
    for page in 1..=3 {
        mount_page(&mock_server, page, 3, &page_items(page)).await;
    }

    let rerun = run_harvest(&config, &mut storage).await.unwrap();
    let reconciled = rerun.reconcile.expect("Reconcile did not run");

    assert_eq!(reconciled.attempted, 0);
    assert_eq!(reconciled.inserted, 0);
    assert_eq!(reconciled.updated, 0);
    assert_eq!(reconciled.unchanged, 9);
    assert_eq!(storage.count_items().unwrap(), 9);
}

#[tokio::test]
async fn test_changed_price_is_updated() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        1,
        1,
        &[Item::new("A", "£10", 3), Item::new("C", "£30", 1)],
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.db");
    let config = create_test_config(&mock_server.uri(), 1, 1, &db_path);
    let mut storage = SqliteStorage::new(&db_path).unwrap();

    run_harvest(&config, &mut storage).await.unwrap();

    mock_server.reset().await;
    mount_page(
        &mock_server,
        1,
        1,
        &[
            Item::new("A", "£12", 3),
            Item::new("B", "£20", 2),
            Item::new("C", "£30", 1),
        ],
    )
    .await;

    let summary = run_harvest(&config, &mut storage).await.unwrap();
    let reconciled = summary.reconcile.unwrap();

    assert_eq!(reconciled.updated, 1);
    assert_eq!(reconciled.inserted, 1);
    assert_eq!(reconciled.unchanged, 1);

    let stored = storage.find_by_titles(&["A"]).unwrap();
    assert_eq!(stored, vec![Item::new("A", "£12", 3)]);
}

#[tokio::test]
async fn test_failed_page_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 1, 3, &page_items(1)).await;
    mount_status(&mock_server, 2, 500).await;
    mount_page(&mock_server, 3, 3, &page_items(3)).await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), 1, 3, &dir.path().join("c.db"));
    let fetcher = PageFetcher::from_config(&config).unwrap();

    let report = crawl(&fetcher, CatalogCursor::default(), 1, 3)
        .await
        .expect("Crawl should not fail on a page error");

    let mut expected = page_items(1);
    expected.extend(page_items(3));
    assert_eq!(report.items, expected);

    assert_eq!(report.pages_attempted, 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].page, 2);
    assert!(matches!(
        report.skipped[0].error,
        HarvestError::HttpStatus { status: 500, .. }
    ));
}

#[tokio::test]
async fn test_unparseable_page_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 1, 2, &page_items(1)).await;
    Mock::given(method("GET"))
        .and(path("/catalogue/page-2.html"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Maintenance</body></html>"),
        )
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.db");
    let config = create_test_config(&mock_server.uri(), 1, 2, &db_path);
    let mut storage = SqliteStorage::new(&db_path).unwrap();

    let summary = run_harvest(&config, &mut storage).await.unwrap();

    assert_eq!(summary.items_scraped, 3);
    assert_eq!(summary.skipped_pages.len(), 1);
    assert_eq!(summary.skipped_pages[0].page, 2);
    assert!(summary.skipped_pages[0].reason.contains("parse"));
    assert_eq!(summary.reconcile.unwrap().inserted, 3);
}

#[tokio::test]
async fn test_page_without_pager_skipped_during_discovery() {
    let mock_server = MockServer::start().await;
    let pods = catalog_page(1, 1, &page_items(1));
    let without_pager = pods.replace(r#"<li class="current">"#, r#"<li class="next">"#);
    Mock::given(method("GET"))
        .and(path("/catalogue/page-1.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(without_pager))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), 1, 1, &dir.path().join("c.db"));
    let fetcher = PageFetcher::from_config(&config).unwrap();

    let report = crawl(&fetcher, CatalogCursor::default(), 1, 1)
        .await
        .unwrap();

    assert!(report.items.is_empty());
    assert!(!report.cursor.is_known());
    assert_eq!(report.skipped.len(), 1);
    assert!(matches!(report.skipped[0].error, HarvestError::Parse { .. }));
}

#[tokio::test]
async fn test_page_limit_discovered_once() {
    let mock_server = MockServer::start().await;
    // Page 1 fails, so page 2 is the first to report the size
    mount_status(&mock_server, 1, 503).await;
    mount_page(&mock_server, 2, 3, &page_items(2)).await;
    // A later page claiming a different size must not move the cursor
    mount_page(&mock_server, 3, 9, &page_items(3)).await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), 1, 3, &dir.path().join("c.db"));
    let fetcher = PageFetcher::from_config(&config).unwrap();

    let report = crawl(&fetcher, CatalogCursor::default(), 1, 3)
        .await
        .unwrap();

    assert!(report.cursor.is_known());
    assert_eq!(report.cursor.page_limit(), 3);
    assert_eq!(report.items.len(), 6);
}

#[tokio::test]
async fn test_pages_past_real_limit_fail_as_fetch_errors() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 1, 2, &page_items(1)).await;
    mount_page(&mock_server, 2, 2, &page_items(2)).await;
    // Pages 3 and 4 do not exist; wiremock answers 404

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), 1, 4, &dir.path().join("c.db"));
    let fetcher = PageFetcher::from_config(&config).unwrap();

    let report = crawl(&fetcher, CatalogCursor::default(), 1, 4)
        .await
        .unwrap();

    assert_eq!(report.cursor.page_limit(), 2);
    assert_eq!(report.pages_attempted, 4);
    assert_eq!(report.items.len(), 6);
    assert_eq!(
        report.skipped.iter().map(|s| s.page).collect::<Vec<_>>(),
        vec![3, 4]
    );
    assert!(report.skipped.iter().all(|s| s.error.is_fetch_error()));
}

#[tokio::test]
async fn test_start_past_known_limit_issues_no_requests() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), 5, 10, &dir.path().join("c.db"));
    let fetcher = PageFetcher::from_config(&config).unwrap();

    let report = crawl(&fetcher, CatalogCursor::known(3), 5, 10)
        .await
        .unwrap();

    assert!(report.items.is_empty());
    assert_eq!(report.pages_attempted, 0);
}

#[tokio::test]
async fn test_harvest_with_shared_fetcher() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 1, 1, &page_items(1)).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.db");
    let config = create_test_config(&mock_server.uri(), 1, 1, &db_path);
    let fetcher = PageFetcher::from_config(&config).unwrap();
    let mut storage = SqliteStorage::new(&db_path).unwrap();

    let summary = harvest_with(&fetcher, &config, &mut storage).await.unwrap();

    assert_eq!(summary.items_scraped, 3);
    assert_eq!(storage.count_items().unwrap(), 3);
}
