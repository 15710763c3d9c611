//! End-to-end harvest runs against a mock catalog site

use crate::common::*;
use catalog_harvest::crawler::{run_targets, Coordinator};
use catalog_harvest::output::CsvSink;
use catalog_harvest::{HarvestError, TargetState};
use tempfile::TempDir;
use wiremock::MockServer;

fn read_lines(dir: &TempDir, file: &str) -> Vec<String> {
    std::fs::read_to_string(dir.path().join(file))
        .expect("output file missing")
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_static_category_writes_csv() {
    let server = MockServer::start().await;
    mount_page(&server, "/more/", STATIC_CATEGORY).await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server, out.path().to_str().unwrap(), &[("home.csv", "more/")]);
    let renderer = ScriptedRenderer::new(true, 0, "");
    let sink = Box::new(CsvSink::new(out.path()));

    let report = run_targets(config, renderer.clone(), sink).await.unwrap();

    assert_eq!(report.total_records(), 3);
    assert!(report.is_success());
    assert_eq!(renderer.opened(), 0, "static page must not open a browser");

    let lines = read_lines(&out, "home.csv");
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], HEADER);
    assert_eq!(
        lines[1],
        r#"Asus VivoBook X441NA-GA190,"Asus VivoBook X441NA-GA190 Chocolate Black, 14"", Celeron N3450",295.99,3,14"#
    );
    assert_eq!(lines[2], r#"Kindle Fire HD 7,"Fire HD 7, 7"", 8GB, Black",109.99,1,10"#);
    assert_eq!(lines[3], "Nokia 123,7 day battery,24.99,4,0");
}

#[tokio::test]
async fn test_paginated_category_is_expanded() {
    let server = MockServer::start().await;
    mount_page(&server, "/more/computers/tablets", PAGINATED_CATEGORY).await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(
        &server,
        out.path().to_str().unwrap(),
        &[("tablets.csv", "more/computers/tablets")],
    );
    let renderer = ScriptedRenderer::new(true, 3, EXPANDED_CATEGORY);
    let sink = Box::new(CsvSink::new(out.path()));

    let report = run_targets(config, renderer.clone(), sink).await.unwrap();

    assert_eq!(renderer.opened(), 1);
    assert_eq!(renderer.closed(), 1);
    {
        let log = renderer.log.lock().unwrap();
        assert!(log.opened[0].ends_with("/more/computers/tablets"));
        // consent once, then three load-more clicks
        assert_eq!(log.clicks.len(), 4);
    }

    assert!(report.outcomes[0].paginated);
    assert_eq!(report.total_records(), 4);

    let lines = read_lines(&out, "tablets.csv");
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], HEADER);
    assert_eq!(lines[1], r#"Lenovo IdeaTab,"7"" screen, Android",69.99,2,7"#);
    assert_eq!(lines[2], r#"Galaxy Tab 3,"7"", 8GB, Wi-Fi",88.99,5,4"#);
}

#[tokio::test]
async fn test_consent_timeout_writes_nothing() {
    let server = MockServer::start().await;
    mount_page(&server, "/more/phones", PAGINATED_CATEGORY).await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server, out.path().to_str().unwrap(), &[("phones.csv", "more/phones")]);
    let renderer = ScriptedRenderer::new(false, 3, EXPANDED_CATEGORY);
    let sink = Box::new(CsvSink::new(out.path()));

    let err = run_targets(config, renderer.clone(), sink).await.unwrap_err();

    assert!(matches!(err, HarvestError::ConsentTimeout { .. }));
    assert_eq!(renderer.closed(), 1);
    assert!(!out.path().join("phones.csv").exists());
}

#[tokio::test]
async fn test_missing_page_fails_with_fetch_error() {
    let server = MockServer::start().await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server, out.path().to_str().unwrap(), &[("touch.csv", "more/phones/touch")]);
    let renderer = ScriptedRenderer::new(true, 0, "");
    let sink = Box::new(CsvSink::new(out.path()));

    let err = run_targets(config, renderer, sink).await.unwrap_err();

    match err {
        HarvestError::Fetch { url, reason } => {
            assert!(url.ends_with("/more/phones/touch"));
            assert_eq!(reason, "HTTP 404");
        }
        other => panic!("expected fetch error, got {:?}", other),
    }
    assert!(!out.path().join("touch.csv").exists());
}

#[tokio::test]
async fn test_bad_price_fails_page_without_partial_output() {
    let server = MockServer::start().await;
    mount_page(&server, "/more/phones", BAD_PRICE).await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&server, out.path().to_str().unwrap(), &[("phones.csv", "more/phones")]);
    let renderer = ScriptedRenderer::new(true, 0, "");
    let sink = Box::new(CsvSink::new(out.path()));

    let err = run_targets(config, renderer, sink).await.unwrap_err();

    match err {
        HarvestError::Extraction(e) => assert_eq!(e.index, 2),
        other => panic!("expected extraction error, got {:?}", other),
    }
    assert!(!out.path().join("phones.csv").exists());
}

#[tokio::test]
async fn test_fail_fast_stops_later_targets() {
    let server = MockServer::start().await;
    mount_page(&server, "/more/", STATIC_CATEGORY).await;
    mount_page(&server, "/more/computers", STATIC_CATEGORY).await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(
        &server,
        out.path().to_str().unwrap(),
        &[
            ("home.csv", "more/"),
            ("phones.csv", "more/phones"),
            ("computers.csv", "more/computers"),
        ],
    );
    let renderer = ScriptedRenderer::new(true, 0, "");
    let sink = Box::new(CsvSink::new(out.path()));

    let result = run_targets(config, renderer, sink).await;

    assert!(matches!(result, Err(HarvestError::Fetch { .. })));
    assert!(out.path().join("home.csv").exists());
    assert!(!out.path().join("phones.csv").exists());
    assert!(!out.path().join("computers.csv").exists());
}

#[tokio::test]
async fn test_isolated_failures_continue_and_report() {
    let server = MockServer::start().await;
    mount_page(&server, "/more/", STATIC_CATEGORY).await;
    mount_page(&server, "/more/phones", BAD_PRICE).await;
    mount_page(&server, "/more/computers", STATIC_CATEGORY).await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(
        &server,
        out.path().to_str().unwrap(),
        &[
            ("home.csv", "more/"),
            ("phones.csv", "more/phones"),
            ("computers.csv", "more/computers"),
        ],
    );
    config.crawler.isolate_failures = true;
    let renderer = ScriptedRenderer::new(true, 0, "");
    let sink = Box::new(CsvSink::new(out.path()));

    let report = run_targets(config, renderer, sink).await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.total_records(), 6);

    let states: Vec<TargetState> = report.outcomes.iter().map(|o| o.state).collect();
    assert_eq!(
        states,
        vec![TargetState::Done, TargetState::Failed, TargetState::Done]
    );
    assert!(report.outcomes[1]
        .error
        .as_deref()
        .unwrap()
        .contains("product block #2"));

    assert!(out.path().join("home.csv").exists());
    assert!(!out.path().join("phones.csv").exists());
    assert_eq!(read_lines(&out, "computers.csv").len(), 4);
}

#[tokio::test]
async fn test_rerun_produces_identical_output() {
    let server = MockServer::start().await;
    mount_page(&server, "/more/", STATIC_CATEGORY).await;

    let out = TempDir::new().unwrap();
    let dir = out.path().to_str().unwrap();

    let coordinator = Coordinator::new(
        create_test_config(&server, dir, &[("home.csv", "more/")]),
        ScriptedRenderer::new(true, 0, ""),
        Box::new(CsvSink::new(out.path())),
    )
    .unwrap();
    let targets = catalog_harvest::config::resolve_targets(&create_test_config(
        &server,
        dir,
        &[("home.csv", "more/")],
    ))
    .unwrap();

    coordinator.run(&targets).await.unwrap();
    let first = std::fs::read(out.path().join("home.csv")).unwrap();
    coordinator.run(&targets).await.unwrap();
    let second = std::fs::read(out.path().join("home.csv")).unwrap();

    assert_eq!(first, second);
}
