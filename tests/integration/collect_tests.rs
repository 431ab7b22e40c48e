use serde_json::json;
use std::path::Path;
use tempfile::TempDir;
use tm_survey::cache::cache_path;
use tm_survey::collector::Collector;
use tm_survey::config::{Config, OutputConfig, RetrievalConfig, SearchConfig};
use tm_survey::SearchResultRecord;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing both endpoints at the mock server
pub fn create_test_config(server_uri: &str, queries: &[&str], work_dir: &Path) -> Config {
    Config {
        search: SearchConfig {
            queries: queries.iter().map(|q| q.to_string()).collect(),
            api_url: server_uri.to_string(),
            query_delay_ms: 0,
            ..SearchConfig::default()
        },
        retrieval: RetrievalConfig {
            raw_url: server_uri.to_string(),
            download_delay_ms: 0,
            timeout_secs: 5,
            ..RetrievalConfig::default()
        },
        output: OutputConfig {
            output_dir: work_dir.join("data"),
            download_dir: work_dir.join("data").join("downloads"),
            analysis_path: work_dir.join("heading_analysis.json"),
        },
    }
}

pub fn search_item(repository: &str, path: &str) -> serde_json::Value {
    let owner = repository.split('/').next().unwrap();
    json!({
        "name": path.rsplit('/').next().unwrap(),
        "path": path,
        "sha": format!("sha-{}", path.len()),
        "url": format!("https://api.github.com/repos/{}/contents/{}", repository, path),
        "html_url": format!("https://github.com/{}/blob/abc123/{}", repository, path),
        "repository": {
            "full_name": repository,
            "owner": { "login": owner }
        },
        "score": 1.0
    })
}

/// Mounts the two search queries and the raw content endpoints used by the tests
pub async fn mount_corpus(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search/code"))
        .and(query_param("q", "filename:threat_model.md"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                search_item("acme/widgets", "docs/threat_model.md"),
                search_item("acme/gadgets", "THREAT_MODEL.md"),
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .and(query_param("q", "filename:threat-model.md"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                search_item("acme/widgets", "docs/threat_model.md"),
                search_item("OWASP/threat-dragon", "docs/threat-model.md"),
            ]
        })))
        .mount(server)
        .await;

    // acme/widgets only exists on main
    Mock::given(method("GET"))
        .and(path("/acme/widgets/main/docs/threat_model.md"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("# Threat Model\n\n## Mitigation\n"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/OWASP/threat-dragon/HEAD/docs/threat-model.md"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("# Threat Model\n## Scope\n"),
        )
        .mount(server)
        .await;

    // Everything else, including every acme/gadgets candidate, is missing
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

fn load_records(path: &Path) -> Vec<SearchResultRecord> {
    serde_json::from_str(&std::fs::read_to_string(path).expect("read records"))
        .expect("parse records")
}

#[tokio::test]
async fn test_full_collection_run() {
    let mock_server = MockServer::start().await;
    mount_corpus(&mock_server).await;

    let work_dir = TempDir::new().expect("create temp dir");
    let config = create_test_config(
        &mock_server.uri(),
        &["filename:threat_model.md", "filename:threat-model.md"],
        work_dir.path(),
    );
    let download_dir = config.output.download_dir.clone();
    let output_dir = config.output.output_dir.clone();

    let collector = Collector::new(config, "test-token").expect("create collector");
    let report = collector.run().await.expect("collection failed");

    // Four results, one duplicate
    assert_eq!(report.summary.total_reported, 4);
    assert_eq!(report.summary.total_retrieved, 4);
    assert_eq!(report.summary.duplicates_removed, 1);
    assert_eq!(report.records.len(), 3);
    assert_eq!(report.records[0].repository, "acme/widgets");
    assert_eq!(report.records[1].repository, "acme/gadgets");
    assert_eq!(report.records[2].repository, "OWASP/threat-dragon");

    assert_eq!(report.summary.downloaded, 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].repository, "acme/gadgets");
    assert!(!report.records[1].downloaded);

    // The fallback branch served the content
    let cached = cache_path(&download_dir, "acme/widgets", "docs/threat_model.md");
    assert_eq!(
        std::fs::read_to_string(&cached).expect("cached file"),
        "# Threat Model\n\n## Mitigation\n"
    );

    let records = load_records(&output_dir.join("threat_models.json"));
    assert_eq!(records, report.records);

    let csv = std::fs::read_to_string(output_dir.join("threat_models.csv")).expect("csv");
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Repository,Owner,File Path,HTML URL,Size,Downloaded")
    );
    assert_eq!(lines.count(), 3);

    let failed = load_records(&output_dir.join("failed_downloads.json"));
    assert_eq!(failed.len(), 1);

    let summary = std::fs::read_to_string(output_dir.join("summary.txt")).expect("summary");
    assert!(summary.contains("Total unique files: 3"));
    assert!(summary.contains("OWASP/threat-dragon: found at docs/threat-model.md"));
}

#[tokio::test]
async fn test_second_run_reuses_cache() {
    let mock_server = MockServer::start().await;
    mount_corpus(&mock_server).await;

    let work_dir = TempDir::new().expect("create temp dir");
    let config = create_test_config(
        &mock_server.uri(),
        &["filename:threat_model.md", "filename:threat-model.md"],
        work_dir.path(),
    );

    let first = Collector::new(config.clone(), "test-token")
        .expect("create collector")
        .run()
        .await
        .expect("first run");
    assert_eq!(first.summary.cached, 0);

    let second = Collector::new(config, "test-token")
        .expect("create collector")
        .run()
        .await
        .expect("second run");

    assert_eq!(second.summary.cached, 2);
    assert_eq!(second.summary.downloaded, 2);
    assert_eq!(second.failed.len(), 1);
}

#[tokio::test]
async fn test_no_failures_writes_no_failed_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "items": [search_item("acme/widgets", "docs/threat_model.md")]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/acme/widgets/HEAD/docs/threat_model.md"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# Model\n"))
        .mount(&mock_server)
        .await;

    let work_dir = TempDir::new().expect("create temp dir");
    let config = create_test_config(&mock_server.uri(), &["anything"], work_dir.path());
    let output_dir = config.output.output_dir.clone();

    let report = Collector::new(config, "test-token")
        .expect("create collector")
        .run()
        .await
        .expect("collection failed");

    assert!(report.failed.is_empty());
    assert!(!output_dir.join("failed_downloads.json").exists());
    assert!(output_dir.join("summary.txt").exists());
}

#[tokio::test]
async fn test_failed_query_does_not_abort_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .and(query_param("q", "broken"))
        .respond_with(ResponseTemplate::new(422).set_body_string("Validation Failed"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .and(query_param("q", "working"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "items": [search_item("acme/widgets", "tm.md")]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let work_dir = TempDir::new().expect("create temp dir");
    let config = create_test_config(&mock_server.uri(), &["broken", "working"], work_dir.path());

    let report = Collector::new(config, "test-token")
        .expect("create collector")
        .run()
        .await
        .expect("collection failed");

    assert_eq!(report.queries, 2);
    assert_eq!(report.failed_queries, 1);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.failed.len(), 1);
}
