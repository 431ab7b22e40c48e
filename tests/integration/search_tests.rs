use crate::collect_tests::search_item;
use serde_json::json;
use tm_survey::config::RetrievalConfig;
use tm_survey::retrieval::{FetchOutcome, RawFetcher};
use tm_survey::search::{CodeSearch, GithubSearch, SearchError};
use tm_survey::SearchResultRecord;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record(repository: &str, path: &str) -> SearchResultRecord {
    SearchResultRecord {
        repository: repository.to_string(),
        owner: repository.split('/').next().unwrap().to_string(),
        path: path.to_string(),
        html_url: String::new(),
        download_url: None,
        size: 0,
        sha: String::new(),
        downloaded: false,
    }
}

fn retrieval_config(server_uri: &str) -> RetrievalConfig {
    RetrievalConfig {
        raw_url: server_uri.to_string(),
        download_delay_ms: 0,
        ..RetrievalConfig::default()
    }
}

#[tokio::test]
async fn test_search_page_request_and_decoding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .and(query_param("q", "filename:threat_model.md"))
        .and(query_param("per_page", "50"))
        .and(query_param("page", "3"))
        .and(header("authorization", "Bearer secret"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 120,
            "incomplete_results": false,
            "items": [search_item("acme/widgets", "docs/threat_model.md")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let search = GithubSearch::new(&mock_server.uri(), "secret").expect("client");
    let page = search
        .search_page("filename:threat_model.md", 3, 50)
        .await
        .expect("search page");

    assert_eq!(page.total_count, 120);
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].repository, "acme/widgets");
    assert_eq!(page.records[0].owner, "acme");
}

#[tokio::test]
async fn test_rate_limit_response_carries_reset_time() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "1700000010")
                .set_body_string("API rate limit exceeded"),
        )
        .mount(&mock_server)
        .await;

    let search = GithubSearch::new(&mock_server.uri(), "secret").expect("client");
    let result = search.search_page("q", 1, 100).await;

    match result {
        Err(SearchError::RateLimited { reset_at }) => {
            assert_eq!(reset_at.timestamp(), 1_700_000_010)
        }
        other => panic!("expected rate limit, got {:?}", other),
    }
}

#[tokio::test]
async fn test_plain_forbidden_is_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/code"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "10")
                .set_body_string("Forbidden"),
        )
        .mount(&mock_server)
        .await;

    let search = GithubSearch::new(&mock_server.uri(), "secret").expect("client");
    let result = search.search_page("q", 1, 100).await;

    assert!(matches!(result, Err(SearchError::Http { status: 403, .. })));
}

#[tokio::test]
async fn test_fetch_falls_back_through_branches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/acme/widgets/HEAD/tm.md"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/acme/widgets/main/tm.md"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/acme/widgets/master/tm.md"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# Threat Model"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = RawFetcher::new(&retrieval_config(&mock_server.uri()), "secret").expect("fetcher");
    let outcome = fetcher.fetch(&record("acme/widgets", "tm.md")).await;

    assert_eq!(
        outcome,
        FetchOutcome::Found {
            branch: "master".to_string(),
            body: b"# Threat Model".to_vec(),
        }
    );
}

#[tokio::test]
async fn test_fetch_stops_at_first_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/acme/widgets/HEAD/tm.md"))
        .respond_with(ResponseTemplate::new(200).set_body_string("default"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("other"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let fetcher = RawFetcher::new(&retrieval_config(&mock_server.uri()), "secret").expect("fetcher");
    let outcome = fetcher.fetch(&record("acme/widgets", "tm.md")).await;

    assert!(matches!(outcome, FetchOutcome::Found { ref branch, .. } if branch == "HEAD"));
}

#[tokio::test]
async fn test_fetch_exhausted_when_every_branch_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = RawFetcher::new(&retrieval_config(&mock_server.uri()), "secret").expect("fetcher");
    let outcome = fetcher.fetch(&record("acme/widgets", "missing.md")).await;

    match outcome {
        FetchOutcome::Exhausted { attempts } => {
            assert_eq!(attempts.len(), 3);
            assert!(attempts[0].starts_with("HEAD: HTTP 404"));
        }
        other => panic!("expected exhaustion, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_unreachable_host_is_exhausted() {
    let config = RetrievalConfig {
        raw_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 1,
        ..RetrievalConfig::default()
    };

    let fetcher = RawFetcher::new(&config, "secret").expect("fetcher");
    let outcome = fetcher.fetch(&record("acme/widgets", "tm.md")).await;

    assert!(!outcome.is_found());
}
