use crate::collect_tests::{create_test_config, mount_corpus};
use tempfile::TempDir;
use tm_survey::analysis::{analyze_directory, write_dump, AnalysisDump};
use tm_survey::collector::Collector;
use wiremock::MockServer;

#[tokio::test]
async fn test_analyze_collected_corpus() {
    let mock_server = MockServer::start().await;
    mount_corpus(&mock_server).await;

    let work_dir = TempDir::new().expect("create temp dir");
    let config = create_test_config(
        &mock_server.uri(),
        &["filename:threat_model.md", "filename:threat-model.md"],
        work_dir.path(),
    );
    let download_dir = config.output.download_dir.clone();
    let analysis_path = config.output.analysis_path.clone();

    Collector::new(config, "test-token")
        .expect("create collector")
        .run()
        .await
        .expect("collection failed");

    let stats = analyze_directory(&download_dir).expect("analysis");

    assert_eq!(stats.total_files_found, 2);
    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.heading_counts["threat model"].count, 2);
    assert_eq!(stats.heading_counts["mitigation"].count, 1);
    assert_eq!(stats.heading_counts["scope"].count, 1);
    assert_eq!(stats.filename_patterns["threat_model"], 1);

    write_dump(&stats, &analysis_path).expect("write dump");
    let dump: AnalysisDump =
        serde_json::from_str(&std::fs::read_to_string(&analysis_path).expect("read dump"))
            .expect("parse dump");
    assert_eq!(dump.summary.total_headings, 4);
    assert_eq!(
        dump.file_headings["acme_widgets/docs_threat_model.md"][1].text,
        "Mitigation"
    );
}
