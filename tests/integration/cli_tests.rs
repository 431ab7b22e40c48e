use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_missing_token_exits_before_any_work() {
    let work_dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_tm-survey"))
        .current_dir(work_dir.path())
        .env_remove("GITHUB_TOKEN")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GITHUB_TOKEN"), "stderr was: {}", stderr);

    assert!(!work_dir.path().join("threat_models_data").exists());
    assert!(std::fs::read_dir(work_dir.path()).unwrap().next().is_none());
}

#[test]
fn test_blank_token_is_treated_as_missing() {
    let work_dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_tm-survey"))
        .current_dir(work_dir.path())
        .env("GITHUB_TOKEN", "   ")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("GITHUB_TOKEN"));
    assert!(!work_dir.path().join("threat_models_data").exists());
}
