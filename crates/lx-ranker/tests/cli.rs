use std::io::Write;
use std::path::Path;

use clap::Parser;
use lx_common::config::EngineConfig;
use lx_ranker::{Cli, CliError, run_with_config};
use serde_json::Value;
use tempfile::TempDir;

const POOL: &str = r#"[
    {"id": "tremblay", "is_active": true, "is_verified": true,
     "practice_areas": [{"practice_area_id": "family-law", "years_experience": 14, "is_primary": true}],
     "years_experience": 18, "rating_average": 4.9, "rating_count": 64,
     "languages": ["fr", "en"], "city": "Montréal", "province": "QC",
     "has_open_calendar": true, "hourly_rate_min": 180, "hourly_rate_max": 260},
    {"id": "nguyen", "is_active": true, "is_verified": true,
     "practice_areas": [{"practice_area_id": "family-law", "years_experience": 2}],
     "years_experience": 2, "rating_average": 4.1, "rating_count": 3,
     "languages": ["en"], "city": "Toronto", "province": "ON"},
    {"id": "retired", "is_active": false, "is_verified": true,
     "practice_areas": [{"practice_area_id": "family-law", "years_experience": 30, "is_primary": true}]}
]"#;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path.to_string_lossy().into_owned()
}

async fn run_cli(args: &[&str]) -> Result<Value, CliError> {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    run_with_config(cli, EngineConfig::default(), &mut out).await?;
    Ok(serde_json::from_slice(&out).unwrap())
}

#[tokio::test]
async fn rank_prints_response_for_bare_criteria() {
    let dir = TempDir::new().unwrap();
    let request = write_file(
        &dir,
        "case.json",
        r#"{"practice_area_id": "family-law", "case_description": "Custody dispute",
            "preferred_language": "fr", "location": "Montréal"}"#,
    );
    let candidates = write_file(&dir, "pool.json", POOL);

    let json = run_cli(&["lx-ranker", "rank", "--request", &request, "--candidates", &candidates])
        .await
        .unwrap();

    assert_eq!(json["mode"], "standard");
    assert_eq!(json["pool_size"], 2);
    assert_eq!(json["match_count"], 2);
    assert_eq!(json["matches"][0]["candidate"]["id"], "tremblay");
    assert_eq!(json["matches"][0]["rank"], 1);
    assert!(json["matches"][0].get("proposal_id").is_none());
    assert_eq!(json["matches"][0]["estimate"]["cost"]["currency"], "CAD");
}

#[tokio::test]
async fn rank_with_persist_issues_proposal_ids_and_honours_flags() {
    let dir = TempDir::new().unwrap();
    let request = write_file(
        &dir,
        "request.json",
        r#"{"match_request_id": "req-7", "mode": "standard",
            "criteria": {"practice_area_id": "family-law", "case_description": "Custody dispute",
            "preferred_language": "en"}}"#,
    );
    let candidates = write_file(&dir, "pool.json", POOL);

    let json = run_cli(&[
        "lx-ranker",
        "rank",
        "--request",
        &request,
        "--candidates",
        &candidates,
        "--mode",
        "extended",
        "--limit",
        "1",
        "--persist",
    ])
    .await
    .unwrap();

    assert_eq!(json["match_request_id"], "req-7");
    assert_eq!(json["mode"], "extended");
    assert_eq!(json["match_count"], 1);
    assert_eq!(json["matches"][0]["proposal_id"].as_str().map(str::len), Some(26));
}

#[tokio::test]
async fn invalid_request_is_rejected_before_ranking() {
    let dir = TempDir::new().unwrap();
    let request = write_file(
        &dir,
        "case.json",
        r#"{"practice_area_id": "family-law", "case_description": "x",
            "preferred_language": "en", "budget_min": 400, "budget_max": 100}"#,
    );
    let candidates = write_file(&dir, "pool.json", POOL);

    let err = run_cli(&["lx-ranker", "rank", "--request", &request, "--candidates", &candidates])
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Criteria(_)));
}

#[tokio::test]
async fn missing_files_are_reported() {
    let missing = Path::new("/nonexistent/lx/case.json").to_string_lossy().into_owned();
    let err = run_cli(&["lx-ranker", "rank", "--request", &missing, "--candidates", &missing])
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
    assert!(err.to_string().contains("case.json"));
}

#[tokio::test]
async fn malformed_candidate_snapshot_is_an_error() {
    let dir = TempDir::new().unwrap();
    let request = write_file(
        &dir,
        "case.json",
        r#"{"practice_area_id": "family-law", "case_description": "x", "preferred_language": "en"}"#,
    );
    let candidates = write_file(&dir, "pool.json", "{\"id\": 1");

    let err = run_cli(&["lx-ranker", "rank", "--request", &request, "--candidates", &candidates])
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Directory(_)));
}

#[tokio::test]
async fn weights_prints_both_tables_by_default() {
    let json = run_cli(&["lx-ranker", "weights"]).await.unwrap();
    assert_eq!(json["standard"]["practice_area"], 0.25);
    assert_eq!(json["extended"]["practice_area"], 0.30);
    assert!(json["extended"].get("responsiveness").is_none());
}
