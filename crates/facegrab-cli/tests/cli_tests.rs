use facegrab_model::RunReport;
use std::path::Path;
use std::process::{Command, Output};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn facegrab(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_facegrab"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run facegrab")
}

fn path_arg(p: &Path) -> &str {
    p.to_str().expect("utf-8 temp path")
}

#[test]
fn test_crawl_without_url_exits_1() {
    let out = facegrab(&["crawl"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Please provide the base URL"));
}

#[test]
fn test_csv_without_file_exits_1() {
    let out = facegrab(&["csv"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_csv_missing_file_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("missing.csv");
    let out = facegrab(&["csv", path_arg(&csv)]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("CSV file not found"));
}

#[tokio::test]
async fn test_csv_missing_column_exits_1_without_requests() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("players.csv");
    std::fs::write(&csv, "Name;UID\nAlpha;1\n").unwrap();
    let out_dir = dir.path().join("out");

    let image_base = format!("{}/uploads", server.uri());
    let out = facegrab(&[
        "csv",
        path_arg(&csv),
        "-O",
        path_arg(&out_dir),
        "--image-base",
        &image_base,
    ]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("'Unique ID'"));
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(!out_dir.exists());
}

#[test]
fn test_csv_without_ids_exits_0() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("players.csv");
    std::fs::write(&csv, "Unique ID;Name\n").unwrap();

    let out = facegrab(&["csv", path_arg(&csv), "-O", path_arg(dir.path())]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("No Unique IDs found"));
}

#[tokio::test]
async fn test_csv_downloads_and_writes_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/uploads/face/\d+\.png$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("players.csv");
    std::fs::write(&csv, "Name;Unique ID\nA;2000276779\nB;2000111\n").unwrap();
    let out_dir = dir.path().join("faces");
    let report_path = dir.path().join("report.json");

    let image_base = format!("{}/uploads", server.uri());
    let out = facegrab(&[
        "csv",
        path_arg(&csv),
        "--only",
        "2000111",
        "-O",
        path_arg(&out_dir),
        "--image-base",
        &image_base,
        "--report",
        path_arg(&report_path),
    ]);

    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stdout));
    assert_eq!(std::fs::read(out_dir.join("2000111.png")).unwrap(), b"png");
    assert!(!out_dir.join("2000276779.png").exists());

    let report: RunReport =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report.downloaded, 1);
    assert!(report.failed.is_empty());
}

#[tokio::test]
async fn test_crawl_base_page_failure_exits_1() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/teams"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let base = format!("{}/teams", server.uri());
    let image_base = format!("{}/uploads", server.uri());
    let out = facegrab(&["crawl", &base, "-O", path_arg(dir.path()), "--image-base", &image_base]);

    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.matches("Failed to retrieve the base webpage").count(), 1, "{stdout}");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
