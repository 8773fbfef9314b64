use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn omreport() -> Command {
    let mut cmd = Command::cargo_bin("omreport").unwrap();
    cmd.env_remove("OMREPORT_EMAIL")
        .env_remove("OMREPORT_PASSWORD")
        .env_remove("OMREPORT_WEBDRIVER_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn schema_prints_config_schema() {
    omreport()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("omreport config"))
        .stdout(predicate::str::contains("report_url"))
        .stdout(predicate::str::contains("max_attempts"));
}

#[test]
fn run_fails_without_config() {
    omreport()
        .args(["run", "--config", "/nonexistent/omreport.json", "--no-alert"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn dry_run_prints_plan() {
    let config = config_file(
        r#"{
            "reportUrl": "https://portal.example/report",
            "email": "ops@example.com",
            "password": "hunter2",
            "outputFolder": "",
            "headless": true
        }"#,
    );

    omreport()
        .args(["run", "--dry-run", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Execution Plan ==="))
        .stdout(predicate::str::contains("Report URL: https://portal.example/report"))
        .stdout(predicate::str::contains("Attempts: 5 (10s apart)"))
        .stdout(predicate::str::contains("Filter dropdowns: 3"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn dry_run_applies_overrides() {
    let config = config_file(r#"{ "reportUrl": "https://portal.example/report" }"#);

    omreport()
        .args(["run", "--dry-run", "--no-alert", "--max-attempts", "2", "--config"])
        .arg(config.path())
        .env("OMREPORT_EMAIL", "ops@example.com")
        .assert()
        .success()
        .stdout(predicate::str::contains("Login: ops@example.com"))
        .stdout(predicate::str::contains("Attempts: 2"))
        .stdout(predicate::str::contains("Alerts: none"));
}

#[test]
fn run_rejects_zero_attempts() {
    let config = config_file(
        r#"{ "reportUrl": "https://portal.example/report", "email": "ops@example.com" }"#,
    );

    omreport()
        .args(["run", "--dry-run", "--max-attempts", "0", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_attempts must be at least 1"));
}

#[test]
fn run_requires_email() {
    let config = config_file(r#"{ "reportUrl": "https://portal.example/report" }"#);

    omreport()
        .args(["run", "--dry-run", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required setting 'email'"));
}

#[test]
fn run_rejects_time_fields_in_date_format() {
    let config = config_file(
        r#"{
            "reportUrl": "https://portal.example/report",
            "email": "ops@example.com",
            "report": { "date_format": "%m-%d-%Y_%H%M" }
        }"#,
    );

    omreport()
        .args(["run", "--dry-run", "--config"])
        .arg(config.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid date format"));
}
