use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CONFIG_VARS: &[&str] = &[
    "GOOGLE_CLOUD_PROJECT",
    "GOOGLE_CLOUD_LOCATION",
    "AGENT_ENGINE_STAGING_BUCKET",
    "MODEL_NAME",
];

/// Binary with configuration variables cleared and the env file pointed at
/// a path inside `dir`
fn isolated(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agent-playtime"));
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd.arg("--env-file").arg(dir.path().join(".env"));
    cmd
}

#[test]
fn test_help_output() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agent-playtime"));
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Vertex AI Agent Engine"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("query"));
}

#[test]
fn test_version_output() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agent-playtime"));
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("agent-playtime"));
}

#[test]
fn test_delete_without_name_is_not_a_failure() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .arg("delete")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "--name (resource name) is required for deletion",
        ));
}

#[test]
fn test_delete_with_blank_name_is_missing_name() {
    let dir = TempDir::new().unwrap();
    for name in ["", "   "] {
        isolated(&dir)
            .env("GOOGLE_CLOUD_PROJECT", "p")
            .args(["delete", "--name", name])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "--name (resource name) is required for deletion",
            ));
    }
}

#[test]
fn test_deploy_reports_missing_bucket_before_auth() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .env("GOOGLE_CLOUD_PROJECT", "p")
        .env_remove("GOOGLE_OAUTH_ACCESS_TOKEN")
        .env("PATH", dir.path())
        .arg("deploy")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "AGENT_ENGINE_STAGING_BUCKET is required for deployment",
        ))
        .stderr(predicate::str::contains("gcloud").not());
}

#[test]
fn test_missing_project_fails_before_platform_calls() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOOGLE_CLOUD_PROJECT"));
}

#[test]
fn test_empty_project_counts_as_missing() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .env("GOOGLE_CLOUD_PROJECT", "")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOOGLE_CLOUD_PROJECT"));
}

#[test]
fn test_query_requires_resource_name() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .arg("query")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--resource-name"));
}

#[test]
fn test_tools_call_calculate() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["tools", "call", "calculate", "expression=2 + 2 * 3"])
        .assert()
        .success()
        .stdout("8\n");
}

#[test]
fn test_tools_call_rejects_code() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["tools", "call", "calculate", "expression=2; import os"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid characters"));
}

#[test]
fn test_tools_call_unknown_tool() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["tools", "call", "search", "q=x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown tool 'search'"));
}

#[test]
fn test_tools_list() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["tools", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("get_current_time"))
        .stdout(predicate::str::contains("calculate"));
}

#[test]
fn test_describe_does_not_need_project() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["describe", "--model", "gemini-test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"model\": \"gemini-test\""))
        .stdout(predicate::str::contains("\"name\": \"assistant\""));
}

#[test]
fn test_config_show_reads_env_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".env"),
        "GOOGLE_CLOUD_PROJECT=file-project\nMODEL_NAME=gemini-file\n",
    )
    .unwrap();

    isolated(&dir)
        .args(["config", "show", "--location", "europe-west4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file-project"))
        .stdout(predicate::str::contains("europe-west4"))
        .stdout(predicate::str::contains("gemini-file"))
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn test_environment_wins_over_env_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "GOOGLE_CLOUD_PROJECT=file-project\n").unwrap();

    isolated(&dir)
        .env("GOOGLE_CLOUD_PROJECT", "env-project")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("env-project"))
        .stdout(predicate::str::contains("file-project").not());
}

#[test]
fn test_config_validate_reports_missing_project() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Configuration is invalid"))
        .stdout(predicate::str::contains("GOOGLE_CLOUD_PROJECT"));
}
