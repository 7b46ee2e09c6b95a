use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

const INPUT_VARS: &[&str] = &[
    "INPUT_BASEDIR",
    "INPUT_WRANGLER-TOML",
    "INPUT_TSCONFIG-JSON",
    "INPUT_MODE",
    "RUST_LOG",
];

fn compatlint() -> Command {
    let mut cmd = Command::cargo_bin("compatlint").unwrap();
    for var in INPUT_VARS {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_in_sync_project_passes() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("in-sync"))
        .arg("--mode")
        .arg("fail")
        .assert()
        .success()
        .stdout(predicate::str::contains("Compatibility dates match (2024-03-01)"));
}

#[test]
fn test_check_subcommand_is_the_default() {
    compatlint()
        .arg("check")
        .arg("--basedir")
        .arg(fixture("in-sync"))
        .arg("--mode")
        .arg("fail")
        .assert()
        .success()
        .stdout(predicate::str::contains("Compatibility dates match"));
}

#[test]
fn test_experimental_entry_and_bare_toml_date() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("experimental"))
        .arg("--mode")
        .arg("fail")
        .assert()
        .success()
        .stdout(predicate::str::contains("Compatibility dates match (2023-10-30)"));
}

#[test]
fn test_drift_fails_in_fail_mode() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("drift"))
        .arg("--mode")
        .arg("fail")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Compatibility dates differ: wrangler config has 2024-01-01, tsconfig has 2024-02-01",
        ));
}

#[test]
fn test_drift_is_a_warning_in_default_mode() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("drift"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Compatibility dates differ"))
        .stdout(predicate::str::contains("No action taken (mode edit-old)"));
}

#[test]
fn test_missing_tsconfig_date_fails_in_fail_mode() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("missing-tsconfig-date"))
        .arg("--mode")
        .arg("fail")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Compatibility date is missing in tsconfig",
        ));
}

#[test]
fn test_missing_date_in_edit_mode_succeeds() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("missing-tsconfig-date"))
        .arg("--mode")
        .arg("edit-tsconfig")
        .assert()
        .success()
        .stdout(predicate::str::contains("No action taken (mode edit-tsconfig)"));
}

#[test]
fn test_broken_wrangler_is_reported_generically() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("broken-wrangler"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to parse wrangler configuration",
        ))
        .stderr(predicate::str::contains("not found").not());
}

#[test]
fn test_broken_tsconfig_is_fatal() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("broken-tsconfig"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse tsconfig"));
}

#[test]
fn test_missing_wrangler_names_path() {
    let temp = tempfile::TempDir::new().unwrap();
    let expected = temp.path().join("wrangler.toml");

    compatlint()
        .arg("--basedir")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wrangler configuration not found at"))
        .stderr(predicate::str::contains(expected.display().to_string()));
}

#[test]
fn test_missing_tsconfig_names_path() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("in-sync"))
        .arg("--tsconfig-json")
        .arg("tsconfig.build.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("tsconfig not found at"))
        .stderr(predicate::str::contains("tsconfig.build.json"));
}

#[test]
fn test_inputs_from_environment() {
    compatlint()
        .env("INPUT_BASEDIR", fixture("drift"))
        .env("INPUT_MODE", "fail")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Compatibility dates differ"));
}

#[test]
fn test_flag_overrides_environment() {
    compatlint()
        .env("INPUT_BASEDIR", fixture("drift"))
        .env("INPUT_MODE", "fail")
        .arg("--mode")
        .arg("edit-old")
        .assert()
        .success();
}

#[test]
fn test_unknown_mode_fails() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("in-sync"))
        .arg("--mode")
        .arg("repair")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown mode 'repair'"));
}

#[test]
fn test_format_json_success() {
    let output = compatlint()
        .arg("--basedir")
        .arg(fixture("in-sync"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(json["status"], "in-sync");
    assert_eq!(json["mode"], "edit-old");
    assert_eq!(json["wrangler"]["date"], "2024-03-01");
    assert_eq!(json["tsconfig"]["date"], "2024-03-01");
    assert!(json["diagnostics"].as_array().unwrap().is_empty());
}

#[test]
fn test_format_json_failure() {
    let output = compatlint()
        .arg("--basedir")
        .arg(fixture("drift"))
        .arg("--mode")
        .arg("fail")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(json["status"], "failed");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Compatibility dates differ"));
}

#[test]
fn test_format_json_drift_warning() {
    let output = compatlint()
        .arg("--basedir")
        .arg(fixture("drift"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();

    assert_eq!(json["status"], "drift");
    assert_eq!(json["diagnostics"][0]["rule"], "compat::drift");
    assert_eq!(json["diagnostics"][0]["level"], "warning");
}

#[test]
fn test_format_github_failure() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("missing-tsconfig-date"))
        .arg("--mode")
        .arg("fail")
        .arg("--format")
        .arg("github")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "::error::Compatibility date is missing in tsconfig",
        ));
}

#[test]
fn test_format_github_success() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("in-sync"))
        .arg("--format")
        .arg("github")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "::debug::wrangler compatibility date is 2024-03-01",
        ))
        .stdout(predicate::str::contains("::error::").not());
}

#[test]
fn test_config_file_supplies_inputs() {
    let temp = tempfile::TempDir::new().unwrap();
    let config_path = temp.path().join("compatlint.toml");
    let basedir = fixture("drift");
    std::fs::write(
        &config_path,
        format!(
            "basedir = {}\nmode = \"fail\"\n",
            toml::Value::String(basedir.display().to_string())
        ),
    )
    .unwrap();

    compatlint()
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Compatibility dates differ"));
}

#[test]
fn test_missing_config_file_is_error() {
    compatlint()
        .arg("--config")
        .arg("does-not-exist.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_init_writes_loadable_config() {
    let temp = tempfile::TempDir::new().unwrap();
    let output = temp.path().join(".compatlint.toml");

    compatlint()
        .arg("init")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file"));

    let content = std::fs::read_to_string(&output).unwrap();
    let value: toml::Table = toml::from_str(&content).unwrap();
    assert_eq!(value["mode"].as_str(), Some("edit-old"));
    assert_eq!(value["wrangler_toml"].as_str(), Some("wrangler.toml"));

    compatlint()
        .arg("init")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    compatlint()
        .arg("init")
        .arg(&output)
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn test_help_shows_inputs() {
    compatlint()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--wrangler-toml"))
        .stdout(predicate::str::contains("--tsconfig-json"))
        .stdout(predicate::str::contains("--mode"));
}

#[test]
fn test_unparseable_date_is_a_warning_in_default_mode() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("invalid-date"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "'2024-03-01T00:00:00Z' in wrangler config is not a valid YYYY-MM-DD date",
        ))
        .stdout(predicate::str::contains("No action taken (mode edit-old)"));
}

#[test]
fn test_unparseable_date_fails_in_fail_mode() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("invalid-date"))
        .arg("--mode")
        .arg("fail")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("is not a valid YYYY-MM-DD date"));
}

#[test]
fn test_format_json_failure_keeps_malformed_reason() {
    let output = compatlint()
        .arg("--basedir")
        .arg(fixture("malformed-types"))
        .arg("--mode")
        .arg("fail")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();

    assert_eq!(json["status"], "failed");
    assert_eq!(json["error"], "Compatibility date is missing in tsconfig");
    assert_eq!(json["wrangler"]["date"], "2024-03-01");
    assert!(json["tsconfig"]["malformed"].is_string());
    assert_eq!(json["diagnostics"][0]["rule"], "compat::malformed");
}

#[test]
fn test_text_failure_shows_malformed_reason() {
    compatlint()
        .arg("--basedir")
        .arg(fixture("malformed-types"))
        .arg("--mode")
        .arg("fail")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be read"))
        .stderr(predicate::str::contains(
            "Error: Compatibility date is missing in tsconfig",
        ));
}

#[test]
fn test_format_github_failure_keeps_completed_steps() {
    let output = compatlint()
        .arg("--basedir")
        .arg(fixture("broken-tsconfig"))
        .arg("--format")
        .arg("github")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    assert!(lines[0].starts_with("::debug::wrangler compatibility date is "));
    assert_eq!(lines.last(), Some(&"::error::Failed to parse tsconfig"));
    assert!(!stdout.contains("::debug::tsconfig"));
}
