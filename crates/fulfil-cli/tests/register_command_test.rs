use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::Result;
use serde_json::{Value, json};
use tempfile::NamedTempFile;

fn cargo_bin() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_fulfil") {
        return PathBuf::from(path);
    }

    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| repo_root().join("target"));
    let executable_name = format!("fulfil{}", std::env::consts::EXE_SUFFIX);
    let fallback = target_dir.join("debug").join(executable_name);

    if fallback.exists() {
        return fallback;
    }

    panic!(
        "CARGO_BIN_EXE_fulfil is not set and fallback binary was not found at {}",
        fallback.display()
    );
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn testdata_path(path: &str) -> PathBuf {
    repo_root().join("testdata").join(path)
}

fn run(args: &[&str]) -> Output {
    Command::new(cargo_bin())
        .args(args)
        .output()
        .expect("fulfil should execute")
}

fn run_register(request: &str, extra: &[&str]) -> Output {
    let request = testdata_path(request);
    let host = testdata_path("hosts/lima_warehouse.json");
    let request = request.to_string_lossy();
    let host = host.to_string_lossy();

    let mut args = vec!["register", request.as_ref(), "--host", host.as_ref()];
    args.extend_from_slice(extra);
    run(&args)
}

fn stdout_json(output: &Output) -> Result<Value> {
    Ok(serde_json::from_slice(&output.stdout)?)
}

fn assert_exit_code(output: &Output, expected: i32) {
    let actual = output.status.code().unwrap_or(-1);
    assert_eq!(
        actual,
        expected,
        "unexpected exit code; stdout: {}; stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn register_prints_success_response() -> Result<()> {
    let output = run_register("requests/sales_order.json", &[]);

    assert_exit_code(&output, 0);
    // two attachments take the first ids
    assert_eq!(
        stdout_json(&output)?,
        json!({ "success": true, "recordid": 90003 })
    );
    Ok(())
}

#[test]
fn register_transfer_order_with_auto_numbering() -> Result<()> {
    let output = run_register("requests/transfer_order.json", &["--auto-number", "IF-"]);

    assert_exit_code(&output, 0);
    assert_eq!(
        stdout_json(&output)?,
        json!({ "success": true, "recordid": 90001 })
    );
    Ok(())
}

#[test]
fn register_reports_order_state_failure() -> Result<()> {
    let output = run_register("requests/closed_order.json", &[]);

    assert_exit_code(&output, 1);

    let body = stdout_json(&output)?;
    assert_eq!(body["success"], json!(false));
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("Found 3 error(s) in order 5002:"))
    );
    assert_eq!(body["details"]["orderId"], json!("5002"));
    Ok(())
}

#[test]
fn register_reports_schema_errors_as_details() -> Result<()> {
    let output = run_register("requests/invalid_request.json", &[]);

    assert_exit_code(&output, 1);

    let body = stdout_json(&output)?;
    assert_eq!(body["details"].as_array().map(Vec::len), Some(7));
    Ok(())
}

#[test]
fn register_honours_config_file() -> Result<()> {
    let config = testdata_path("config/strict.yaml");
    let output = run_register(
        "requests/sales_order.json",
        &["--config", config.to_string_lossy().as_ref()],
    );

    assert_exit_code(&output, 1);

    let body = stdout_json(&output)?;
    assert_eq!(
        body["details"],
        json!(["itemFulfillment.items[1].inventoryDetail[0].binNumber does not match the required format"])
    );
    Ok(())
}

#[test]
fn register_fails_on_bad_host_fixture() -> Result<()> {
    let mut fixture = NamedTempFile::with_suffix(".json")?;
    write!(fixture, "{{ \"records\": 5 }}")?;

    let request = testdata_path("requests/sales_order.json");
    let output = run(&[
        "register",
        request.to_string_lossy().as_ref(),
        "--host",
        fixture.path().to_string_lossy().as_ref(),
    ]);

    assert_exit_code(&output, 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load host fixture"));
    Ok(())
}

#[test]
fn schema_dumps_builtin_registry_as_json() -> Result<()> {
    let output = run(&["schema", "--format", "json"]);

    assert_exit_code(&output, 0);

    let body = stdout_json(&output)?;
    for name in ["mainRequest", "itemFulfillment", "localizations", "item", "inventoryDetail", "files"] {
        assert!(body["schemas"].get(name).is_some(), "missing schema {name}");
    }
    Ok(())
}

#[test]
fn schema_dumps_yaml_by_default() {
    let output = run(&["schema"]);

    assert_exit_code(&output, 0);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("schemas:"));
    assert!(stdout.contains("mainRequest:"));
}

#[test]
fn schema_warns_about_self_referencing_schemas() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join("tree.yaml"),
        "schemas:\n  mainRequest:\n    - field: node\n      type: object\n      itemSchema: node\n  \
         node:\n    - field: children\n      type: array\n      itemSchema: node\n",
    )?;
    let config = dir.path().join("service.yaml");
    std::fs::write(&config, "schema_file: tree.yaml\n")?;

    let output = run(&["--config", config.to_string_lossy().as_ref(), "schema"]);

    assert_exit_code(&output, 0);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Schemas reference themselves"), "{stderr}");
    assert!(stderr.contains("node"), "{stderr}");
    Ok(())
}
