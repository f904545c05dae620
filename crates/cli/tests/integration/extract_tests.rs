//! Integration tests for `packpub extract`.

use predicates::prelude::*;

use super::common::{ECHO_TOOL, TestEnv};

#[test]
fn extract_materializes_catalog() {
  let env = TestEnv::new().with_full_bundle(ECHO_TOOL);

  env
    .cmd("extract")
    .assert()
    .success()
    .stdout(predicate::str::contains("Tools ready"));

  let tools = env.tools_path();
  for version in ["1.0", "2.0", "3.0"] {
    assert!(tools.join(version).join("Octo.exe").is_file(), "{version} exe");
    assert!(tools.join(version).join("Octo.exe.config").is_file(), "{version} config");
  }
  assert!(tools.join("nuget.exe").is_file());
}

#[test]
fn second_extract_writes_nothing() {
  let env = TestEnv::new().with_full_bundle(ECHO_TOOL);
  env.cmd("extract").assert().success();
  let exe = env.tools_path().join("2.0").join("Octo.exe");
  let before = std::fs::metadata(&exe).unwrap().modified().unwrap();

  let output = env.cmd("extract").args(["--output", "json"]).output().unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let extractions = json["extractions"].as_array().unwrap();
  assert_eq!(extractions.len(), 7);
  assert!(extractions.iter().all(|e| e["status"] == "already_present"));
  assert_eq!(std::fs::metadata(&exe).unwrap().modified().unwrap(), before);
}

#[test]
fn missing_resource_fails_with_resource_and_destination() {
  let env = TestEnv::new();
  env.write_bundle("resources/nuget.exe", ECHO_TOOL);

  env
    .cmd("extract")
    .assert()
    .failure()
    .stderr(predicate::str::contains("resources/1/0/octo.exe"))
    .stderr(predicate::str::contains("after 4 attempt(s)"));

  assert!(!env.tools_path().join("1.0").join("Octo.exe").exists());
  assert!(!env.tools_path().join("1.0").join("Octo.exe.partial").exists());
}

#[test]
fn extract_text_lists_each_file() {
  let env = TestEnv::new().with_full_bundle(ECHO_TOOL);

  env
    .cmd("extract")
    .assert()
    .success()
    .stdout(predicate::str::contains("Octo.exe.config ("))
    .stdout(predicate::str::contains("nuget.exe ("));

  env
    .cmd("extract")
    .assert()
    .success()
    .stdout(predicate::str::contains("nuget.exe already present"))
    .stdout(predicate::str::contains("Written:").and(predicate::str::contains("0 B")));
}
