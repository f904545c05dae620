//! Integration tests for `packpub pack`.

use predicates::prelude::*;

use super::common::{ECHO_TOOL, FAILING_TOOL, TestEnv};

#[cfg(unix)]
#[test]
fn pack_runs_tool_with_masked_log() {
  let env = TestEnv::new().with_full_bundle(ECHO_TOOL);
  env.write_checkout("A.nuspec", "<package/>");
  env.write_checkout("B.nuspec", "<package/>");

  env
    .cmd("pack")
    .arg("--checkout-dir")
    .arg(env.checkout_path())
    .args(["--param", "octopus_nuspecpaths=*.nuspec"])
    .args(["--param", "octopus_packageversion=1.2.3"])
    .args(["--param", "secure:octopus_apikey=API-CLI-SECRET"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Pack step succeeded"))
    .stderr(predicate::str::contains("nuspecPaths: *.nuspec"))
    .stderr(predicate::str::contains("arg: -NoPackageAnalysis"))
    .stderr(predicate::str::contains("-Version 1.2.3"))
    .stderr(predicate::str::contains("--apikey").not());

  // Only the packaging tool is needed for a pack step.
  assert!(env.tools_path().join("nuget.exe").is_file());
  assert!(!env.tools_path().join("1.0").exists());
}

#[cfg(unix)]
#[test]
fn publish_passes_masked_api_key() {
  let env = TestEnv::new().with_full_bundle(ECHO_TOOL);
  env.write_checkout("A.nuspec", "<package/>");

  env
    .cmd("pack")
    .arg("--checkout-dir")
    .arg(env.checkout_path())
    .arg("--publish")
    .args(["--param", "octopus_nuspecpaths=A.nuspec"])
    .args(["--param", "octopus_host=https://deploy.local"])
    .args(["--param", "secure:octopus_apikey=API-CLI-SECRET"])
    .assert()
    .success()
    .stderr(predicate::str::contains("--server https://deploy.local --apikey SECRET"))
    .stderr(predicate::str::contains("arg: --apikey"))
    .stderr(predicate::str::contains("arg: SECRET"))
    .stderr(predicate::str::contains("API-CLI-SECRET").not())
    .stdout(predicate::str::contains("API-CLI-SECRET").not());
}

#[cfg(unix)]
#[test]
fn pack_reads_params_file() {
  let env = TestEnv::new().with_full_bundle(ECHO_TOOL);
  env.write_checkout("pkg/App.nuspec", "<package/>");
  env.write_checkout(
    "params.json",
    r#"{"octopus_nuspecpaths": "pkg/*.nuspec", "packpub_outputdir": "out"}"#,
  );

  let output = env
    .cmd("pack")
    .arg("--checkout-dir")
    .arg(env.checkout_path())
    .arg("--params")
    .arg(env.checkout_path().join("params.json"))
    .args(["--output", "json"])
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["artifacts"].as_array().unwrap().len(), 1);
  assert_eq!(json["artifacts"][0]["archive_path"], "pkg/App.nuspec");
  assert_eq!(json["exit_code"], 0);
  assert!(json["output_dir"].as_str().unwrap().ends_with("out"));
}

#[cfg(unix)]
#[test]
fn failing_tool_fails_pack() {
  let env = TestEnv::new().with_full_bundle(FAILING_TOOL);
  env.write_checkout("A.nuspec", "<package/>");

  env
    .cmd("pack")
    .arg("--checkout-dir")
    .arg(env.checkout_path())
    .args(["--param", "octopus_nuspecpaths=A.nuspec"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("nuget.exe pack"))
    .stderr(predicate::str::contains("pack failed"))
    .stderr(predicate::str::contains("exit code 4"));
}

#[test]
fn invalid_pattern_fails_pack() {
  let env = TestEnv::new().with_full_bundle(ECHO_TOOL);

  env
    .cmd("pack")
    .arg("--checkout-dir")
    .arg(env.checkout_path())
    .args(["--param", "octopus_nuspecpaths=[broken"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid artifact pattern"));
}
