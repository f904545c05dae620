//! Materialization from an on-disk bundle through the public API.

use std::path::Path;
use std::time::Duration;

use packpub_lib::catalog::{PACKAGING_TOOL, RELEASE_TOOLS, all_resources};
use packpub_lib::materialize::{ExtractStatus, MaterializeError, Materializer, RetryPolicy};
use packpub_lib::resources::BundleDir;
use tempfile::TempDir;

fn write_bundle(bundle: &BundleDir) {
  for resource in all_resources() {
    let path = bundle.path_of(resource);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, resource.id.as_bytes()).unwrap();
  }
}

fn no_wait() -> RetryPolicy {
  RetryPolicy {
    max_attempts: 4,
    backoff: Duration::ZERO,
  }
}

#[tokio::test]
async fn materializes_every_resource_from_bundle_dir() {
  let temp = TempDir::new().unwrap();
  let bundle = BundleDir::new(temp.path().join("bundle"));
  write_bundle(&bundle);
  let root = temp.path().join("tools");
  let materializer = Materializer::new(bundle);

  let mut extractions = materializer.ensure_tools_extracted(&root).await.unwrap();
  extractions.push(materializer.ensure_packaging_tool_extracted(&root).await.unwrap());

  assert_eq!(extractions.len(), 7);
  for tool in &RELEASE_TOOLS {
    for resource in tool.resources() {
      let path = root.join(tool.version).join(resource.file_name);
      assert_eq!(std::fs::read(&path).unwrap(), resource.id.as_bytes());
    }
  }
  assert_eq!(
    std::fs::read(root.join(PACKAGING_TOOL.file_name)).unwrap(),
    PACKAGING_TOOL.id.as_bytes()
  );
}

#[tokio::test]
async fn partially_extracted_root_is_completed() {
  let temp = TempDir::new().unwrap();
  let bundle = BundleDir::new(temp.path().join("bundle"));
  write_bundle(&bundle);
  let root = temp.path().join("tools");
  std::fs::create_dir_all(root.join("1.0")).unwrap();
  std::fs::write(root.join("1.0").join("Octo.exe"), b"from an earlier run").unwrap();

  let extractions = Materializer::new(bundle).ensure_tools_extracted(&root).await.unwrap();

  let present: Vec<_> = extractions
    .iter()
    .filter(|e| e.status == ExtractStatus::AlreadyPresent)
    .map(|e| e.path.clone())
    .collect();
  assert_eq!(present, vec![root.join("1.0").join("Octo.exe")]);
  assert_eq!(extractions.iter().filter(|e| e.was_written()).count(), 5);
}

#[tokio::test]
async fn missing_bundle_stops_at_first_resource() {
  let temp = TempDir::new().unwrap();
  let root = temp.path().join("tools");
  let materializer = Materializer::new(BundleDir::new(temp.path().join("empty"))).with_policy(no_wait());

  let err = materializer.ensure_tools_extracted(&root).await.unwrap_err();

  match err {
    MaterializeError::Extract {
      resource,
      destination,
      attempts,
      ..
    } => {
      assert_eq!(resource, "resources/1/0/octo.exe");
      assert_eq!(destination, root.join("1.0").join("Octo.exe"));
      assert_eq!(attempts, 4);
    }
    other => panic!("unexpected error: {other}"),
  }
  assert!(!Path::new(&root.join("2.0")).exists());
}
