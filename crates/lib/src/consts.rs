use std::time::Duration;

pub const APP_NAME: &str = "packpub";

/// Total extraction attempts per resource (first try plus three retries).
pub const EXTRACT_MAX_ATTEMPTS: u32 = 4;

/// Fixed wait between extraction attempts.
pub const EXTRACT_BACKOFF: Duration = Duration::from_secs(4);

/// Copy buffer size used when streaming a resource to disk.
pub const EXTRACT_CHUNK_SIZE: usize = 8192;

/// Suffix of the sibling file an extraction writes before renaming into place.
pub const PARTIAL_SUFFIX: &str = ".partial";

/// Token substituted for secret arguments in logged command lines.
pub const REDACTED: &str = "SECRET";
