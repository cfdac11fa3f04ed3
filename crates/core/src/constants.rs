//! Constants used throughout the Lambda Repo core crate.
//!
//! Layout names, listing column widths and configuration defaults live here so the
//! parser, renderer and binaries agree on them.

/// Name of the per-artifact metadata file that bypasses coordinate parsing.
pub const MAVEN_METADATA_FILE: &str = "maven-metadata.xml";

/// Version suffix marking a mutable snapshot build.
pub const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// Width of the file name column in a listing row, including the gap.
pub const FILE_COL_WIDTH: usize = 50;

/// Width of the size column in a listing row, including the gap.
pub const SIZE_COL_WIDTH: usize = 10;

/// Spaces between listing columns.
pub const GAP: usize = 2;

/// Appended to file names cut short in a listing row.
pub const TRUNCATION_MARKER: &str = "...";

/// Title used on listing pages when no repository name is configured.
pub const DEFAULT_REPOSITORY_NAME: &str = "Lambda Repo";

/// Directory (relative to the working directory) used for storage when no URL is configured.
pub const DEFAULT_STORAGE_DIR: &str = "repository";

/// Largest accepted upload when no limit is configured (256 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// Environment variable naming the storage URL.
pub const ENV_STORAGE_URL: &str = "LAMBDA_REPO_STORAGE_URL";

/// Environment variable naming the listing page title.
pub const ENV_REPOSITORY_NAME: &str = "LAMBDA_REPO_NAME";

/// Environment variable allowing an empty root listing to render instead of 404.
pub const ENV_ALLOW_EMPTY_ROOT: &str = "LAMBDA_REPO_ALLOW_EMPTY_ROOT";

/// Environment variable listing the checksum kinds accepted next to `maven-metadata.xml`.
pub const ENV_METADATA_CHECKSUMS: &str = "LAMBDA_REPO_METADATA_CHECKSUMS";

/// Environment variable capping upload size in bytes.
pub const ENV_MAX_UPLOAD_BYTES: &str = "LAMBDA_REPO_MAX_UPLOAD_BYTES";
