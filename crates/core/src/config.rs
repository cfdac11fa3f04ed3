//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! [`RepositoryService`](crate::RepositoryService). Request handling never reads
//! process-wide environment variables.

use crate::constants::{
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_REPOSITORY_NAME, DEFAULT_STORAGE_DIR, ENV_ALLOW_EMPTY_ROOT,
    ENV_MAX_UPLOAD_BYTES, ENV_METADATA_CHECKSUMS, ENV_REPOSITORY_NAME, ENV_STORAGE_URL,
};
use crate::{ConfigError, ConfigResult};
use repo_types::ChecksumKind;

/// Repository configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct RepoConfig {
    storage_url: String,
    repository_name: String,
    allow_empty_root_listing: bool,
    metadata_checksums: Vec<ChecksumKind>,
    max_upload_bytes: usize,
}

impl RepoConfig {
    /// Create a new `RepoConfig`.
    pub fn new(
        storage_url: String,
        repository_name: String,
        allow_empty_root_listing: bool,
        metadata_checksums: Vec<ChecksumKind>,
        max_upload_bytes: usize,
    ) -> ConfigResult<Self> {
        if storage_url.trim().is_empty() {
            return Err(ConfigError::InvalidInput(
                "storage_url cannot be empty".into(),
            ));
        }
        if repository_name.trim().is_empty() {
            return Err(ConfigError::InvalidInput(
                "repository_name cannot be empty".into(),
            ));
        }
        if max_upload_bytes == 0 {
            return Err(ConfigError::InvalidInput(
                "max_upload_bytes must be greater than zero".into(),
            ));
        }

        Ok(Self {
            storage_url,
            repository_name,
            allow_empty_root_listing,
            metadata_checksums,
            max_upload_bytes,
        })
    }

    /// In-memory storage with every other setting at its default. Used by tests and demos.
    pub fn in_memory() -> Self {
        Self {
            storage_url: "memory:///".into(),
            repository_name: DEFAULT_REPOSITORY_NAME.into(),
            allow_empty_root_listing: false,
            metadata_checksums: ChecksumKind::ALL.to_vec(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Resolve configuration from a variable lookup, typically `std::env::var`.
    ///
    /// Unset or blank variables fall back to their defaults; the storage URL defaults to
    /// `repository/` under the current working directory.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let value = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let storage_url = match value(ENV_STORAGE_URL) {
            Some(url) => url,
            None => default_storage_url()?,
        };
        let repository_name =
            value(ENV_REPOSITORY_NAME).unwrap_or_else(|| DEFAULT_REPOSITORY_NAME.into());
        let allow_empty_root_listing =
            bool_from_env_value(ENV_ALLOW_EMPTY_ROOT, value(ENV_ALLOW_EMPTY_ROOT))?;
        let metadata_checksums = metadata_checksums_from_env_value(value(ENV_METADATA_CHECKSUMS))?;
        let max_upload_bytes = match value(ENV_MAX_UPLOAD_BYTES) {
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                ConfigError::InvalidInput(format!(
                    "{ENV_MAX_UPLOAD_BYTES} must be a byte count, got '{raw}'"
                ))
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Self::new(
            storage_url,
            repository_name,
            allow_empty_root_listing,
            metadata_checksums,
            max_upload_bytes,
        )
    }

    pub fn storage_url(&self) -> &str {
        &self.storage_url
    }

    pub fn repository_name(&self) -> &str {
        &self.repository_name
    }

    /// Whether an empty root listing renders an empty table (200) rather than 404.
    pub fn allow_empty_root_listing(&self) -> bool {
        self.allow_empty_root_listing
    }

    pub fn metadata_checksums(&self) -> &[ChecksumKind] {
        &self.metadata_checksums
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn default_storage_url() -> ConfigResult<String> {
    let cwd = std::env::current_dir().map_err(ConfigError::WorkingDir)?;
    Ok(format!("file://{}", cwd.join(DEFAULT_STORAGE_DIR).display()))
}

/// Parse a comma-separated checksum list such as `md5,sha1`.
///
/// `None` selects every supported kind. An explicit empty list (`none`) disables the
/// checksum variants so only `maven-metadata.xml` itself bypasses coordinate parsing.
pub fn metadata_checksums_from_env_value(value: Option<String>) -> ConfigResult<Vec<ChecksumKind>> {
    let Some(value) = value else {
        return Ok(ChecksumKind::ALL.to_vec());
    };
    if value.trim().eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }

    let mut kinds = Vec::new();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let kind = part.parse::<ChecksumKind>()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

/// Parse a boolean flag; accepts `true/false`, `1/0`, `yes/no`, `on/off`.
pub fn bool_from_env_value(name: &str, value: Option<String>) -> ConfigResult<bool> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidInput(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}
