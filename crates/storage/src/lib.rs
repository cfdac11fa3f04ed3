//! Lambda Repo object storage
//!
//! This crate is the storage collaborator behind the repository: it reads, writes and
//! lists raw artifact bytes by exact key. It knows nothing about Maven layouts; keys are
//! opaque slash-separated strings and bytes are stored verbatim.
//!
//! ## Backends
//!
//! Any backend supported by `object_store` can be addressed by URL:
//!
//! ```text
//! file:///srv/maven          # local directory
//! memory:///                 # in-process, for tests and demos
//! s3://bucket/releases       # Amazon S3, configured from AWS_* variables
//! ```
//!
//! The path part of the URL is a key prefix; every key handed to [`ArtifactStore`] is
//! resolved under it, and keys returned by listings are relative to it again.
//!
//! ## Example Usage
//!
//! ```no_run
//! use repo_storage::ArtifactStore;
//!
//! # async fn run() -> Result<(), repo_storage::StorageError> {
//! let store = ArtifactStore::from_url("memory:///")?;
//! store.put("org/example/demo/1.0/demo-1.0.pom", "<project/>".into()).await?;
//! let listing = store.list("org/example").await?;
//! assert_eq!(listing.len(), 1);
//! # Ok(())
//! # }
//! ```

mod store;

pub use repo_types::ListedObject;
pub use store::ArtifactStore;

/// Errors that can occur while talking to the object store
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No object exists under the requested key
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The key cannot be expressed as an object store path (empty or relative segments)
    #[error("Invalid key {key}: {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: object_store::path::Error,
    },

    /// The storage URL could not be parsed or names an unsupported scheme
    #[error("Invalid storage URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Any other backend failure
    #[error("Object store error: {0}")]
    Backend(#[from] object_store::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;
