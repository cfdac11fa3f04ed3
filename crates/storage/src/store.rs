//! Key-addressed artifact storage backed by `object_store`
//!
//! [`ArtifactStore`] wraps a shared `dyn ObjectStore` together with the key prefix taken
//! from the storage URL. All operations are scoped to that prefix.
//!
//! # Key handling
//!
//! - Keys are validated with [`Path::parse`], which rejects empty, `.` and `..` segments
//! - A leading or trailing `/` on a key is ignored
//! - Listing keys are reported relative to the store prefix, so they can be fed straight
//!   back into [`ArtifactStore::get`]

use crate::{StorageError, StorageResult};
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::{
    memory::InMemory, parse_url_opts, path::Path, ObjectStore, ObjectStoreScheme, PutPayload,
};
use repo_types::ListedObject;
use std::sync::Arc;
use url::Url;

/// Object store client scoped to one repository root.
#[derive(Clone)]
pub struct ArtifactStore {
    object_store: Arc<dyn ObjectStore>,
    root: Path,
}

impl std::fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("object_store", &self.object_store.to_string())
            .field("root", &self.root)
            .finish()
    }
}

impl ArtifactStore {
    /// Wraps an existing object store, resolving keys under `root`.
    pub fn new(object_store: Arc<dyn ObjectStore>, root: Path) -> Self {
        Self { object_store, root }
    }

    /// An empty store held in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), Path::default())
    }

    /// Builds a store from a URL such as `file:///srv/maven` or `s3://bucket/prefix`.
    ///
    /// For S3 URLs, `AWS_*` environment variables are passed to the builder so that
    /// explicit keys take priority over instance metadata credentials.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidUrl`] if the URL does not parse or names a scheme
    /// `object_store` cannot handle, and [`StorageError::Backend`] if the backend cannot
    /// be constructed.
    pub fn from_url(url_str: &str) -> StorageResult<Self> {
        let url = Url::parse(url_str).map_err(|e| StorageError::InvalidUrl {
            url: url_str.to_owned(),
            reason: e.to_string(),
        })?;
        let (scheme, _) = ObjectStoreScheme::parse(&url).map_err(|e| StorageError::InvalidUrl {
            url: url_str.to_owned(),
            reason: e.to_string(),
        })?;

        let opts: Vec<(String, String)> = match scheme {
            ObjectStoreScheme::AmazonS3 => std::env::vars()
                .filter(|(key, _)| key.starts_with("AWS_"))
                .map(|(key, value)| (key.to_ascii_lowercase(), value))
                .collect(),
            _ => Vec::new(),
        };

        let (object_store, root) = parse_url_opts(&url, opts)?;
        tracing::info!("using object store {} with root '{}'", object_store, root);

        Ok(Self::new(Arc::from(object_store), root))
    }

    /// Reads the full contents of the object stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if there is no such object.
    pub async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let location = self.location(key)?;
        let result = self
            .object_store
            .get(&location)
            .await
            .map_err(|e| not_found_or_backend(key, e))?;
        result.bytes().await.map_err(|e| not_found_or_backend(key, e))
    }

    /// Stores `body` under `key`, replacing any existing object.
    pub async fn put(&self, key: &str, body: Bytes) -> StorageResult<()> {
        let location = self.location(key)?;
        let size = body.len();
        self.object_store
            .put(&location, PutPayload::from(body))
            .await?;
        tracing::debug!("stored {} bytes at {}", size, location);
        Ok(())
    }

    /// Returns whether an object exists under `key`, without reading it.
    pub async fn exists(&self, key: &str) -> StorageResult<bool> {
        let location = self.location(key)?;
        match self.object_store.head(&location).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::Backend(e)),
        }
    }

    /// Lists every object below `prefix`, recursively.
    ///
    /// Prefixes match whole segments: `org/slf4j` covers `org/slf4j/x` but not
    /// `org/slf4j-api/x`. An empty prefix lists the whole store. Returned keys are
    /// relative to the store root and always carry a timestamp and size.
    pub async fn list(&self, prefix: &str) -> StorageResult<Vec<ListedObject>> {
        let location = self.location(prefix)?;
        let scope = (location.parts().count() > 0).then_some(&location);

        let metas: Vec<_> = self.object_store.list(scope).try_collect().await?;
        let objects = metas
            .into_iter()
            .filter_map(|meta| {
                let key = self.relative_key(&meta.location)?;
                Some(ListedObject::new(key, meta.last_modified, meta.size))
            })
            .collect::<Vec<_>>();

        tracing::debug!("listed {} objects under '{}'", objects.len(), location);
        Ok(objects)
    }

    fn location(&self, key: &str) -> StorageResult<Path> {
        let relative = Path::parse(key).map_err(|source| StorageError::InvalidKey {
            key: key.to_owned(),
            source,
        })?;
        Ok(Path::from_iter(self.root.parts().chain(relative.parts())))
    }

    fn relative_key(&self, location: &Path) -> Option<String> {
        let parts = location
            .prefix_match(&self.root)?
            .map(|part| part.as_ref().to_owned())
            .collect::<Vec<_>>();
        (!parts.is_empty()).then(|| parts.join("/"))
    }
}

fn not_found_or_backend(key: &str, error: object_store::Error) -> StorageError {
    match error {
        object_store::Error::NotFound { .. } => StorageError::NotFound(key.to_owned()),
        other => StorageError::Backend(other),
    }
}
