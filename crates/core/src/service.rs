//! Repository request handling.
//!
//! [`RepositoryService`] ties path resolution, storage and listing rendering together for
//! the two request classes the repository serves: reads (files or directory listings)
//! and writes. It returns structured outcomes and [`RepoError`]s; turning them into an
//! HTTP response is left to the caller.

use crate::classify::{classification, content_type, is_recognized_file};
use crate::coordinates::CoordinateParser;
use crate::listing::{aggregate, directory_key, sorted};
use crate::render::render_page;
use crate::{RepoConfig, RepoError, RepoResult};
use bytes::Bytes;
use repo_storage::ArtifactStore;
use repo_types::{DirectoryEntry, FileClassification, ParsedPath};
use std::sync::Arc;

/// A stored file ready to be returned to a client.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub key: String,
    pub classification: FileClassification,
    pub body: Bytes,
}

impl Artifact {
    pub fn content_type(&self) -> &'static str {
        content_type(self.classification)
    }

    /// Binary artifacts are sent as raw (or base64-encoded) bytes, everything else as text.
    pub fn is_binary(&self) -> bool {
        self.classification == FileClassification::Binary
    }

    /// The body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A rendered directory listing.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Directory key without leading or trailing `/`; empty for the root.
    pub path: String,
    pub entries: Vec<DirectoryEntry>,
    pub document: String,
}

/// Result of a read request.
#[derive(Debug, Clone)]
pub enum ReadOutcome {
    Artifact(Artifact),
    Listing(Listing),
    /// Directory requested without a trailing slash; the client should retry here.
    Redirect(String),
}

/// Handles repository reads and writes against one store.
#[derive(Clone)]
pub struct RepositoryService {
    store: ArtifactStore,
    config: Arc<RepoConfig>,
    parser: CoordinateParser,
}

impl RepositoryService {
    pub fn new(store: ArtifactStore, config: Arc<RepoConfig>) -> Self {
        let parser = CoordinateParser::new(config.metadata_checksums().to_vec());
        Self {
            store,
            config,
            parser,
        }
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Serves a file or a directory listing.
    ///
    /// `path` is the decoded repository path (`None` means the root). `request_path` is
    /// the path as the client sent it; a directory request whose `request_path` lacks a
    /// trailing `/` is redirected to `request_path + "/"` before anything is listed.
    ///
    /// # Errors
    ///
    /// - [`RepoError::NotFound`] if a file is missing or a directory has no entries (the
    ///   root may be configured to render empty instead)
    /// - [`RepoError::InvalidKey`] if the path cannot address a stored object
    /// - [`RepoError::Storage`] on any other storage failure
    pub async fn read(&self, path: Option<&str>, request_path: &str) -> RepoResult<ReadOutcome> {
        let key = directory_key(path.unwrap_or(""));
        let file_name = key.rsplit('/').next().unwrap_or_default();

        if is_recognized_file(file_name) {
            let body = self.store.get(&key).await?;
            tracing::debug!("serving {} ({} bytes)", key, body.len());
            return Ok(ReadOutcome::Artifact(Artifact {
                classification: classification(file_name),
                key,
                body,
            }));
        }

        if !request_path.ends_with('/') {
            return Ok(ReadOutcome::Redirect(format!("{request_path}/")));
        }

        let objects = self.store.list(&key).await?;
        let entries = sorted(aggregate(&key, &objects));
        if entries.is_empty() && !(key.is_empty() && self.config.allow_empty_root_listing()) {
            return Err(RepoError::NotFound(format!("{key}/")));
        }

        tracing::debug!("listing {}/ with {} entries", key, entries.len());
        let document = render_page(self.config.repository_name(), &key, &entries)?;
        Ok(ReadOutcome::Listing(Listing {
            path: key,
            entries,
            document,
        }))
    }

    /// Stores `body` at `path`.
    ///
    /// Only recognized repository files are accepted. A single leading `/` is ignored;
    /// otherwise the path is validated and stored exactly as given. Release artifacts are
    /// immutable: once stored they cannot be replaced, while snapshots and metadata files
    /// can.
    ///
    /// # Errors
    ///
    /// - [`RepoError::NotMavenFile`] if the file name is not recognized
    /// - [`RepoError::Parse`] if the path is not a valid coordinate
    /// - [`RepoError::ReleaseExists`] if a release file is already stored
    /// - [`RepoError::InvalidKey`] / [`RepoError::Storage`] from the store
    pub async fn write(&self, path: &str, body: Bytes) -> RepoResult<ParsedPath> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let file_name = path.rsplit('/').next().unwrap_or_default();
        if !is_recognized_file(file_name) {
            return Err(RepoError::NotMavenFile(path.to_owned()));
        }

        // Parsed as sent: empty segments are rejected, never collapsed into another key.
        let parsed = self.parser.parse(path)?;
        if !parsed.is_mutable() && self.store.exists(path).await? {
            return Err(RepoError::ReleaseExists(path.to_owned()));
        }

        let size = body.len();
        self.store.put(path, body).await?;
        tracing::info!("uploaded {} ({} bytes)", path, size);
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseError;
    use repo_types::ChecksumKind;

    const JAR: &str = "org/slf4j/slf4j-api/2.0.0/slf4j-api-2.0.0.jar";
    const POM: &str = "org/slf4j/slf4j-api/2.0.0/slf4j-api-2.0.0.pom";
    const SNAPSHOT_JAR: &str = "org/slf4j/slf4j-api/2.1.0-SNAPSHOT/slf4j-api-2.1.0-SNAPSHOT.jar";
    const METADATA: &str = "org/slf4j/slf4j-api/maven-metadata.xml";

    fn service_with(config: RepoConfig) -> RepositoryService {
        RepositoryService::new(ArtifactStore::in_memory(), Arc::new(config))
    }

    fn service() -> RepositoryService {
        service_with(RepoConfig::in_memory())
    }

    async fn seeded() -> RepositoryService {
        let service = service();
        service
            .write(JAR, Bytes::from_static(&[0x50, 0x4b, 0x03, 0x04, 0xff]))
            .await
            .unwrap();
        service
            .write(POM, Bytes::from_static(b"<project/>"))
            .await
            .unwrap();
        service
            .write(METADATA, Bytes::from_static(b"<metadata/>"))
            .await
            .unwrap();
        service
    }

    fn listing(outcome: ReadOutcome) -> Listing {
        match outcome {
            ReadOutcome::Listing(listing) => listing,
            other => panic!("expected listing, got {other:?}"),
        }
    }

    fn artifact(outcome: ReadOutcome) -> Artifact {
        match outcome {
            ReadOutcome::Artifact(artifact) => artifact,
            other => panic!("expected artifact, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_binary_artifact() {
        let service = seeded().await;
        let artifact = artifact(service.read(Some(JAR), JAR).await.unwrap());

        assert!(artifact.is_binary());
        assert_eq!(artifact.content_type(), "application/java-archive");
        assert_eq!(&artifact.body[..], &[0x50, 0x4b, 0x03, 0x04, 0xff]);
    }

    #[tokio::test]
    async fn test_read_xml_and_text() {
        let service = seeded().await;
        let pom = artifact(service.read(Some(POM), POM).await.unwrap());
        assert_eq!(pom.content_type(), "text/xml");
        assert_eq!(pom.text(), "<project/>");

        service
            .write(&format!("{JAR}.sha1"), Bytes::from_static(b"abc123"))
            .await
            .unwrap();
        let sha1 = artifact(
            service
                .read(Some(&format!("/{JAR}.sha1")), "ignored")
                .await
                .unwrap(),
        );
        assert_eq!(sha1.content_type(), "text/plain");
        assert_eq!(sha1.key, format!("{JAR}.sha1"));
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let service = seeded().await;
        let result = service
            .read(Some("org/slf4j/slf4j-api/9.9/slf4j-api-9.9.jar"), "")
            .await;
        assert!(matches!(result, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_directory_without_slash_redirects() {
        let service = seeded().await;
        let outcome = service
            .read(Some("org/slf4j"), "/repository/org/slf4j")
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            ReadOutcome::Redirect(ref loc) if loc == "/repository/org/slf4j/"
        ));

        // Redirect happens even when nothing would be listed.
        let outcome = service.read(Some("nothing/here"), "/nothing/here").await.unwrap();
        assert!(matches!(outcome, ReadOutcome::Redirect(_)));
    }

    #[tokio::test]
    async fn test_directory_listing() {
        let service = seeded().await;
        let listing = listing(
            service
                .read(Some("org/slf4j/slf4j-api/"), "/org/slf4j/slf4j-api/")
                .await
                .unwrap(),
        );

        assert_eq!(listing.path, "org/slf4j/slf4j-api");
        let names: Vec<_> = listing.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["2.0.0/", "maven-metadata.xml"]);
        assert!(listing.document.contains("<a href=\"../\">../</a>"));
        assert!(listing
            .document
            .contains("<a href=\"2.0.0/\" title=\"2.0.0/\">2.0.0/</a>"));
    }

    #[tokio::test]
    async fn test_root_listing() {
        let service = seeded().await;
        let listing = listing(service.read(None, "/").await.unwrap());
        assert_eq!(listing.path, "");
        assert_eq!(listing.entries.len(), 1);
        assert_eq!(listing.entries[0].name, "org/");
        assert!(!listing.document.contains("href=\"../\""));
    }

    #[tokio::test]
    async fn test_empty_directory_is_not_found() {
        let service = seeded().await;
        let result = service.read(Some("com/acme/"), "/com/acme/").await;
        assert!(matches!(result, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_root_policy() {
        let result = service().read(None, "/").await;
        assert!(matches!(result, Err(RepoError::NotFound(_))));

        let config = RepoConfig::new(
            "memory:///".into(),
            "Empty".into(),
            true,
            ChecksumKind::ALL.to_vec(),
            1024,
        )
        .unwrap();
        let listing = listing(service_with(config).read(None, "/").await.unwrap());
        assert!(listing.entries.is_empty());
        assert!(listing.document.contains("Empty Repository"));
    }

    #[tokio::test]
    async fn test_write_rejects_unrecognized_files() {
        let service = service();
        for path in ["org/acme/app/1.0/readme.txt", "org/acme/app/1.0/.jar", "org/acme/"] {
            let result = service.write(path, Bytes::new()).await;
            assert!(matches!(result, Err(RepoError::NotMavenFile(_))), "{path}");
        }
    }

    #[tokio::test]
    async fn test_write_rejects_invalid_coordinates() {
        let service = service();
        let result = service.write("a.b/c/1.0/c-1.0.jar", Bytes::new()).await;
        assert!(matches!(
            result,
            Err(RepoError::Parse(ParseError::InvalidGroupSegment))
        ));
        let result = service.write("a/c-1.0.jar", Bytes::new()).await;
        assert!(matches!(result, Err(RepoError::Parse(ParseError::TooShort))));
    }

    #[tokio::test]
    async fn test_write_rejects_empty_segments() {
        let service = service();

        let result = service.write("org//c/1.0/c-1.0.jar", Bytes::new()).await;
        assert!(matches!(
            result,
            Err(RepoError::Parse(ParseError::InvalidGroupSegment))
        ));
        let result = service.write("a/b//c.jar", Bytes::new()).await;
        assert!(matches!(
            result,
            Err(RepoError::Parse(ParseError::InvalidVersion))
        ));

        assert!(!service.store().exists("org/c/1.0/c-1.0.jar").await.unwrap());
        assert!(service.store().list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_strips_one_leading_slash() {
        let service = service();
        service
            .write("/org/c/1.0/c-1.0.pom", Bytes::from_static(b"<project/>"))
            .await
            .unwrap();
        assert!(service.store().exists("org/c/1.0/c-1.0.pom").await.unwrap());

        let result = service.write("//org/c/1.0/c-1.0.jar", Bytes::new()).await;
        assert!(matches!(
            result,
            Err(RepoError::Parse(ParseError::InvalidGroupSegment))
        ));
    }

    #[tokio::test]
    async fn test_metadata_with_empty_segment_is_not_rewritten() {
        let service = service();
        let result = service
            .write("org//maven-metadata.xml", Bytes::from_static(b"<metadata/>"))
            .await;
        assert!(matches!(result, Err(RepoError::InvalidKey(_))));
        assert!(service.store().list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_release_is_immutable() {
        let service = seeded().await;
        let result = service.write(JAR, Bytes::from_static(b"other")).await;
        assert!(matches!(result, Err(RepoError::ReleaseExists(_))));

        let stored = artifact(service.read(Some(JAR), JAR).await.unwrap());
        assert_eq!(stored.body.len(), 5);
    }

    #[tokio::test]
    async fn test_snapshot_and_metadata_can_be_replaced() {
        let service = seeded().await;
        service
            .write(SNAPSHOT_JAR, Bytes::from_static(b"one"))
            .await
            .unwrap();
        let parsed = service
            .write(SNAPSHOT_JAR, Bytes::from_static(b"two"))
            .await
            .unwrap();
        assert!(parsed.is_mutable());
        let stored = artifact(service.read(Some(SNAPSHOT_JAR), "").await.unwrap());
        assert_eq!(&stored.body[..], b"two");

        let parsed = service
            .write(METADATA, Bytes::from_static(b"<metadata>2</metadata>"))
            .await
            .unwrap();
        assert!(parsed.is_metadata());
        let stored = artifact(service.read(Some(METADATA), "").await.unwrap());
        assert_eq!(stored.text(), "<metadata>2</metadata>");
    }

    #[tokio::test]
    async fn test_invalid_key_is_reported() {
        let service = service();
        let result = service
            .write("org/../acme/app/1.0/app-1.0.jar", Bytes::new())
            .await;
        // ".." fails group validation before reaching storage.
        assert!(matches!(result, Err(RepoError::Parse(_))));

        let result = service.read(Some("org/acme/../../x.jar"), "").await;
        assert!(matches!(result, Err(RepoError::InvalidKey(_))));
    }
}
