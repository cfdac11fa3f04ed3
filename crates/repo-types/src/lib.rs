//! Shared data model for Lambda Repo.
//!
//! These types are built fresh for every request from the inbound path or from the
//! storage listing, and never outlive it. They carry no I/O logic.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when building validated model values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    /// The checksum algorithm name is not one we store alongside artifacts
    #[error("unknown checksum kind: {0}")]
    UnknownChecksumKind(String),
}

/// How a repository file name should be handled, derived from its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileClassification {
    /// Archives: `.jar`, `.war`, `.ear`, `.zip`
    Binary,
    /// `.xml` and `.pom`
    Xml,
    /// `.sha1`, `.sha256`, `.sha512`, `.md5`
    Checksum,
    /// `.asc`
    Signature,
    /// Anything without a recognized suffix
    Plain,
}

impl fmt::Display for FileClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Binary => "binary",
            Self::Xml => "xml",
            Self::Checksum => "checksum",
            Self::Signature => "signature",
            Self::Plain => "plain",
        };
        f.write_str(name)
    }
}

/// Checksum algorithms whose files are published next to artifacts and metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumKind {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl ChecksumKind {
    /// Every supported kind, in suffix-table order.
    pub const ALL: [ChecksumKind; 4] = [Self::Sha1, Self::Sha256, Self::Sha512, Self::Md5];

    /// File suffix including the leading dot, e.g. `.sha1`.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Md5 => ".md5",
            Self::Sha1 => ".sha1",
            Self::Sha256 => ".sha256",
            Self::Sha512 => ".sha512",
        }
    }
}

impl fmt::Display for ChecksumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.suffix()[1..])
    }
}

impl FromStr for ChecksumKind {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            _ => Err(TypesError::UnknownChecksumKind(s.to_owned())),
        }
    }
}

/// Group / artifact / version coordinate of a file inside a Maven layout.
///
/// The storage layout encodes the dot-separated group id as path segments, so
/// `org/slf4j/slf4j-api/2.0.0/slf4j-api-2.0.0.pom` has group id `org.slf4j`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GavCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub file: String,
    pub is_snapshot: bool,
}

impl GavCoordinate {
    /// The group id with its dots turned back into path separators.
    pub fn group_path(&self) -> String {
        self.group_id.replace('.', "/")
    }

    /// Repository path this coordinate was parsed from.
    pub fn to_path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.group_path(),
            self.artifact_id,
            self.version,
            self.file
        )
    }
}

/// Outcome of resolving a repository path.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParsedPath {
    /// `maven-metadata.xml` or one of its checksums; no coordinate is derived.
    Metadata { file: String },
    /// A file under a full group/artifact/version directory.
    #[serde(rename = "normal")]
    Artifact(GavCoordinate),
}

impl ParsedPath {
    pub fn is_metadata(&self) -> bool {
        matches!(self, Self::Metadata { .. })
    }

    /// Whether a stored copy may be replaced by a later upload.
    pub fn is_mutable(&self) -> bool {
        match self {
            Self::Metadata { .. } => true,
            Self::Artifact(gav) => gav.is_snapshot,
        }
    }
}

/// One object as reported by a storage prefix listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedObject {
    pub key: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub size: Option<u64>,
}

impl ListedObject {
    pub fn new(key: impl Into<String>, last_modified: DateTime<Utc>, size: u64) -> Self {
        Self {
            key: key.into(),
            last_modified: Some(last_modified),
            size: Some(size),
        }
    }
}

/// An immediate child shown in a directory listing.
///
/// Directory names end with `/` and report a size of zero.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
    pub is_directory: bool,
}
