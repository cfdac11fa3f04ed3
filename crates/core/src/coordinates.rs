//! Repository path to coordinate resolution.
//!
//! The storage layout encodes dot-separated group ids as slash-separated prefixes:
//!
//! ```text
//! org/slf4j/slf4j-api/2.0.0/slf4j-api-2.0.0.pom
//! └──┬────┘ └───┬───┘ └─┬─┘ └────────┬────────┘
//!  group    artifact version        file
//! ```
//!
//! A group segment containing a `.` would make the path <-> group id mapping ambiguous,
//! so such paths are rejected. `maven-metadata.xml` (and its checksums) sit directly
//! under the artifact directory and skip structural validation entirely.

use crate::classify::{is_metadata_file_with, is_recognized_file};
use crate::constants::SNAPSHOT_SUFFIX;
use crate::ParseError;
use repo_types::{ChecksumKind, GavCoordinate, ParsedPath};

/// Resolves repository paths, treating the configured checksum kinds as metadata files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateParser {
    metadata_checksums: Vec<ChecksumKind>,
}

impl Default for CoordinateParser {
    fn default() -> Self {
        Self::new(ChecksumKind::ALL.to_vec())
    }
}

impl CoordinateParser {
    pub fn new(metadata_checksums: Vec<ChecksumKind>) -> Self {
        Self { metadata_checksums }
    }

    pub fn is_metadata_file(&self, name: &str) -> bool {
        is_metadata_file_with(name, &self.metadata_checksums)
    }

    /// Parses `path` into a metadata marker or a full coordinate.
    ///
    /// # Errors
    ///
    /// Checks run in this order, the first failure wins:
    /// - [`ParseError::NoSeparator`] if `path` has no `/`
    /// - [`ParseError::UnrecognizedFile`] if the last segment is neither metadata nor a
    ///   recognized file
    /// - [`ParseError::TooShort`] with fewer than four segments
    /// - [`ParseError::InvalidVersion`] / [`ParseError::InvalidArtifactId`] for empty segments
    /// - [`ParseError::InvalidGroupSegment`] for an empty or dotted group segment
    pub fn parse(&self, path: &str) -> Result<ParsedPath, ParseError> {
        if !path.contains('/') {
            return Err(ParseError::NoSeparator);
        }

        let segments: Vec<&str> = path.split('/').collect();
        let count = segments.len();
        let file = segments[count - 1];

        if self.is_metadata_file(file) {
            return Ok(ParsedPath::Metadata {
                file: file.to_owned(),
            });
        }
        if !is_recognized_file(file) {
            return Err(ParseError::UnrecognizedFile);
        }
        if count < 4 {
            return Err(ParseError::TooShort);
        }

        let version = segments[count - 2];
        if version.is_empty() {
            return Err(ParseError::InvalidVersion);
        }

        let artifact_id = segments[count - 3];
        if artifact_id.is_empty() {
            return Err(ParseError::InvalidArtifactId);
        }

        let group = &segments[..count - 3];
        if group.iter().any(|segment| segment.is_empty() || segment.contains('.')) {
            return Err(ParseError::InvalidGroupSegment);
        }

        Ok(ParsedPath::Artifact(GavCoordinate {
            group_id: group.join("."),
            artifact_id: artifact_id.to_owned(),
            version: version.to_owned(),
            file: file.to_owned(),
            is_snapshot: version.ends_with(SNAPSHOT_SUFFIX),
        }))
    }
}

/// Parses `path` with the default metadata checksum kinds.
pub fn parse_path(path: &str) -> Result<ParsedPath, ParseError> {
    CoordinateParser::default().parse(path)
}
