//! File name classification.
//!
//! Decides from a name's suffix whether it is a file the repository serves and how its
//! bytes should be handled. Everything here is a pure function over strings.

use crate::constants::MAVEN_METADATA_FILE;
use repo_types::{ChecksumKind, FileClassification};

const BINARY_SUFFIXES: &[&str] = &[".jar", ".war", ".ear", ".zip"];
const CHECKSUM_SUFFIXES: &[&str] = &[".sha1", ".sha256", ".sha512", ".md5"];
const XML_SUFFIXES: &[&str] = &[".xml", ".pom"];
const SIGNATURE_SUFFIXES: &[&str] = &[".asc"];

/// Suffix table in matching order. The suffix sets are disjoint.
const SUFFIX_TABLE: [(FileClassification, &[&str]); 4] = [
    (FileClassification::Binary, BINARY_SUFFIXES),
    (FileClassification::Checksum, CHECKSUM_SUFFIXES),
    (FileClassification::Xml, XML_SUFFIXES),
    (FileClassification::Signature, SIGNATURE_SUFFIXES),
];

/// Returns the class of the first suffix table entry `name` ends with.
pub fn classify(name: &str) -> Option<FileClassification> {
    SUFFIX_TABLE
        .iter()
        .find(|(_, suffixes)| suffixes.iter().any(|suffix| name.ends_with(suffix)))
        .map(|(class, _)| *class)
}

/// Like [`classify`], reporting unrecognized names as [`FileClassification::Plain`].
pub fn classification(name: &str) -> FileClassification {
    classify(name).unwrap_or(FileClassification::Plain)
}

/// True if `name` has a recognized suffix and a non-empty base name.
///
/// A name made of the suffix alone (`.jar`) is not a file.
pub fn is_recognized_file(name: &str) -> bool {
    classify(name).is_some() && name.rfind('.').is_some_and(|dot| dot > 0)
}

/// True for `maven-metadata.xml` and its checksum files.
pub fn is_metadata_file(name: &str) -> bool {
    is_metadata_file_with(name, &ChecksumKind::ALL)
}

/// Like [`is_metadata_file`], accepting only the given checksum kinds.
pub fn is_metadata_file_with(name: &str, checksums: &[ChecksumKind]) -> bool {
    match name.strip_prefix(MAVEN_METADATA_FILE) {
        Some("") => true,
        Some(rest) => checksums.iter().any(|kind| kind.suffix() == rest),
        None => false,
    }
}

/// `Content-Type` header value for a classification.
pub fn content_type(classification: FileClassification) -> &'static str {
    match classification {
        FileClassification::Binary => "application/java-archive",
        FileClassification::Xml => "text/xml",
        _ => "text/plain",
    }
}
