//! Directory listing aggregation.
//!
//! Object stores have no directories: a prefix listing returns every key below the
//! prefix, however deep. This module collapses those keys into the immediate children of
//! the requested directory, the way a filesystem listing would show them.
//!
//! ```text
//! requested: org/slf4j/
//! keys:      org/slf4j/slf4j-api/2.0.0/slf4j-api-2.0.0.jar   -> slf4j-api/
//!            org/slf4j/slf4j-api/maven-metadata.xml          -> slf4j-api/
//!            org/slf4j/README.jar                            -> README.jar
//! ```
//!
//! Synthetic directory entries report the newest timestamp among the keys they cover.

use crate::classify::is_recognized_file;
use chrono::{DateTime, Utc};
use repo_types::{DirectoryEntry, ListedObject};
use std::collections::HashMap;

/// Splits a directory path into its segments, ignoring leading, trailing and repeated `/`.
///
/// The root (`""` or `/`) has no segments.
pub fn directory_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// The storage prefix for a directory path: segments joined by `/`, without leading or
/// trailing separators. Empty for the root.
pub fn directory_key(path: &str) -> String {
    directory_segments(path).join("/")
}

/// Immediate children of `requested_path`, using the current time for objects without a
/// timestamp.
pub fn aggregate(requested_path: &str, objects: &[ListedObject]) -> Vec<DirectoryEntry> {
    aggregate_at(requested_path, objects, Utc::now())
}

/// Immediate children of `requested_path` among `objects`, in order of first appearance.
///
/// Objects outside the requested directory, or with empty keys, are skipped. A child is a
/// file entry only when it is the last segment of its key and a recognized file name;
/// everything else becomes a directory entry named with a trailing `/`. Repeated names
/// are merged into one entry: directories keep the newest timestamp seen, files keep the
/// newest object.
pub fn aggregate_at(
    requested_path: &str,
    objects: &[ListedObject],
    now: DateTime<Utc>,
) -> Vec<DirectoryEntry> {
    let prefix = directory_segments(requested_path);

    let mut entries: Vec<DirectoryEntry> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for object in objects {
        let Some(entry) = child_entry(&prefix, object, now) else {
            continue;
        };

        match by_name.get(&entry.name) {
            Some(&index) => merge(&mut entries[index], entry),
            None => {
                by_name.insert(entry.name.clone(), entries.len());
                entries.push(entry);
            }
        }
    }

    entries
}

/// Returns `entries` ordered by name.
pub fn sorted(mut entries: Vec<DirectoryEntry>) -> Vec<DirectoryEntry> {
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

fn child_entry(
    prefix: &[&str],
    object: &ListedObject,
    now: DateTime<Utc>,
) -> Option<DirectoryEntry> {
    if object.key.is_empty() {
        return None;
    }

    let parts: Vec<&str> = object.key.split('/').collect();
    if parts.len() <= prefix.len() || parts[..prefix.len()] != *prefix {
        return None;
    }

    let name = parts[prefix.len()];
    if name.is_empty() {
        return None;
    }

    let last_modified = object.last_modified.unwrap_or(now);
    let is_terminal = parts.len() == prefix.len() + 1;

    if is_terminal && is_recognized_file(name) {
        Some(DirectoryEntry {
            name: name.to_owned(),
            last_modified,
            size: object.size.unwrap_or(0),
            is_directory: false,
        })
    } else {
        Some(DirectoryEntry {
            name: format!("{name}/"),
            last_modified,
            size: 0,
            is_directory: true,
        })
    }
}

fn merge(existing: &mut DirectoryEntry, incoming: DirectoryEntry) {
    if incoming.last_modified <= existing.last_modified {
        return;
    }
    if existing.is_directory {
        existing.last_modified = incoming.last_modified;
    } else {
        *existing = incoming;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn object(key: &str, secs: i64, size: u64) -> ListedObject {
        ListedObject::new(key, at(secs), size)
    }

    fn names(entries: &[DirectoryEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_files_and_directories() {
        let objects = vec![
            object("org/slf4j/slf4j-api/2.0.0/slf4j-api-2.0.0.jar", 10, 100),
            object("org/slf4j/slf4j-api/2.0.0/slf4j-api-2.0.0.pom", 20, 50),
            object("org/slf4j/slf4j-api/maven-metadata.xml", 30, 7),
        ];

        let entries = aggregate_at("org/slf4j/slf4j-api/", &objects, at(0));
        assert_eq!(names(&entries), vec!["2.0.0/", "maven-metadata.xml"]);

        let version = &entries[0];
        assert!(version.is_directory);
        assert_eq!(version.size, 0);
        assert_eq!(version.last_modified, at(20));

        let metadata = &entries[1];
        assert!(!metadata.is_directory);
        assert_eq!(metadata.size, 7);
        assert_eq!(metadata.last_modified, at(30));
    }

    #[test]
    fn test_directory_takes_newest_timestamp() {
        let objects = vec![
            object("com/acme/a/1.0/a-1.0.jar", 200, 1),
            object("com/acme/b/1.0/b-1.0.jar", 500, 1),
            object("com/acme/c/1.0/c-1.0.jar", 100, 1),
            object("com/other/x/1.0/x-1.0.jar", 900, 1),
        ];

        let entries = aggregate_at("com", &objects, at(0));
        assert_eq!(names(&entries), vec!["acme/", "other/"]);
        assert_eq!(entries[0].last_modified, at(500));
        assert_eq!(entries[1].last_modified, at(900));
    }

    #[test]
    fn test_duplicate_keys_are_idempotent() {
        let key = "org/slf4j/slf4j-api/2.0.0/slf4j-api-2.0.0.jar";
        let once = aggregate_at("org", &[object(key, 42, 10)], at(0));
        let twice = aggregate_at("org", &[object(key, 42, 10), object(key, 42, 10)], at(0));

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
        assert_eq!(twice[0].name, "slf4j/");
        assert_eq!(twice[0].last_modified, at(42));
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let objects = vec![
            object("z/1.0/z.jar", 1, 1),
            object("a/1.0/a.jar", 1, 1),
            object("m.pom", 1, 1),
            object("a/2.0/a.jar", 1, 1),
        ];

        let entries = aggregate_at("/", &objects, at(0));
        assert_eq!(names(&entries), vec!["z/", "a/", "m.pom"]);
        assert_eq!(names(&sorted(entries)), vec!["a/", "m.pom", "z/"]);
    }

    #[test]
    fn test_root_has_no_prefix() {
        let objects = vec![
            object("org/x/y/1/y-1.jar", 1, 1),
            object("com/x/y/1/y-1.jar", 2, 1),
        ];
        for root in ["", "/", "//"] {
            assert_eq!(names(&aggregate_at(root, &objects, at(0))), vec!["org/", "com/"]);
        }
    }

    #[test]
    fn test_unrecognized_terminal_names_are_directories() {
        let objects = vec![
            object("docs/readme.txt", 1, 5),
            object("docs/lib.jar/inner.pom", 1, 5),
        ];

        let entries = aggregate_at("docs", &objects, at(0));
        assert_eq!(names(&entries), vec!["readme.txt/", "lib.jar/"]);
        assert!(entries.iter().all(|e| e.is_directory && e.size == 0));
    }

    #[test]
    fn test_defensive_skips() {
        let objects = vec![
            object("", 1, 1),
            object("org", 1, 1),
            object("org/slf4j", 1, 1),
            object("com/slf4j/x/1.0/x.jar", 1, 1),
            object("org/slf4j-api/x/1.0/x.jar", 1, 1),
            object("org/slf4j/", 1, 1),
            object("org/slf4j//x.jar", 1, 1),
        ];

        assert!(aggregate_at("org/slf4j", &objects, at(0)).is_empty());
    }

    #[test]
    fn test_missing_values_default() {
        let objects = vec![
            ListedObject {
                key: "g/a.pom".into(),
                last_modified: None,
                size: None,
            },
            ListedObject {
                key: "g/sub/a.pom".into(),
                last_modified: None,
                size: None,
            },
        ];

        let entries = aggregate_at("g", &objects, at(77));
        assert_eq!(entries[0].last_modified, at(77));
        assert_eq!(entries[0].size, 0);
        assert_eq!(entries[1].last_modified, at(77));
    }

    #[test]
    fn test_duplicate_file_keeps_newest() {
        let objects = vec![
            object("g/a.pom", 5, 10),
            object("g/a.pom", 9, 20),
            object("g/a.pom", 7, 30),
        ];
        let entries = aggregate_at("g", &objects, at(0));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].last_modified, at(9));
        assert_eq!(entries[0].size, 20);
    }

    #[test]
    fn test_directory_key() {
        assert_eq!(directory_key("/org/slf4j/"), "org/slf4j");
        assert_eq!(directory_key("org"), "org");
        assert_eq!(directory_key("/"), "");
        assert_eq!(directory_key(""), "");
    }
}
