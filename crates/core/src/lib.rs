//! # Lambda Repo Core
//!
//! Path resolution and listing logic for a Maven repository served from an object store.
//!
//! This crate contains:
//! - File name classification ([`classify`])
//! - Repository path to group/artifact/version resolution ([`coordinates`])
//! - Aggregation of flat storage listings into directory entries ([`listing`])
//! - Fixed-width index page rendering ([`render`])
//! - The [`RepositoryService`] that applies them to read and write requests
//!
//! **No transport concerns**: HTTP servers, gateway events and CLI parsing belong in
//! `api-rest`, `api-shared` and `lambda-repo-cli`.

pub mod classify;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod error;
pub mod listing;
pub mod render;
pub mod service;

pub use config::RepoConfig;
pub use coordinates::{parse_path, CoordinateParser};
pub use error::{ConfigError, ConfigResult, ParseError, RepoError, RepoResult};
pub use service::{Artifact, Listing, ReadOutcome, RepositoryService};

pub use repo_storage::{ArtifactStore, StorageError};
pub use repo_types::{
    ChecksumKind, DirectoryEntry, FileClassification, GavCoordinate, ListedObject, ParsedPath,
};
