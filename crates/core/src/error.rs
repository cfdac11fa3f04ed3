use repo_storage::StorageError;

/// Why a repository path could not be resolved to a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("path contains no '/' separator")]
    NoSeparator,
    #[error("path needs at least group, artifact, version and file segments")]
    TooShort,
    #[error("file name has no recognized Maven suffix")]
    UnrecognizedFile,
    #[error("version segment is empty")]
    InvalidVersion,
    #[error("artifact id segment is empty")]
    InvalidArtifactId,
    #[error("group segment is empty or contains '.'")]
    InvalidGroupSegment,
}

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("invalid repository path: {0}")]
    Parse(#[from] ParseError),
    #[error("not a Maven repository file: {0}")]
    NotMavenFile(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("release version already exists: {0}")]
    ReleaseExists(String),
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error("storage failure: {0}")]
    Storage(#[source] StorageError),
    #[error("failed to render listing: {0}")]
    Render(#[from] askama::Error),
}

impl From<StorageError> for RepoError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(key) => RepoError::NotFound(key),
            StorageError::InvalidKey { key, .. } => RepoError::InvalidKey(key),
            other => RepoError::Storage(other),
        }
    }
}

impl RepoError {
    /// HTTP status this failure is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            RepoError::Parse(_) | RepoError::NotMavenFile(_) | RepoError::InvalidKey(_) => 400,
            RepoError::ReleaseExists(_) => 403,
            RepoError::NotFound(_) => 404,
            RepoError::Storage(_) | RepoError::Render(_) => 500,
        }
    }

    /// Response body text. Never includes backend error details.
    pub fn public_message(&self) -> String {
        match self {
            RepoError::Parse(e) => format!("Invalid path: {e}"),
            RepoError::NotMavenFile(_) => "Invalid file".into(),
            RepoError::NotFound(_) => "Not found".into(),
            RepoError::ReleaseExists(_) => "Release version already exists".into(),
            RepoError::InvalidKey(_) => "Invalid path".into(),
            RepoError::Storage(_) | RepoError::Render(_) => "Internal error".into(),
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

pub type RepoResult<T> = std::result::Result<T, RepoError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid checksum list: {0}")]
    Checksum(#[from] repo_types::TypesError),
    #[error("failed to resolve working directory: {0}")]
    WorkingDir(std::io::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
