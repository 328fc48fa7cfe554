use thiserror::Error;

pub type FolioResult<T> = Result<T, FolioError>;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The underlying file-system rename/move/delete failed. In-memory
    /// state is left exactly as it was before the attempt.
    #[error("file operation failed for \"{path}\": {source}")]
    FileOperation {
        path: String,
        source: std::io::Error,
    },

    /// The book has no Document-typed members at all, so there is no
    /// "first content document" to hand out.
    #[error("the book has no content documents")]
    NoContentDocuments,

    #[error("member has already been deleted: {0}")]
    MemberDeleted(String),

    #[error("unknown member identifier: {0}")]
    UnknownIdentifier(String),

    #[error("file watcher error: {0}")]
    Watch(String),

    /// A batch rename/move applied every entry that validated, but some
    /// entries did not. The unprocessed items were reported to the caller.
    #[error("{0} item(s) could not be processed")]
    BatchIncomplete(usize),
}

/// Rejection reasons detected before any mutation is attempted. Each
/// variant carries the offending value so callers can present an exact
/// diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("the filename \"{name}\" cannot contain the character \"{character}\"")]
    ForbiddenCharacter { name: String, character: char },

    #[error("the filename cannot be empty")]
    EmptyFilename,

    #[error("the filename \"{0}\" is already in use")]
    DuplicateFilename(String),

    #[error("the book path cannot be empty")]
    EmptyBookPath,

    #[error("the book path \"{0}\" is already in use")]
    DuplicateBookPath(String),
}
