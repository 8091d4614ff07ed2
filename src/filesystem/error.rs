use derive_more::Display;
use snafu::Snafu;

/// Coarse classification of [`FsError`], for callers that only care about the failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    NotFound,
    NotADirectory,
    IsADirectory,
    AlreadyExists,
    InvalidOperation,
    InvalidPath,
}

/// Failure of a single file system call. The tree is left untouched whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FsError {
    #[snafu(display("No such file or directory: {path}"))]
    NotFound { path: String },
    #[snafu(display("Not a directory: {path}"))]
    NotADirectory { path: String },
    #[snafu(display("Is a directory: {path}"))]
    IsADirectory { path: String },
    #[snafu(display("File exists: {path}"))]
    AlreadyExists { path: String },
    #[snafu(display("Invalid operation on {path}: {reason}"))]
    InvalidOperation { path: String, reason: &'static str },
    #[snafu(display("Invalid path {path:?}: {reason}"))]
    InvalidPath { path: String, reason: &'static str },
}

impl FsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FsError::NotFound { .. } => ErrorKind::NotFound,
            FsError::NotADirectory { .. } => ErrorKind::NotADirectory,
            FsError::IsADirectory { .. } => ErrorKind::IsADirectory,
            FsError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            FsError::InvalidOperation { .. } => ErrorKind::InvalidOperation,
            FsError::InvalidPath { .. } => ErrorKind::InvalidPath,
        }
    }

    /// The path the failing call was made with, normalized where possible.
    pub fn path(&self) -> &str {
        match self {
            FsError::NotFound { path }
            | FsError::NotADirectory { path }
            | FsError::IsADirectory { path }
            | FsError::AlreadyExists { path }
            | FsError::InvalidOperation { path, .. }
            | FsError::InvalidPath { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_path() {
        let error = FsError::NotFound {
            path: "/proj/a.txt".to_string(),
        };
        assert_eq!(error.to_string(), "No such file or directory: /proj/a.txt");
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.path(), "/proj/a.txt");
    }

    #[test]
    fn invalid_operation_carries_reason() {
        let error = FsError::InvalidOperation {
            path: "/".to_string(),
            reason: "the root directory cannot be removed",
        };
        assert!(error.to_string().contains("cannot be removed"));
        assert_eq!(error.kind().to_string(), "InvalidOperation");
    }
}
