//! Error taxonomy shared by the renamer and folder creator.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    /// Scan root or parent folder is missing or not a directory.
    #[error("Invalid directory: {}", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A computed or user-given name is not a legal file name.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Failed to {action} {}: {source}", path.display())]
    FileSystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to scan directory: {0}")]
    Scan(#[from] walkdir::Error),

    #[error("Folder count must be at least 1")]
    InvalidCount,

    #[error("Start index {start} leaves no room for {count} folders")]
    IndexOutOfRange { start: i64, count: usize },
}

impl ToolError {
    pub(crate) fn file_system(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::FileSystem {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_system_error_message_includes_path() {
        let error = ToolError::file_system(
            "copy",
            Path::new("/data/frame.bmp"),
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        let message = error.to_string();
        assert!(message.contains("copy"));
        assert!(message.contains("frame.bmp"));
        assert!(message.contains("permission denied"));
    }

    #[test]
    fn invalid_name_message() {
        let error = ToolError::invalid_name("a:b", "contains ':'");
        assert_eq!(error.to_string(), "Invalid name 'a:b': contains ':'");
    }
}
