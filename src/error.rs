use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of resolving a handler or reading a file through it
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("No reader for the extension: '{extension}' (known: {}). Aborting.", .known.join(", "))]
    UnknownExtension { extension: String, known: Vec<String> },

    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed content in {} at line {line}: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl ReaderError {
    pub fn unknown_extension(extension: impl Into<String>, known: Vec<String>) -> Self {
        Self::UnknownExtension {
            extension: extension.into(),
            known,
        }
    }

    /// Classify an I/O failure on `path`, splitting out the missing-file case
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound { path },
            _ => Self::Io { path, source },
        }
    }

    pub fn from_csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        let path = path.into();
        let line = err.position().map(|pos| pos.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(source) => Self::from_io(path, source),
            csv::ErrorKind::Utf8 { err, .. } => Self::Malformed {
                path,
                line,
                reason: format!("invalid UTF-8: {err}"),
            },
            other => Self::Malformed {
                path,
                line,
                reason: format!("{other:?}"),
            },
        }
    }

    /// Extension named by an `UnknownExtension` error
    pub fn extension(&self) -> Option<&str> {
        match self {
            Self::UnknownExtension { extension, .. } => Some(extension),
            _ => None,
        }
    }
}

/// Failures while loading the registry configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid delimiter {delimiter:?} for extension '{extension}': expected a single ASCII character")]
    InvalidDelimiter { extension: String, delimiter: String },

    #[error("Invalid extension key {0:?}: must be non-empty and have no leading '.'")]
    InvalidExtension(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_split_out() {
        let err = ReaderError::from_io("missing.txt", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, ReaderError::FileNotFound { .. }));
        assert_eq!(err.to_string(), "File not found: missing.txt");
    }

    #[test]
    fn test_other_io_keeps_cause() {
        let err = ReaderError::from_io(
            "locked.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert!(matches!(err, ReaderError::Io { .. }));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_unknown_extension_message() {
        let err = ReaderError::unknown_extension("md", vec!["csv".into(), "txt".into()]);
        assert_eq!(err.extension(), Some("md"));
        let message = err.to_string();
        assert!(message.contains("'md'"));
        assert!(message.contains("csv, txt"));
    }
}
