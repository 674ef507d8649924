use std::fmt;
use std::path::PathBuf;

use crate::verifier::Discrepancy;

#[derive(Debug)]
pub enum MergeError {
    NotFound(PathBuf),
    EmptyInput(PathBuf),
    OutputUnavailable { path: PathBuf, source: std::io::Error },
    Inconsistent(Vec<Discrepancy>),
    Io(std::io::Error),
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::NotFound(path) => write!(f, "Not found: {}", path.display()),
            MergeError::EmptyInput(path) => {
                write!(f, "No matching input files in {}", path.display())
            }
            MergeError::OutputUnavailable { path, source } => {
                write!(f, "Output file {} unavailable: {}", path.display(), source)
            }
            MergeError::Inconsistent(found) => {
                let parts: Vec<String> = found.iter().map(|d| d.to_string()).collect();
                write!(f, "Verification mismatch: {}", parts.join("; "))
            }
            MergeError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for MergeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MergeError::OutputUnavailable { source, .. } => Some(source),
            MergeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MergeError {
    fn from(err: std::io::Error) -> Self {
        MergeError::Io(err)
    }
}

/// A single document that could not be read or written. Absorbed by the merge loop.
#[derive(Debug)]
pub struct FileError {
    pub name: String,
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.path.display(), self.source)
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_path() {
        let err = MergeError::NotFound(PathBuf::from("data"));
        assert_eq!(err.to_string(), "Not found: data");

        let err = MergeError::EmptyInput(PathBuf::from("books"));
        assert!(err.to_string().contains("books"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: MergeError = io.into();
        assert!(matches!(err, MergeError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
