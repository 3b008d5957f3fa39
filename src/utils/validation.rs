//! Input checks run before any computation.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{input} file not found: {}", .path.display())]
    FileNotFound { input: &'static str, path: PathBuf },

    #[error("{input} is required{context}")]
    MissingInput {
        input: &'static str,
        context: &'static str,
    },

    #[error("{first} and {second} cannot be used together")]
    Conflicting {
        first: &'static str,
        second: &'static str,
    },
}

/// Check that `path` exists and is a file
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if it does not.
pub fn check_file_exists(input: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ConfigError::FileNotFound {
            input,
            path: path.to_path_buf(),
        })
    }
}

/// Check an optional input: absent is fine, present must exist
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if `path` is given but missing.
pub fn check_optional_file(input: &'static str, path: Option<&Path>) -> Result<(), ConfigError> {
    path.map_or(Ok(()), |p| check_file_exists(input, p))
}

/// Unwrap an input that the current run cannot do without
///
/// # Errors
///
/// Returns `ConfigError::MissingInput` if `value` is `None`.
pub fn require<'a, T: ?Sized>(
    input: &'static str,
    context: &'static str,
    value: Option<&'a T>,
) -> Result<&'a T, ConfigError> {
    value.ok_or(ConfigError::MissingInput { input, context })
}

/// At most one of two mutually exclusive inputs
///
/// # Errors
///
/// Returns `ConfigError::Conflicting` if both are given.
pub fn at_most_one<T>(
    first: (&'static str, Option<T>),
    second: (&'static str, Option<T>),
) -> Result<Option<T>, ConfigError> {
    match (first.1, second.1) {
        (Some(_), Some(_)) => Err(ConfigError::Conflicting {
            first: first.0,
            second: second.0,
        }),
        (a, b) => Ok(a.or(b)),
    }
}
