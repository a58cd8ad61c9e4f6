/// Build host error types
use crate::driver::DriverError;
use crate::recipe::RecipeState;
use corekit_package::{PackageError, SettingAxis};
use std::path::PathBuf;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to read manifest at {path}: {error}")]
    ManifestReadError { path: PathBuf, error: String },

    /// Raised before any resolver or driver call
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("No value for setting '{axis}' declared by the manifest")]
    MissingSetting { axis: SettingAxis },

    #[error("Cannot run {hook}() while the recipe is {state}: {reason}")]
    Precondition {
        hook: &'static str,
        state: RecipeState,
        reason: String,
    },

    #[error("Layout not supported: {0}")]
    Layout(String),

    #[error("I/O error at {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Failed to serialize {}: {error}", .path.display())]
    SerializeError {
        path: PathBuf,
        error: serde_json::Error,
    },

    /// Driver failures pass through untouched
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl BuildError {
    /// Create a manifest read error
    pub fn manifest_read(path: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self::ManifestReadError {
            path: path.into(),
            error: error.to_string(),
        }
    }

    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }

    /// Create a serialization error for a generated file
    pub fn serialize(path: impl Into<PathBuf>, error: serde_json::Error) -> Self {
        Self::SerializeError {
            path: path.into(),
            error,
        }
    }

    /// Create a precondition error
    pub fn precondition(hook: &'static str, state: RecipeState, reason: impl Into<String>) -> Self {
        Self::Precondition {
            hook,
            state,
            reason: reason.into(),
        }
    }

    /// Map a manifest loading failure; validation problems become
    /// `InvalidManifest`, everything else a read error
    pub fn from_package(path: impl Into<PathBuf>, error: PackageError) -> Self {
        match error {
            PackageError::Invalid(_) | PackageError::InvalidReference { .. } => {
                Self::InvalidManifest(invalid_reason(&error))
            }
            PackageError::ParseError(_) | PackageError::UnknownAxis(_) => {
                Self::InvalidManifest(error.to_string())
            }
            other => Self::manifest_read(path, other),
        }
    }

    /// Whether this error came from the external build driver
    pub fn is_driver_error(&self) -> bool {
        matches!(self, Self::Driver(_))
    }
}

fn invalid_reason(error: &PackageError) -> String {
    let text = error.to_string();
    text.strip_prefix("Invalid manifest: ")
        .map(str::to_string)
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_error_names_file() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = BuildError::serialize("/p/build/generators/corekit-graph.json", json_error);

        assert!(matches!(err, BuildError::SerializeError { .. }));
        assert!(err
            .to_string()
            .starts_with("Failed to serialize /p/build/generators/corekit-graph.json: "));
        assert!(!err.is_driver_error());
    }

    #[test]
    fn test_invalid_manifest_prefix_not_doubled() {
        let err = BuildError::from_package(
            "corekit.toml",
            PackageError::InvalidReference {
                reference: "openssl".to_string(),
                reason: "expected the form name/version".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "Invalid manifest: Invalid reference 'openssl': expected the form name/version"
        );
    }
}
