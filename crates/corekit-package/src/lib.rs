//! CoreKit package manifests
//!
//! Declarative package descriptions (`corekit.toml`): identity, build axes,
//! generators, runtime requirements and build-time tool requirements.
//! Also provides manifest validation, the build-identity fingerprint and the
//! dependency resolver capability the build host declares requirements to.

pub mod fingerprint;
pub mod manifest;
pub mod reference;
pub mod resolver;
pub mod settings;
pub mod validator;

pub use fingerprint::PackageId;
pub use manifest::{GeneratorKind, LayoutKind, PackageManifest, PackageMetadata};
pub use reference::Reference;
pub use resolver::{DeclaredGraph, DependencyResolver, Scope};
pub use settings::{SettingAxis, Settings};
pub use validator::{ValidationError, Validator};

/// Package management errors
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize manifest: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("Unknown setting axis '{0}' (expected os, compiler, build_type or arch)")]
    UnknownAxis(String),

    #[error("Invalid manifest: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, PackageError>;
