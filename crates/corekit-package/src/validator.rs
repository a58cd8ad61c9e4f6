//! Package manifest validation

use crate::manifest::PackageManifest;
use crate::reference::Reference;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

const MAX_NAME_LEN: usize = 101;

/// Validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid package name format
    InvalidPackageName(String),
    /// Invalid version identifier
    InvalidVersion(String),
    /// Same name declared twice within one requirement list
    DuplicateRequirement { name: String, list: &'static str },
    /// Invalid requirement reference
    InvalidDependency { name: String, reason: String },
    /// Build axis listed more than once
    DuplicateSetting(String),
    /// Generator listed more than once
    DuplicateGenerator(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidPackageName(name) => {
                write!(f, "Invalid package name: {}", name)
            }
            ValidationError::InvalidVersion(version) => {
                write!(f, "Invalid version: {}", version)
            }
            ValidationError::DuplicateRequirement { name, list } => {
                write!(f, "Duplicate requirement '{}' in {}", name, list)
            }
            ValidationError::InvalidDependency { name, reason } => {
                write!(f, "Invalid dependency '{}': {}", name, reason)
            }
            ValidationError::DuplicateSetting(axis) => {
                write!(f, "Setting '{}' is declared more than once", axis)
            }
            ValidationError::DuplicateGenerator(generator) => {
                write!(f, "Generator '{}' is declared more than once", generator)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Package manifest validator
pub struct Validator;

impl Validator {
    /// Validate package manifest, collecting every problem found
    pub fn validate(manifest: &PackageManifest) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_package_name(&manifest.package.name) {
            errors.push(e);
        }
        if let Err(e) = Self::validate_version(&manifest.package.version) {
            errors.push(e);
        }

        errors.extend(Self::validate_requirements(
            &manifest.requires,
            "requires",
            &manifest.package.name,
        ));
        errors.extend(Self::validate_requirements(
            &manifest.tool_requires,
            "tool_requires",
            &manifest.package.name,
        ));

        errors.extend(
            duplicates(manifest.settings.iter())
                .into_iter()
                .map(|axis| ValidationError::DuplicateSetting(axis.to_string())),
        );
        errors.extend(
            duplicates(manifest.generators.iter())
                .into_iter()
                .map(|g| ValidationError::DuplicateGenerator(g.to_string())),
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate package name format
    pub fn validate_package_name(name: &str) -> Result<(), ValidationError> {
        let first = match name.chars().next() {
            Some(c) => c,
            None => {
                return Err(ValidationError::InvalidPackageName(
                    "Package name cannot be empty".to_string(),
                ))
            }
        };

        if !first.is_ascii_alphanumeric() {
            return Err(ValidationError::InvalidPackageName(format!(
                "'{}' must start with a letter or digit",
                name
            )));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+'))
        {
            return Err(ValidationError::InvalidPackageName(format!(
                "'{}' contains invalid characters (only letters, digits, -, _, ., + allowed)",
                name
            )));
        }

        if name.len() > MAX_NAME_LEN {
            return Err(ValidationError::InvalidPackageName(format!(
                "'{}' exceeds maximum length of {} characters",
                name, MAX_NAME_LEN
            )));
        }

        Ok(())
    }

    /// Versions are opaque; only their shape is checked
    pub fn validate_version(version: &str) -> Result<(), ValidationError> {
        if version.is_empty() {
            return Err(ValidationError::InvalidVersion(
                "Version cannot be empty".to_string(),
            ));
        }
        if version.contains('/') || version.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidVersion(format!(
                "'{}' cannot contain '/' or whitespace",
                version
            )));
        }
        Ok(())
    }

    fn validate_requirements(
        requirements: &[Reference],
        list: &'static str,
        package_name: &str,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for reference in requirements {
            if let Err(e) = Self::validate_package_name(&reference.name) {
                errors.push(ValidationError::InvalidDependency {
                    name: reference.name.clone(),
                    reason: e.to_string(),
                });
            }
            if let Err(e) = Self::validate_version(&reference.version) {
                errors.push(ValidationError::InvalidDependency {
                    name: reference.name.clone(),
                    reason: e.to_string(),
                });
            }
            if reference.name == package_name {
                errors.push(ValidationError::InvalidDependency {
                    name: reference.name.clone(),
                    reason: "a package cannot require itself".to_string(),
                });
            }
        }

        errors.extend(
            duplicates(requirements.iter().map(|r| r.name.as_str()))
                .into_iter()
                .map(|name| ValidationError::DuplicateRequirement {
                    name: name.to_string(),
                    list,
                }),
        );

        errors
    }
}

/// Items seen more than once, each reported once, in first-repeat order
fn duplicates<T: Eq + Hash + Copy>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for item in items {
        if !seen.insert(item) && !dups.contains(&item) {
            dups.push(item);
        }
    }
    dups
}
