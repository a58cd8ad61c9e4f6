//! Package manifest parsing and types (corekit.toml)

use crate::reference::Reference;
use crate::settings::SettingAxis;
use crate::validator::Validator;
use crate::PackageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// File name of a package manifest inside a project directory
pub const MANIFEST_FILE: &str = "corekit.toml";

/// Package manifest (corekit.toml)
///
/// Read-only once loaded: the build host never mutates it while running
/// the lifecycle hooks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageManifest {
    /// Build axes participating in the package identity
    #[serde(default)]
    pub settings: Vec<SettingAxis>,
    /// Build-description formats to emit for the build driver
    #[serde(default)]
    pub generators: Vec<GeneratorKind>,
    /// Directory convention
    #[serde(default)]
    pub layout: LayoutKind,
    /// Runtime requirements, propagated to consumers
    #[serde(default)]
    pub requires: Vec<Reference>,
    /// Build-time tool requirements, never propagated to consumers
    #[serde(default)]
    pub tool_requires: Vec<Reference>,
    pub package: PackageMetadata,
}

impl PackageManifest {
    /// Parse manifest from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load manifest from file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_str(&content)?)
    }

    /// Load manifest from file and validate it
    pub fn load(path: &Path) -> crate::Result<Self> {
        let manifest = Self::from_file(path)?;
        Validator::validate(&manifest).map_err(PackageError::Invalid)?;
        tracing::debug!(
            "Loaded manifest {} from {}",
            manifest.reference(),
            path.display()
        );
        Ok(manifest)
    }

    /// Serialize to TOML string
    pub fn to_string(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The package's own `name/version` reference
    pub fn reference(&self) -> Reference {
        Reference::new(&self.package.name, &self.package.version)
    }

    /// Whether the given axis participates in the package identity
    pub fn declares(&self, axis: SettingAxis) -> bool {
        self.settings.contains(&axis)
    }

    /// Whether the given generator is requested
    pub fn generates(&self, generator: GeneratorKind) -> bool {
        self.generators.contains(&generator)
    }
}

/// Package identity and descriptive metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

/// Downstream build-file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratorKind {
    /// CMake toolchain file with settings and search paths
    CMakeToolchain,
    /// CMake package config files, one set per requirement
    CMakeDeps,
}

impl GeneratorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CMakeToolchain => "CMakeToolchain",
            Self::CMakeDeps => "CMakeDeps",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Directory layout conventions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// `build/<build_type>` for single-config toolchains, `build` otherwise
    #[default]
    Cmake,
    /// `build-<build_type>` next to the sources
    Basic,
}

impl LayoutKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cmake => "cmake",
            Self::Basic => "basic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COREKIT: &str = r#"
        settings = ["os", "compiler", "build_type", "arch"]
        generators = ["CMakeToolchain", "CMakeDeps"]
        layout = "cmake"
        requires = ["ctre/3.10.0", "openssl/3.6.0"]
        tool_requires = ["cmake/3.27.9"]

        [package]
        name = "CoreKit"
        version = "0.1"
    "#;

    #[test]
    fn test_parse_minimal_manifest() {
        let toml = r#"
            [package]
            name = "tiny"
            version = "1"
        "#;

        let manifest = PackageManifest::from_str(toml).unwrap();
        assert_eq!(manifest.package.name, "tiny");
        assert_eq!(manifest.layout, LayoutKind::Cmake);
        assert!(manifest.requires.is_empty());
        assert!(manifest.settings.is_empty());
    }

    #[test]
    fn test_parse_complete_manifest() {
        let manifest = PackageManifest::from_str(COREKIT).unwrap();
        assert_eq!(manifest.reference().to_string(), "CoreKit/0.1");
        assert_eq!(manifest.settings, SettingAxis::all().to_vec());
        assert!(manifest.generates(GeneratorKind::CMakeDeps));
        assert_eq!(manifest.requires.len(), 2);
        assert_eq!(manifest.requires[1], Reference::new("openssl", "3.6.0"));
        assert_eq!(manifest.tool_requires, vec![Reference::new("cmake", "3.27.9")]);
    }

    #[test]
    fn test_requires_keep_declaration_order() {
        let manifest = PackageManifest::from_str(COREKIT).unwrap();
        let names: Vec<_> = manifest.requires.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["ctre", "openssl"]);
    }

    #[test]
    fn test_unknown_axis_rejected() {
        let toml = r#"
            settings = ["os", "libcxx"]

            [package]
            name = "x"
            version = "1"
        "#;
        assert!(PackageManifest::from_str(toml).is_err());
    }

    #[test]
    fn test_malformed_reference_rejected() {
        let toml = r#"
            requires = ["openssl"]

            [package]
            name = "x"
            version = "1"
        "#;
        assert!(PackageManifest::from_str(toml).is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let manifest = PackageManifest::from_str(COREKIT).unwrap();
        let text = manifest.to_string().unwrap();
        assert_eq!(PackageManifest::from_str(&text).unwrap(), manifest);
    }
}
