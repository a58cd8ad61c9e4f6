//! Build-identity fingerprint (package id)
//!
//! Two builds share a package id exactly when they would produce
//! interchangeable binaries: same name and version, same values for every
//! declared build axis, and the same runtime requirements. Descriptive
//! metadata and tool requirements never take part.

use crate::manifest::PackageManifest;
use crate::settings::{SettingAxis, Settings};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Placeholder hashed for a declared axis that has no value
const UNSET: &str = "None";

/// SHA-256 hex digest identifying one binary variant of a package
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    /// Compute the package id of `manifest` built with `settings`
    pub fn compute(manifest: &PackageManifest, settings: &Settings) -> Self {
        Self::from_canonical(&canonical_info(manifest, settings))
    }

    fn from_canonical(info: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(info.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, for display
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical text the package id is hashed from.
///
/// Axes are emitted in canonical order and requirements sorted, so
/// declaration order does not change the identity. Setting values are
/// length-prefixed (`os=5:Linux`); an unset axis hashes as a bare `None`.
pub fn canonical_info(manifest: &PackageManifest, settings: &Settings) -> String {
    let mut out = String::new();
    out.push_str("[package]\n");
    out.push_str(&format!("name={}\n", manifest.package.name));
    out.push_str(&format!("version={}\n", manifest.package.version));

    out.push_str("[settings]\n");
    for axis in SettingAxis::all() {
        if manifest.declares(axis) {
            match settings.get(axis) {
                Some(value) => out.push_str(&format!("{}={}:{}\n", axis, value.len(), value)),
                None => out.push_str(&format!("{}={}\n", axis, UNSET)),
            }
        }
    }

    out.push_str("[requires]\n");
    let mut requires: Vec<String> = manifest.requires.iter().map(|r| r.to_string()).collect();
    requires.sort();
    for reference in requires {
        out.push_str(&reference);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corekit() -> PackageManifest {
        PackageManifest::from_str(
            r#"
            settings = ["os", "compiler", "build_type", "arch"]
            requires = ["ctre/3.10.0", "openssl/3.6.0"]
            tool_requires = ["cmake/3.27.9"]

            [package]
            name = "CoreKit"
            version = "0.1"
        "#,
        )
        .unwrap()
    }

    fn linux_gcc() -> Settings {
        Settings::new()
            .with(SettingAxis::Os, "Linux")
            .with(SettingAxis::Compiler, "gcc")
            .with(SettingAxis::BuildType, "Release")
            .with(SettingAxis::Arch, "x86_64")
    }

    #[test]
    fn test_canonical_info_layout() {
        let info = canonical_info(&corekit(), &linux_gcc());
        assert_eq!(
            info,
            "[package]\nname=CoreKit\nversion=0.1\n\
             [settings]\nos=5:Linux\ncompiler=3:gcc\nbuild_type=7:Release\narch=6:x86_64\n\
             [requires]\nctre/3.10.0\nopenssl/3.6.0\n"
        );
    }

    #[test]
    fn test_short_never_panics() {
        assert_eq!(PackageId("abc".to_string()).short(), "abc");
        assert_eq!(PackageId(String::new()).short(), "");
    }

    #[test]
    fn test_unset_axis_differs_from_literal_none() {
        let unset = Settings::new()
            .with(SettingAxis::Os, "Linux")
            .with(SettingAxis::BuildType, "Release")
            .with(SettingAxis::Arch, "x86_64");
        let literal = unset.clone().with(SettingAxis::Compiler, "None");

        let info = canonical_info(&corekit(), &unset);
        assert!(info.contains("\ncompiler=None\n"));
        assert_ne!(
            PackageId::compute(&corekit(), &unset),
            PackageId::compute(&corekit(), &literal)
        );
    }

    #[test]
    fn test_id_is_sha256_hex() {
        let id = PackageId::compute(&corekit(), &linux_gcc());
        assert_eq!(id.as_str().len(), 64);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id.short().len(), 12);
    }

    #[test]
    fn test_tool_requires_do_not_affect_id() {
        let a = corekit();
        let mut b = corekit();
        b.tool_requires.clear();
        assert_eq!(
            PackageId::compute(&a, &linux_gcc()),
            PackageId::compute(&b, &linux_gcc())
        );
    }

    #[test]
    fn test_undeclared_axis_ignored() {
        let mut m = corekit();
        m.settings.retain(|axis| *axis != SettingAxis::Compiler);
        let clang = linux_gcc().with(SettingAxis::Compiler, "clang");
        assert_eq!(
            PackageId::compute(&m, &linux_gcc()),
            PackageId::compute(&m, &clang)
        );
    }
}
