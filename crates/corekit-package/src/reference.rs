//! Package references (`name/version`)

use crate::PackageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A pinned package reference such as `openssl/3.6.0`.
///
/// The version is an opaque identifier. It is compared by the external
/// resolver, never interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Reference {
    pub name: String,
    pub version: String,
}

impl Reference {
    /// Create a reference from its parts
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse `name/version`
    pub fn parse(s: &str) -> crate::Result<Self> {
        let invalid = |reason: &str| PackageError::InvalidReference {
            reference: s.to_string(),
            reason: reason.to_string(),
        };

        let (name, version) = s
            .split_once('/')
            .ok_or_else(|| invalid("expected the form name/version"))?;

        if name.is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if version.is_empty() {
            return Err(invalid("version cannot be empty"));
        }
        if version.contains('/') {
            return Err(invalid("version cannot contain '/'"));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(invalid("whitespace is not allowed"));
        }

        Ok(Self::new(name, version))
    }
}

impl FromStr for Reference {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Reference {
    type Error = PackageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Reference> for String {
    fn from(reference: Reference) -> Self {
        reference.to_string()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_reference() {
        let r = Reference::parse("openssl/3.6.0").unwrap();
        assert_eq!(r.name, "openssl");
        assert_eq!(r.version, "3.6.0");
        assert_eq!(r.to_string(), "openssl/3.6.0");
    }

    #[test]
    fn test_version_is_opaque() {
        // Not semver, still accepted verbatim
        let r: Reference = "ctre/3.10.0-cci.20240101".parse().unwrap();
        assert_eq!(r.version, "3.10.0-cci.20240101");
    }

    #[rstest]
    #[case("openssl")]
    #[case("/3.6.0")]
    #[case("openssl/")]
    #[case("openssl/3.6/0")]
    #[case("open ssl/3.6.0")]
    fn test_reject_malformed(#[case] input: &str) {
        assert!(matches!(
            Reference::parse(input),
            Err(PackageError::InvalidReference { .. })
        ));
    }
}
