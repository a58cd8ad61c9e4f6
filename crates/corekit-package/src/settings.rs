//! Build axes and their setting values

use crate::PackageError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A dimension of build identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingAxis {
    Os,
    Compiler,
    BuildType,
    Arch,
}

impl SettingAxis {
    /// Axis name as written in manifests and profiles
    pub fn name(&self) -> &'static str {
        match self {
            Self::Os => "os",
            Self::Compiler => "compiler",
            Self::BuildType => "build_type",
            Self::Arch => "arch",
        }
    }

    /// All axes in canonical order
    pub fn all() -> [SettingAxis; 4] {
        [Self::Os, Self::Compiler, Self::BuildType, Self::Arch]
    }
}

impl FromStr for SettingAxis {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "os" => Ok(Self::Os),
            "compiler" => Ok(Self::Compiler),
            "build_type" => Ok(Self::BuildType),
            "arch" => Ok(Self::Arch),
            other => Err(PackageError::UnknownAxis(other.to_string())),
        }
    }
}

impl fmt::Display for SettingAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Concrete values for build axes, as supplied by the host profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    values: BTreeMap<SettingAxis, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, axis: SettingAxis, value: impl Into<String>) -> Self {
        self.set(axis, value);
        self
    }

    pub fn set(&mut self, axis: SettingAxis, value: impl Into<String>) {
        self.values.insert(axis, value.into());
    }

    pub fn get(&self, axis: SettingAxis) -> Option<&str> {
        self.values.get(&axis).map(String::as_str)
    }

    /// Axes from `declared` that have no value
    pub fn missing<'a>(&self, declared: &'a [SettingAxis]) -> Vec<&'a SettingAxis> {
        declared
            .iter()
            .filter(|axis| !self.values.contains_key(axis))
            .collect()
    }

    /// Overlay `other` on top of these settings; values in `other` win
    pub fn merge(&mut self, other: &Settings) {
        for (axis, value) in &other.values {
            self.values.insert(*axis, value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SettingAxis, &str)> {
        self.values.iter().map(|(axis, value)| (*axis, value.as_str()))
    }
}
