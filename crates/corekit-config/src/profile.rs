//! Profile files and the resolved host profile

use crate::{ConfigError, ConfigResult};
use corekit_package::{SettingAxis, Settings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Build tool used when no profile names one
pub const DEFAULT_CMAKE: &str = "cmake";

/// One profile file (`profile.toml`). Every field is optional so files can
/// be layered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileFile {
    #[serde(default)]
    pub settings: SettingsSection,

    #[serde(default)]
    pub tools: ToolsSection,

    /// Extra environment for the build driver
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub paths: PathsSection,
}

/// `[settings]`: values for build axes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
}

impl SettingsSection {
    /// Values present in this section
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::new();
        let pairs = [
            (SettingAxis::Os, &self.os),
            (SettingAxis::Compiler, &self.compiler),
            (SettingAxis::BuildType, &self.build_type),
            (SettingAxis::Arch, &self.arch),
        ];
        for (axis, value) in pairs {
            if let Some(value) = value {
                settings.set(axis, value.clone());
            }
        }
        settings
    }
}

/// `[tools]`: build driver configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsSection {
    /// Path or name of the cmake executable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmake: Option<PathBuf>,

    /// CMake generator (`-G`), e.g. "Ninja"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmake_generator: Option<String>,

    /// Parallel build jobs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

/// `[paths]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    /// Root under which resolved packages live as `<name>/<version>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<PathBuf>,
}

impl ProfileFile {
    /// Parse a profile from TOML
    pub fn parse(content: &str, file: &Path) -> ConfigResult<Self> {
        let profile: ProfileFile =
            toml::from_str(content).map_err(|error| ConfigError::TomlParseError {
                file: file.to_path_buf(),
                error,
            })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load a profile file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.tools.jobs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "tools.jobs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let settings = [
            ("settings.os", &self.settings.os),
            ("settings.compiler", &self.settings.compiler),
            ("settings.build_type", &self.settings.build_type),
            ("settings.arch", &self.settings.arch),
        ];
        for (field, value) in settings {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "cannot be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Fully resolved profile for one build invocation
#[derive(Debug, Clone, PartialEq)]
pub struct HostProfile {
    pub settings: Settings,
    pub cmake: PathBuf,
    pub cmake_generator: Option<String>,
    pub jobs: Option<usize>,
    pub env: BTreeMap<String, String>,
    pub packages: Option<PathBuf>,
}

impl HostProfile {
    /// Profile with the given settings and default tools
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            cmake: PathBuf::from(DEFAULT_CMAKE),
            cmake_generator: None,
            jobs: None,
            env: BTreeMap::new(),
            packages: None,
        }
    }

    /// Overlay a profile file; present values win
    pub fn apply(&mut self, file: &ProfileFile) {
        self.settings.merge(&file.settings.to_settings());
        if let Some(cmake) = &file.tools.cmake {
            self.cmake = cmake.clone();
        }
        if let Some(generator) = &file.tools.cmake_generator {
            self.cmake_generator = Some(generator.clone());
        }
        if let Some(jobs) = file.tools.jobs {
            self.jobs = Some(jobs);
        }
        for (key, value) in &file.env {
            self.env.insert(key.clone(), value.clone());
        }
        if let Some(packages) = &file.paths.packages {
            self.packages = Some(packages.clone());
        }
    }

    /// Override one setting (CLI `-s axis=value`)
    pub fn override_setting(&mut self, axis: SettingAxis, value: impl Into<String>) {
        self.settings.set(axis, value);
    }

    /// Current build type, if set
    pub fn build_type(&self) -> Option<&str> {
        self.settings.get(SettingAxis::BuildType)
    }
}
