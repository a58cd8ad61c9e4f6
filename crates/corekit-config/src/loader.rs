//! Profile loader
//!
//! Layers detected defaults, profile files and `COREKIT_*` environment
//! variables into one [`HostProfile`].

use crate::detect::detect_host_settings;
use crate::profile::{HostProfile, ProfileFile};
use crate::{ConfigError, ConfigResult};
use corekit_package::SettingAxis;
use std::env;
use std::path::{Path, PathBuf};

/// Profile file name, both globally and per project
pub const PROFILE_FILE: &str = "profile.toml";

/// Per-project configuration directory
pub const PROJECT_CONFIG_DIR: &str = ".corekit";

/// Loads host profiles with precedence
/// detected < global < project < environment
pub struct ProfileLoader {
    /// Overrides the global directory lookup
    global_dir: Option<PathBuf>,
}

impl ProfileLoader {
    pub fn new() -> Self {
        Self { global_dir: None }
    }

    /// Use `dir` instead of `~/.corekit`
    pub fn with_global_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_dir = Some(dir.into());
        self
    }

    /// Build the profile for a project (or for no project)
    pub fn load(&self, project_dir: Option<&Path>) -> ConfigResult<HostProfile> {
        let mut profile = HostProfile::new(detect_host_settings());

        let global_path = self.global_dir()?.join(PROFILE_FILE);
        if global_path.exists() {
            tracing::debug!("Applying global profile {}", global_path.display());
            profile.apply(&ProfileFile::load_from_file(&global_path)?);
        }

        if let Some(project_dir) = project_dir {
            let project_path = project_dir.join(PROJECT_CONFIG_DIR).join(PROFILE_FILE);
            if project_path.exists() {
                tracing::debug!("Applying project profile {}", project_path.display());
                profile.apply(&ProfileFile::load_from_file(&project_path)?);
            }
        }

        apply_env_overrides(&mut profile)?;
        Ok(profile)
    }

    fn global_dir(&self) -> ConfigResult<PathBuf> {
        match &self.global_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::global_config_dir(),
        }
    }

    /// The global configuration directory (`$COREKIT_HOME` or `~/.corekit`)
    pub fn global_config_dir() -> ConfigResult<PathBuf> {
        if let Ok(home) = env::var("COREKIT_HOME") {
            return Ok(PathBuf::from(home));
        }
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".corekit"))
    }
}

impl Default for ProfileLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply environment variable overrides
///
/// `COREKIT_<AXIS>` for settings, `COREKIT_CMAKE` for the build tool,
/// `COREKIT_PACKAGES` for the package root.
fn apply_env_overrides(profile: &mut HostProfile) -> ConfigResult<()> {
    for axis in SettingAxis::all() {
        let var = format!("COREKIT_{}", axis.name().to_uppercase());
        if let Ok(value) = env::var(&var) {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: var,
                    reason: "cannot be empty".to_string(),
                });
            }
            profile.override_setting(axis, value);
        }
    }

    if let Ok(cmake) = env::var("COREKIT_CMAKE") {
        profile.cmake = PathBuf::from(cmake);
    }

    if let Ok(packages) = env::var("COREKIT_PACKAGES") {
        profile.packages = Some(PathBuf::from(packages));
    }

    Ok(())
}
