//! CLI command implementations

pub mod build;
pub mod info;
pub mod install;

use anyhow::{anyhow, Context, Result};
use corekit_build::Builder;
use corekit_config::ProfileLoader;
use corekit_package::SettingAxis;
use std::path::Path;

/// Build type implied by `--release` / `--debug`
pub fn build_type_flag(release: bool, debug: bool) -> Option<&'static str> {
    if release {
        Some("Release")
    } else if debug {
        Some("Debug")
    } else {
        None
    }
}

/// Parse `axis=value`
pub fn parse_setting(raw: &str) -> Result<(SettingAxis, String)> {
    let (axis, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid setting '{}': expected axis=value", raw))?;
    let axis: SettingAxis = axis.trim().parse()?;
    let value = value.trim();
    if value.is_empty() {
        return Err(anyhow!("Invalid setting '{}': value cannot be empty", raw));
    }
    Ok((axis, value.to_string()))
}

/// Load the project's manifest and profile, then apply CLI overrides
pub fn load_builder(
    project_dir: &Path,
    settings: &[String],
    build_type: Option<&str>,
) -> Result<Builder> {
    let profile = ProfileLoader::new()
        .load(Some(project_dir))
        .context("Failed to load profile")?;

    let mut builder = Builder::new(project_dir)
        .with_context(|| format!("Failed to load project at {}", project_dir.display()))?
        .with_profile(profile);

    if let Some(build_type) = build_type {
        builder = builder.with_setting(SettingAxis::BuildType, build_type);
    }
    for raw in settings {
        let (axis, value) = parse_setting(raw)?;
        builder = builder.with_setting(axis, value);
    }

    tracing::debug!("Effective settings: {:?}", builder.profile().settings);
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setting() {
        let (axis, value) = parse_setting("arch=armv8").unwrap();
        assert_eq!(axis, SettingAxis::Arch);
        assert_eq!(value, "armv8");
    }

    #[test]
    fn test_parse_setting_errors() {
        assert!(parse_setting("arch").is_err());
        assert!(parse_setting("arch=").is_err());
        assert!(parse_setting("libcxx=libstdc++").is_err());
    }

    #[test]
    fn test_build_type_flag() {
        assert_eq!(build_type_flag(true, false), Some("Release"));
        assert_eq!(build_type_flag(false, true), Some("Debug"));
        assert_eq!(build_type_flag(false, false), None);
    }
}
