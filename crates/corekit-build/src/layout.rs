//! Directory layout conventions
//!
//! A layout fixes where the sources are, where the build driver writes its
//! output and where generated files go. It is a pure function of the
//! manifest's layout kind, the project root and the settings.

use crate::error::{BuildError, BuildResult};
use corekit_package::{LayoutKind, SettingAxis, Settings};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Compilers whose toolchains build every configuration from one tree
const MULTI_CONFIG_COMPILERS: &[&str] = &["msvc"];

/// Resolved folder convention for one build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub kind: LayoutKind,
    pub source_folder: PathBuf,
    pub build_folder: PathBuf,
    pub generators_folder: PathBuf,
    /// Build type is chosen at build time rather than configure time
    pub multi_config: bool,
}

impl Layout {
    /// Compute the layout for a project rooted at `root`
    pub fn resolve(kind: LayoutKind, root: &Path, settings: &Settings) -> Self {
        let build_type = settings.get(SettingAxis::BuildType);
        let multi_config = settings
            .get(SettingAxis::Compiler)
            .map(|c| MULTI_CONFIG_COMPILERS.contains(&c))
            .unwrap_or(false);

        let build_folder = match kind {
            LayoutKind::Cmake => match build_type {
                Some(bt) if !multi_config => root.join("build").join(bt),
                _ => root.join("build"),
            },
            LayoutKind::Basic => match build_type {
                Some(bt) => root.join(format!("build-{}", bt.to_lowercase())),
                None => root.join("build"),
            },
        };

        Self {
            kind,
            source_folder: root.to_path_buf(),
            generators_folder: build_folder.join("generators"),
            build_folder,
            multi_config: multi_config && kind == LayoutKind::Cmake,
        }
    }

    /// Check the host can support this layout.
    ///
    /// The source folder must be an existing directory. The build and
    /// generators folders may be absent, but nothing on their path below
    /// the source folder may be a regular file.
    pub fn establish(&self) -> BuildResult<()> {
        if !self.source_folder.is_dir() {
            return Err(BuildError::Layout(format!(
                "source folder {} is not a directory",
                self.source_folder.display()
            )));
        }

        let below_source = self
            .generators_folder
            .ancestors()
            .take_while(|dir| *dir != self.source_folder);
        for dir in below_source {
            if dir.exists() && !dir.is_dir() {
                return Err(BuildError::Layout(format!(
                    "{} exists and is not a directory",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Create the generators folder
    pub fn ensure_generators_folder(&self) -> BuildResult<&Path> {
        std::fs::create_dir_all(&self.generators_folder)
            .map_err(|e| BuildError::io(&self.generators_folder, e))?;
        Ok(&self.generators_folder)
    }
}
