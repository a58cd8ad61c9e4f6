//! Recipe lifecycle
//!
//! A recipe is a validated manifest bound to concrete settings and a
//! project root. Its hooks must run in order:
//!
//! ```text
//! Unconfigured --layout()--> LaidOut
//! LaidOut --requirements() + build_requirements()--> Configured
//! Configured --build()--> Built
//! ```
//!
//! `generate()` is available once `Configured`; `build()` only passes a
//! toolchain file to the driver after `generate()` has written one. Any hook called out of
//! order, twice, or after `Built` fails with [`BuildError::Precondition`]
//! before touching the resolver or the driver.

use crate::driver::{BuildDriver, DriverContext};
use crate::error::{BuildError, BuildResult};
use crate::generators::{self, GeneratorContext, TOOLCHAIN_FILE};
use crate::layout::Layout;
use corekit_package::{
    DependencyResolver, GeneratorKind, PackageId, PackageManifest, Scope, Settings, Validator,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Lifecycle position of a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecipeState {
    Unconfigured,
    LaidOut,
    Configured,
    Built,
}

impl RecipeState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::LaidOut => "laid-out",
            Self::Configured => "configured",
            Self::Built => "built",
        }
    }
}

impl fmt::Display for RecipeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A manifest bound to settings and a project root
#[derive(Debug)]
pub struct Recipe {
    manifest: PackageManifest,
    settings: Settings,
    root: PathBuf,
    env: BTreeMap<String, String>,
    package_id: PackageId,
    state: RecipeState,
    layout: Option<Layout>,
    requires_declared: bool,
    tool_requires_declared: bool,
    /// Written by `generate()`, handed to the driver
    toolchain_file: Option<PathBuf>,
}

impl Recipe {
    /// Validate the manifest and bind it.
    ///
    /// Fails with `InvalidManifest` or `MissingSetting`; nothing external
    /// has been called at that point.
    pub fn new(
        manifest: PackageManifest,
        settings: Settings,
        root: impl Into<PathBuf>,
    ) -> BuildResult<Self> {
        if let Err(errors) = Validator::validate(&manifest) {
            let reasons: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return Err(BuildError::InvalidManifest(reasons.join("; ")));
        }

        if let Some(axis) = settings.missing(&manifest.settings).first() {
            return Err(BuildError::MissingSetting { axis: **axis });
        }

        let package_id = PackageId::compute(&manifest, &settings);

        Ok(Self {
            manifest,
            settings,
            root: root.into(),
            env: BTreeMap::new(),
            package_id,
            state: RecipeState::Unconfigured,
            layout: None,
            requires_declared: false,
            tool_requires_declared: false,
            toolchain_file: None,
        })
    }

    /// Environment handed to the build driver
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn manifest(&self) -> &PackageManifest {
        &self.manifest
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn package_id(&self) -> &PackageId {
        &self.package_id
    }

    pub fn state(&self) -> RecipeState {
        self.state
    }

    /// Established layout, once `layout()` has run
    pub fn current_layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// Establish the directory convention
    pub fn layout(&mut self) -> BuildResult<&Layout> {
        if self.state != RecipeState::Unconfigured {
            return Err(BuildError::precondition(
                "layout",
                self.state,
                "layout is already established",
            ));
        }

        let layout = Layout::resolve(self.manifest.layout, &self.root, &self.settings);
        layout.establish()?;
        tracing::info!(
            "Layout '{}': build folder {}",
            layout.kind.name(),
            layout.build_folder.display()
        );

        self.state = RecipeState::LaidOut;
        Ok(self.layout.insert(layout))
    }

    /// Declare runtime requirements at host scope
    pub fn requirements(&mut self, resolver: &mut dyn DependencyResolver) -> BuildResult<()> {
        self.check_declarable("requirements", self.requires_declared)?;

        for reference in &self.manifest.requires {
            resolver.declare(reference, Scope::Host);
        }
        tracing::info!(
            "Declared {} requirement(s) for {}",
            self.manifest.requires.len(),
            self.manifest.reference()
        );

        self.requires_declared = true;
        self.advance_if_declared();
        Ok(())
    }

    /// Declare tool requirements at build scope
    pub fn build_requirements(&mut self, resolver: &mut dyn DependencyResolver) -> BuildResult<()> {
        self.check_declarable("build_requirements", self.tool_requires_declared)?;

        for reference in &self.manifest.tool_requires {
            resolver.declare(reference, Scope::Build);
        }
        tracing::info!(
            "Declared {} tool requirement(s) for {}",
            self.manifest.tool_requires.len(),
            self.manifest.reference()
        );

        self.tool_requires_declared = true;
        self.advance_if_declared();
        Ok(())
    }

    fn check_declarable(&self, hook: &'static str, already: bool) -> BuildResult<()> {
        match self.state {
            RecipeState::Unconfigured => Err(BuildError::precondition(
                hook,
                self.state,
                "layout() must run first",
            )),
            RecipeState::Built => Err(BuildError::precondition(
                hook,
                self.state,
                "the package is already built",
            )),
            _ if already => Err(BuildError::precondition(
                hook,
                self.state,
                "requirements were already declared",
            )),
            _ => Ok(()),
        }
    }

    fn advance_if_declared(&mut self) {
        if self.requires_declared && self.tool_requires_declared {
            self.state = RecipeState::Configured;
        }
    }

    /// Write the manifest's generator files into the generators folder
    pub fn generate(&mut self, packages_root: &Path) -> BuildResult<Vec<PathBuf>> {
        let layout = self.configured_layout("generate")?;

        if self.manifest.generators.is_empty() {
            return Ok(Vec::new());
        }

        let dir = layout.ensure_generators_folder()?;
        let ctx = GeneratorContext {
            package: self.manifest.reference(),
            settings: &self.settings,
            layout,
            requires: &self.manifest.requires,
            packages_root,
        };

        let mut written = Vec::new();
        for kind in &self.manifest.generators {
            let files = generators::generator_for(*kind).files(&ctx);
            written.extend(generators::write_files(dir, &files)?);
            tracing::info!("Generator {} wrote {} file(s)", kind, files.len());
        }

        let toolchain = dir.join(TOOLCHAIN_FILE);
        if written.contains(&toolchain) {
            self.toolchain_file = Some(toolchain);
        }
        Ok(written)
    }

    /// Configure, then build, through `driver`.
    ///
    /// Each driver step runs exactly once. A configure failure stops here
    /// and the build step is never invoked. Driver errors are returned
    /// as-is inside [`BuildError::Driver`].
    pub fn build(&mut self, driver: &mut dyn BuildDriver) -> BuildResult<()> {
        let layout = self.configured_layout("build")?;

        if self.toolchain_file.is_none() && self.manifest.generates(GeneratorKind::CMakeToolchain)
        {
            tracing::warn!("Building without a toolchain file: generate() has not run");
        }
        let ctx = DriverContext {
            package: self.manifest.reference(),
            layout,
            settings: &self.settings,
            toolchain_file: self.toolchain_file.clone(),
            env: &self.env,
        };

        tracing::info!("Configuring {} with {}", ctx.package, driver.name());
        driver.configure(&ctx)?;

        tracing::info!("Building {} with {}", ctx.package, driver.name());
        driver.build(&ctx)?;

        self.state = RecipeState::Built;
        Ok(())
    }

    fn configured_layout(&self, hook: &'static str) -> BuildResult<&Layout> {
        if self.state != RecipeState::Configured {
            let reason = match self.state {
                RecipeState::Built => "the package is already built",
                _ => "requirements() and build_requirements() must run first",
            };
            return Err(BuildError::precondition(hook, self.state, reason));
        }
        self.layout
            .as_ref()
            .ok_or_else(|| BuildError::precondition(hook, self.state, "no layout established"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corekit_package::{DeclaredGraph, SettingAxis};

    fn manifest() -> PackageManifest {
        PackageManifest::from_str(
            r#"
            settings = ["os", "build_type"]
            requires = ["ctre/3.10.0"]
            tool_requires = ["cmake/3.27.9"]

            [package]
            name = "CoreKit"
            version = "0.1"
        "#,
        )
        .unwrap()
    }

    fn settings() -> Settings {
        Settings::new()
            .with(SettingAxis::Os, "Linux")
            .with(SettingAxis::BuildType, "Debug")
    }

    #[test]
    fn test_missing_declared_setting() {
        let partial = Settings::new().with(SettingAxis::Os, "Linux");
        let err = Recipe::new(manifest(), partial, "/tmp").unwrap_err();
        assert!(matches!(
            err,
            BuildError::MissingSetting {
                axis: SettingAxis::BuildType
            }
        ));
    }

    #[test]
    fn test_state_progression() {
        let dir = tempfile::tempdir().unwrap();
        let mut recipe = Recipe::new(manifest(), settings(), dir.path()).unwrap();
        let mut graph = DeclaredGraph::new();

        assert_eq!(recipe.state(), RecipeState::Unconfigured);
        recipe.layout().unwrap();
        assert_eq!(recipe.state(), RecipeState::LaidOut);
        recipe.requirements(&mut graph).unwrap();
        assert_eq!(recipe.state(), RecipeState::LaidOut);
        recipe.build_requirements(&mut graph).unwrap();
        assert_eq!(recipe.state(), RecipeState::Configured);
    }

    #[test]
    fn test_build_requirements_may_come_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut recipe = Recipe::new(manifest(), settings(), dir.path()).unwrap();
        let mut graph = DeclaredGraph::new();

        recipe.layout().unwrap();
        recipe.build_requirements(&mut graph).unwrap();
        recipe.requirements(&mut graph).unwrap();
        assert_eq!(recipe.state(), RecipeState::Configured);
        assert_eq!(graph.consumer_graph().len(), 1);
        assert_eq!(graph.tool_requirements().len(), 1);
    }

    #[test]
    fn test_layout_twice_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut recipe = Recipe::new(manifest(), settings(), dir.path()).unwrap();
        recipe.layout().unwrap();
        assert!(matches!(
            recipe.layout(),
            Err(BuildError::Precondition { hook: "layout", .. })
        ));
    }

    #[test]
    fn test_generate_before_configured_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut recipe = Recipe::new(manifest(), settings(), dir.path()).unwrap();
        recipe.layout().unwrap();
        assert!(matches!(
            recipe.generate(dir.path()),
            Err(BuildError::Precondition {
                hook: "generate",
                state: RecipeState::LaidOut,
                ..
            })
        ));
    }

    #[test]
    fn test_layout_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let mut recipe = Recipe::new(manifest(), settings(), &missing).unwrap();
        assert!(matches!(recipe.layout(), Err(BuildError::Layout(_))));
        assert_eq!(recipe.state(), RecipeState::Unconfigured);
    }
}
