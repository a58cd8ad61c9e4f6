//! Build host: runs a project's recipe hooks in order
use crate::driver::BuildDriver;
use crate::error::{BuildError, BuildResult};
use crate::generators::GRAPH_FILE;
use crate::layout::Layout;
use crate::recipe::{Recipe, RecipeState};

use corekit_config::{detect_host_settings, HostProfile};
use corekit_package::manifest::MANIFEST_FILE;
use corekit_package::{DeclaredGraph, PackageId, PackageManifest, SettingAxis};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

/// Result of `install()` or `build()`
#[derive(Debug)]
pub struct BuildContext {
    /// Package manifest
    pub manifest: PackageManifest,
    /// Build-identity fingerprint for the profile's settings
    pub package_id: PackageId,
    /// Established layout
    pub layout: Layout,
    /// Everything declared to the resolver
    pub graph: DeclaredGraph,
    /// Files written by generators
    pub generated: Vec<PathBuf>,
    /// Where the recipe stopped
    pub state: RecipeState,
    /// Timing
    pub stats: BuildStats,
}

/// Build statistics
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Layout, requirements and generators
    pub install_time: Duration,
    /// Driver configure + build
    pub build_time: Duration,
    pub total_time: Duration,
}

/// Main builder for running a project's recipe
pub struct Builder {
    /// Project root directory
    root_dir: PathBuf,
    /// Package manifest
    manifest: PackageManifest,
    /// Host profile
    profile: HostProfile,
}

impl Builder {
    /// Load and validate the manifest of the project at the given path.
    ///
    /// Uses detected host settings until a profile is supplied with
    /// [`Builder::with_profile`].
    pub fn new(project_path: impl AsRef<Path>) -> BuildResult<Self> {
        let root_dir = absolute_root(project_path.as_ref())?;
        let manifest_path = root_dir.join(MANIFEST_FILE);

        let manifest = PackageManifest::load(&manifest_path)
            .map_err(|e| BuildError::from_package(&manifest_path, e))?;

        Ok(Self {
            root_dir,
            manifest,
            profile: HostProfile::new(detect_host_settings()),
        })
    }

    /// Set the host profile
    pub fn with_profile(mut self, profile: HostProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Override one setting
    pub fn with_setting(mut self, axis: SettingAxis, value: impl Into<String>) -> Self {
        self.profile.override_setting(axis, value);
        self
    }

    pub fn manifest(&self) -> &PackageManifest {
        &self.manifest
    }

    pub fn profile(&self) -> &HostProfile {
        &self.profile
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Bind the manifest to the profile's settings
    pub fn recipe(&self) -> BuildResult<Recipe> {
        Ok(Recipe::new(
            self.manifest.clone(),
            self.profile.settings.clone(),
            &self.root_dir,
        )?
        .with_env(self.profile.env.clone()))
    }

    /// Package id without running any hook
    pub fn package_id(&self) -> BuildResult<PackageId> {
        Ok(self.recipe()?.package_id().clone())
    }

    /// Root under which requirement packages are looked up
    pub fn packages_root(&self) -> PathBuf {
        self.profile
            .packages
            .clone()
            .unwrap_or_else(|| self.root_dir.join(".corekit").join("packages"))
    }

    /// layout -> requirements -> build_requirements -> generate
    pub fn install(&self) -> BuildResult<BuildContext> {
        let start = Instant::now();
        let (recipe, graph, generated) = self.prepare()?;
        let install_time = start.elapsed();

        self.finish(
            recipe,
            graph,
            generated,
            BuildStats {
                install_time,
                build_time: Duration::ZERO,
                total_time: install_time,
            },
        )
    }

    /// Install, then configure and build through `driver`
    pub fn build(&self, driver: &mut dyn BuildDriver) -> BuildResult<BuildContext> {
        let start = Instant::now();
        let (mut recipe, graph, generated) = self.prepare()?;
        let install_time = start.elapsed();

        let build_start = Instant::now();
        recipe.build(driver)?;
        let build_time = build_start.elapsed();

        tracing::info!(
            "Built {} ({}) in {:.2}s",
            self.manifest.reference(),
            recipe.package_id().short(),
            start.elapsed().as_secs_f64()
        );

        self.finish(
            recipe,
            graph,
            generated,
            BuildStats {
                install_time,
                build_time,
                total_time: start.elapsed(),
            },
        )
    }

    fn prepare(&self) -> BuildResult<(Recipe, DeclaredGraph, Vec<PathBuf>)> {
        let mut recipe = self.recipe()?;
        let mut graph = DeclaredGraph::new();

        tracing::info!(
            "Installing {} ({})",
            self.manifest.reference(),
            recipe.package_id().short()
        );

        recipe.layout()?;
        recipe.requirements(&mut graph)?;
        recipe.build_requirements(&mut graph)?;

        let mut generated = recipe.generate(&self.packages_root())?;
        if !generated.is_empty() {
            generated.push(self.write_graph(&recipe, &graph)?);
        }

        Ok((recipe, graph, generated))
    }

    /// Write the declared graph summary next to generated files
    fn write_graph(&self, recipe: &Recipe, graph: &DeclaredGraph) -> BuildResult<PathBuf> {
        let layout = recipe
            .current_layout()
            .ok_or_else(|| BuildError::precondition("generate", recipe.state(), "no layout"))?;
        let path = layout.generators_folder.join(GRAPH_FILE);

        let summary = graph_summary(recipe, graph);
        let text = serde_json::to_string_pretty(&summary)
            .map_err(|e| BuildError::serialize(&path, e))?;
        fs::write(&path, text).map_err(|e| BuildError::io(&path, e))?;
        Ok(path)
    }

    fn finish(
        &self,
        recipe: Recipe,
        graph: DeclaredGraph,
        generated: Vec<PathBuf>,
        stats: BuildStats,
    ) -> BuildResult<BuildContext> {
        let layout = recipe
            .current_layout()
            .cloned()
            .ok_or_else(|| BuildError::precondition("finish", recipe.state(), "no layout"))?;

        Ok(BuildContext {
            manifest: self.manifest.clone(),
            package_id: recipe.package_id().clone(),
            layout,
            graph,
            generated,
            state: recipe.state(),
            stats,
        })
    }
}

/// Anchor a project path at the working directory.
///
/// Generated CMake files must carry absolute paths, so a root such as `.`
/// becomes `<cwd>`. Symlinks are left alone.
fn absolute_root(path: &Path) -> BuildResult<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| BuildError::io(path, e))?
            .join(path)
    };
    Ok(joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect())
}

/// JSON summary of a recipe and its declared graph
pub fn graph_summary(recipe: &Recipe, graph: &DeclaredGraph) -> serde_json::Value {
    let settings: serde_json::Map<String, serde_json::Value> = recipe
        .settings()
        .iter()
        .filter(|(axis, _)| recipe.manifest().declares(*axis))
        .map(|(axis, value)| (axis.name().to_string(), value.into()))
        .collect();
    let references = |refs: Vec<&corekit_package::Reference>| -> Vec<String> {
        refs.into_iter().map(|r| r.to_string()).collect()
    };

    serde_json::json!({
        "package": recipe.manifest().reference().to_string(),
        "package_id": recipe.package_id().as_str(),
        "settings": settings,
        "requires": references(graph.consumer_graph()),
        "tool_requires": references(graph.tool_requirements()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_stats_default() {
        let stats = BuildStats::default();
        assert_eq!(stats.install_time, Duration::ZERO);
        assert_eq!(stats.build_time, Duration::ZERO);
        assert_eq!(stats.total_time, Duration::ZERO);
    }

    #[test]
    fn test_absolute_root() {
        let root = absolute_root(Path::new(".")).unwrap();
        assert!(root.is_absolute());
        assert_eq!(root, std::env::current_dir().unwrap());

        let nested = absolute_root(Path::new("./sub/./project")).unwrap();
        assert!(nested.is_absolute());
        assert!(nested.ends_with("sub/project"));
        assert!(!nested.components().any(|c| c == Component::CurDir));
    }

    #[test]
    fn test_new_requires_manifest() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Builder::new(dir.path()),
            Err(BuildError::ManifestReadError { .. })
        ));
    }
}
