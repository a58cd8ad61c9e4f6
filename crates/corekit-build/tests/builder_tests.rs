//! Builder tests against real project directories

use corekit_build::{
    BuildDriver, BuildError, Builder, DriverContext, DriverError, DriverStep, RecipeState,
};
use corekit_config::HostProfile;
use corekit_package::{SettingAxis, Settings};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const COREKIT_MANIFEST: &str = r#"
settings = ["os", "compiler", "build_type", "arch"]
generators = ["CMakeToolchain", "CMakeDeps"]
layout = "cmake"
requires = ["ctre/3.10.0", "openssl/3.6.0"]
tool_requires = ["cmake/3.27.9"]

[package]
name = "CoreKit"
version = "0.1"
"#;

/// Create a project directory with the given manifest
fn create_project(manifest: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("corekit.toml"), manifest).unwrap();
    fs::write(
        dir.path().join("CMakeLists.txt"),
        "cmake_minimum_required(VERSION 3.27)\nproject(CoreKit CXX)\n",
    )
    .unwrap();
    dir
}

fn profile(build_type: &str) -> HostProfile {
    let mut profile = HostProfile::new(
        Settings::new()
            .with(SettingAxis::Os, "Linux")
            .with(SettingAxis::Compiler, "gcc")
            .with(SettingAxis::BuildType, build_type)
            .with(SettingAxis::Arch, "x86_64"),
    );
    profile.env.insert("CC".to_string(), "gcc-13".to_string());
    profile
}

#[derive(Default)]
struct StubDriver {
    calls: Vec<DriverStep>,
    env_seen: Option<String>,
    fail_configure: bool,
}

impl BuildDriver for StubDriver {
    fn name(&self) -> &str {
        "stub"
    }

    fn configure(&mut self, ctx: &DriverContext<'_>) -> Result<(), DriverError> {
        self.calls.push(DriverStep::Configure);
        self.env_seen = ctx.env.get("CC").cloned();
        if self.fail_configure {
            return Err(DriverError::StepFailed {
                step: DriverStep::Configure,
                status: "exit code 1".to_string(),
                stderr: "CMake Error at CMakeLists.txt:2".to_string(),
            });
        }
        Ok(())
    }

    fn build(&mut self, _ctx: &DriverContext<'_>) -> Result<(), DriverError> {
        self.calls.push(DriverStep::Build);
        Ok(())
    }
}

#[test]
fn test_install_generates_files_and_graph() {
    let project = create_project(COREKIT_MANIFEST);
    let builder = Builder::new(project.path())
        .unwrap()
        .with_profile(profile("Release"));

    let context = builder.install().unwrap();

    assert_eq!(context.state, RecipeState::Configured);
    assert_eq!(
        context.layout.build_folder,
        project.path().join("build").join("Release")
    );
    // 1 toolchain + 2 per dependency + graph summary
    assert_eq!(context.generated.len(), 6);

    let graph_path = context.layout.generators_folder.join("corekit-graph.json");
    let graph: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(graph_path).unwrap()).unwrap();
    assert_eq!(graph["package"], "CoreKit/0.1");
    assert_eq!(graph["package_id"], context.package_id.as_str());
    assert_eq!(graph["settings"]["build_type"], "Release");
    assert_eq!(
        graph["requires"],
        serde_json::json!(["ctre/3.10.0", "openssl/3.6.0"])
    );
    assert_eq!(graph["tool_requires"], serde_json::json!(["cmake/3.27.9"]));
}

#[test]
fn test_deps_point_into_packages_root() {
    let project = create_project(COREKIT_MANIFEST);
    let mut host = profile("Release");
    host.packages = Some(PathBuf::from("/opt/corekit/p"));
    let builder = Builder::new(project.path()).unwrap().with_profile(host);

    let context = builder.install().unwrap();

    let ctre = fs::read_to_string(context.layout.generators_folder.join("ctre-config.cmake"))
        .unwrap();
    assert!(ctre.contains("set(ctre_ROOT \"/opt/corekit/p/ctre/3.10.0\")"));
}

#[test]
fn test_build_runs_driver_with_profile_env() {
    let project = create_project(COREKIT_MANIFEST);
    let builder = Builder::new(project.path())
        .unwrap()
        .with_profile(profile("Debug"));
    let mut driver = StubDriver::default();

    let context = builder.build(&mut driver).unwrap();

    assert_eq!(context.state, RecipeState::Built);
    assert_eq!(driver.calls, vec![DriverStep::Configure, DriverStep::Build]);
    assert_eq!(driver.env_seen.as_deref(), Some("gcc-13"));
    assert!(context.stats.total_time >= context.stats.build_time);
}

#[test]
fn test_build_surfaces_driver_error() {
    let project = create_project(COREKIT_MANIFEST);
    let builder = Builder::new(project.path())
        .unwrap()
        .with_profile(profile("Release"));
    let mut driver = StubDriver {
        fail_configure: true,
        ..Default::default()
    };

    let err = builder.build(&mut driver).unwrap_err();

    assert_eq!(driver.calls, vec![DriverStep::Configure]);
    assert!(matches!(
        err,
        BuildError::Driver(DriverError::StepFailed {
            step: DriverStep::Configure,
            ..
        })
    ));
}

#[test]
fn test_duplicate_requirement_rejected_on_load() {
    let project = create_project(
        r#"
requires = ["ctre/3.10.0", "ctre/3.9.0"]

[package]
name = "CoreKit"
version = "0.1"
"#,
    );

    match Builder::new(project.path()) {
        Err(BuildError::InvalidManifest(reason)) => {
            assert!(reason.contains("Duplicate requirement 'ctre'"), "{}", reason);
        }
        Err(other) => panic!("expected invalid manifest, got {:?}", other),
        Ok(_) => panic!("expected invalid manifest"),
    }
}

#[test]
fn test_malformed_reference_rejected_on_load() {
    let project = create_project(
        r#"
requires = ["openssl"]

[package]
name = "CoreKit"
version = "0.1"
"#,
    );

    assert!(matches!(
        Builder::new(project.path()),
        Err(BuildError::InvalidManifest(_))
    ));
}

#[test]
fn test_package_id_follows_settings() {
    let project = create_project(COREKIT_MANIFEST);
    let x86 = Builder::new(project.path())
        .unwrap()
        .with_profile(profile("Release"));
    let arm = Builder::new(project.path())
        .unwrap()
        .with_profile(profile("Release"))
        .with_setting(SettingAxis::Arch, "armv8");

    assert_ne!(x86.package_id().unwrap(), arm.package_id().unwrap());
    assert_eq!(
        x86.package_id().unwrap(),
        Builder::new(project.path())
            .unwrap()
            .with_profile(profile("Release"))
            .package_id()
            .unwrap()
    );
}

#[test]
fn test_layout_blocked_by_file() {
    let project = create_project(COREKIT_MANIFEST);
    fs::write(project.path().join("build"), "not a directory").unwrap();
    let builder = Builder::new(project.path())
        .unwrap()
        .with_profile(profile("Release"));

    assert!(matches!(builder.install(), Err(BuildError::Layout(_))));
}
