//! Build-description generators
//!
//! Generators turn the manifest, settings and layout into files the build
//! driver reads: a CMake toolchain file and per-requirement package config
//! files for `find_package()`.

use crate::error::{BuildError, BuildResult};
use crate::layout::Layout;
use corekit_package::{GeneratorKind, Reference, SettingAxis, Settings};
use std::fs;
use std::path::{Path, PathBuf};

/// File written by the CMakeToolchain generator
pub const TOOLCHAIN_FILE: &str = "corekit_toolchain.cmake";

/// Summary of the declared graph, written next to generated files
pub const GRAPH_FILE: &str = "corekit-graph.json";

/// Inputs shared by all generators
#[derive(Debug, Clone)]
pub struct GeneratorContext<'a> {
    pub package: Reference,
    pub settings: &'a Settings,
    pub layout: &'a Layout,
    /// Runtime requirements, in declaration order
    pub requires: &'a [Reference],
    /// Root under which each requirement lives as `<name>/<version>`
    pub packages_root: &'a Path,
}

/// One file produced by a generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub contents: String,
}

pub trait Generator {
    fn kind(&self) -> GeneratorKind;

    fn files(&self, ctx: &GeneratorContext<'_>) -> Vec<GeneratedFile>;
}

/// Generator implementation for a manifest generator name
pub fn generator_for(kind: GeneratorKind) -> Box<dyn Generator> {
    match kind {
        GeneratorKind::CMakeToolchain => Box::new(CMakeToolchain),
        GeneratorKind::CMakeDeps => Box::new(CMakeDeps),
    }
}

/// Write generated files into `dir`, returning their paths
pub fn write_files(dir: &Path, files: &[GeneratedFile]) -> BuildResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = dir.join(&file.name);
        fs::write(&path, &file.contents).map_err(|e| BuildError::io(&path, e))?;
        tracing::debug!("Generated {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// CMake paths always use forward slashes
fn cmake_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

/// Quote a value as a CMake quoted argument
fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' | '"' | '$' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn header(generator: GeneratorKind, package: &Reference) -> String {
    format!(
        "# Generated by corekit ({}) for {}. Do not edit.\n",
        generator, package
    )
}

/// Emits `corekit_toolchain.cmake`
pub struct CMakeToolchain;

impl CMakeToolchain {
    fn osx_architecture(arch: &str) -> Option<&'static str> {
        match arch {
            "armv8" => Some("arm64"),
            "x86_64" => Some("x86_64"),
            _ => None,
        }
    }
}

impl Generator for CMakeToolchain {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::CMakeToolchain
    }

    fn files(&self, ctx: &GeneratorContext<'_>) -> Vec<GeneratedFile> {
        let mut out = header(self.kind(), &ctx.package);
        out.push_str("include_guard()\n\n");

        if !ctx.layout.multi_config {
            if let Some(build_type) = ctx.settings.get(SettingAxis::BuildType) {
                out.push_str(&format!(
                    "set(CMAKE_BUILD_TYPE {} CACHE STRING \"Build type\" FORCE)\n",
                    quoted(build_type)
                ));
            }
        }

        if ctx.settings.get(SettingAxis::Os) == Some("Macos") {
            if let Some(arch) = ctx
                .settings
                .get(SettingAxis::Arch)
                .and_then(Self::osx_architecture)
            {
                out.push_str(&format!(
                    "set(CMAKE_OSX_ARCHITECTURES \"{}\" CACHE STRING \"\" FORCE)\n",
                    arch
                ));
            }
        }

        out.push_str(&format!(
            "set(COREKIT_PACKAGE_NAME {})\nset(COREKIT_PACKAGE_VERSION {})\n",
            quoted(&ctx.package.name),
            quoted(&ctx.package.version)
        ));
        for (axis, value) in ctx.settings.iter() {
            out.push_str(&format!(
                "set(COREKIT_SETTING_{} {})\n",
                axis.name().to_uppercase(),
                quoted(value)
            ));
        }

        let generators = quoted(&cmake_path(&ctx.layout.generators_folder));
        out.push_str(&format!(
            "\nlist(PREPEND CMAKE_PREFIX_PATH {0})\nlist(PREPEND CMAKE_MODULE_PATH {0})\n",
            generators
        ));
        out.push_str("set(CMAKE_FIND_PACKAGE_PREFER_CONFIG ON)\n");

        vec![GeneratedFile {
            name: TOOLCHAIN_FILE.to_string(),
            contents: out,
        }]
    }
}

/// Emits `<name>-config.cmake` and `<name>-config-version.cmake` per
/// runtime requirement
pub struct CMakeDeps;

impl CMakeDeps {
    fn config(ctx: &GeneratorContext<'_>, dep: &Reference) -> GeneratedFile {
        let name = &dep.name;
        let root = quoted(&cmake_path(
            &ctx.packages_root.join(&dep.name).join(&dep.version),
        ));
        let mut out = header(GeneratorKind::CMakeDeps, dep);
        out.push_str(&format!(
            r#"set({name}_FOUND TRUE)
set({name}_VERSION {version})
set({name}_ROOT {root})
set({name}_INCLUDE_DIRS "${{{name}_ROOT}}/include")
set({name}_LIB_DIRS "${{{name}_ROOT}}/lib")

if(NOT TARGET {name}::{name})
  add_library({name}::{name} INTERFACE IMPORTED)
  set_target_properties({name}::{name} PROPERTIES
    INTERFACE_INCLUDE_DIRECTORIES "${{{name}_INCLUDE_DIRS}}"
    INTERFACE_LINK_DIRECTORIES "${{{name}_LIB_DIRS}}")
endif()
"#,
            name = name,
            version = quoted(&dep.version),
            root = root,
        ));
        GeneratedFile {
            name: format!("{}-config.cmake", name),
            contents: out,
        }
    }

    fn config_version(dep: &Reference) -> GeneratedFile {
        let mut out = header(GeneratorKind::CMakeDeps, dep);
        out.push_str(&format!(
            r#"set(PACKAGE_VERSION {version})

if(PACKAGE_FIND_VERSION VERSION_GREATER PACKAGE_VERSION)
  set(PACKAGE_VERSION_COMPATIBLE FALSE)
else()
  set(PACKAGE_VERSION_COMPATIBLE TRUE)
  if(PACKAGE_FIND_VERSION STREQUAL PACKAGE_VERSION)
    set(PACKAGE_VERSION_EXACT TRUE)
  endif()
endif()
"#,
            version = quoted(&dep.version),
        ));
        GeneratedFile {
            name: format!("{}-config-version.cmake", dep.name),
            contents: out,
        }
    }
}

impl Generator for CMakeDeps {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::CMakeDeps
    }

    fn files(&self, ctx: &GeneratorContext<'_>) -> Vec<GeneratedFile> {
        ctx.requires
            .iter()
            .flat_map(|dep| [Self::config(ctx, dep), Self::config_version(dep)])
            .collect()
    }
}
