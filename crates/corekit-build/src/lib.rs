//! CoreKit build host
//!
//! Runs a package manifest through its lifecycle:
//! - Layout: where sources, build output and generated files live
//! - Requirements: declare runtime and tool requirements to a resolver
//! - Generate: emit toolchain and dependency files for the build driver
//! - Build: configure, then build, through an external driver (CMake)

pub mod builder;
pub mod cmake;
pub mod driver;
pub mod error;
pub mod generators;
pub mod layout;
pub mod recipe;

// Re-export main types
pub use builder::{BuildContext, BuildStats, Builder};
pub use cmake::CMakeDriver;
pub use driver::{BuildDriver, DriverContext, DriverError, DriverStep};
pub use error::{BuildError, BuildResult};
pub use generators::{GeneratedFile, Generator, GeneratorContext};
pub use layout::Layout;
pub use recipe::{Recipe, RecipeState};

// Re-export corekit-package types for convenience
pub use corekit_package::{DeclaredGraph, DependencyResolver, PackageManifest, Scope};
