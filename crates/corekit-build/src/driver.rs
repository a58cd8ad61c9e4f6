//! Build driver capability
//!
//! The driver is the external tool that actually compiles: the recipe only
//! hands it a [`DriverContext`] and calls `configure` then `build`.

use crate::layout::Layout;
use corekit_package::{Reference, SettingAxis, Settings};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Driver lifecycle step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverStep {
    Configure,
    Build,
}

impl DriverStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Build => "build",
        }
    }
}

impl fmt::Display for DriverStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Build tool '{}' not found", .program.display())]
    ToolNotFound { program: PathBuf },

    #[error("Failed to run '{}': {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} step failed ({status}){}", stderr_suffix(.stderr))]
    StepFailed {
        step: DriverStep,
        status: String,
        stderr: String,
    },

    #[error("{0}")]
    Other(String),
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{}", trimmed)
    }
}

/// Everything a driver may look at, borrowed from the recipe for the
/// duration of one `build()` call
#[derive(Debug, Clone)]
pub struct DriverContext<'a> {
    pub package: Reference,
    pub layout: &'a Layout,
    pub settings: &'a Settings,
    /// Toolchain file emitted by the CMakeToolchain generator, if any
    pub toolchain_file: Option<PathBuf>,
    pub env: &'a BTreeMap<String, String>,
}

impl<'a> DriverContext<'a> {
    pub fn build_type(&self) -> Option<&str> {
        self.settings.get(SettingAxis::BuildType)
    }
}

/// External build driver.
///
/// Implementations must not retry; the recipe relies on one call per step.
pub trait BuildDriver {
    /// Human-readable tool name for logs
    fn name(&self) -> &str;

    fn configure(&mut self, ctx: &DriverContext<'_>) -> Result<(), DriverError>;

    fn build(&mut self, ctx: &DriverContext<'_>) -> Result<(), DriverError>;
}

impl<D: BuildDriver + ?Sized> BuildDriver for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn configure(&mut self, ctx: &DriverContext<'_>) -> Result<(), DriverError> {
        (**self).configure(ctx)
    }

    fn build(&mut self, ctx: &DriverContext<'_>) -> Result<(), DriverError> {
        (**self).build(ctx)
    }
}
