//! CoreKit host profiles
//!
//! A profile supplies everything about the build machine that a manifest
//! leaves open: values for the build axes, the build tool to run, extra
//! environment, and where resolved packages live.
//!
//! # Precedence
//!
//! Later sources override earlier ones:
//! 1. Detected host defaults
//! 2. Global profile (`~/.corekit/profile.toml`, or `$COREKIT_HOME/profile.toml`)
//! 3. Project profile (`<project>/.corekit/profile.toml`)
//! 4. Environment variables (`COREKIT_*`)
//! 5. CLI flags (applied by the caller)
//!
//! # Example
//!
//! ```no_run
//! use corekit_config::ProfileLoader;
//! use std::path::Path;
//!
//! let profile = ProfileLoader::new().load(Some(Path::new("."))).unwrap();
//! println!("cmake: {}", profile.cmake.display());
//! ```

pub mod detect;
pub mod loader;
pub mod profile;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read profile: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use detect::detect_host_settings;
pub use loader::ProfileLoader;
pub use profile::{HostProfile, ProfileFile};
