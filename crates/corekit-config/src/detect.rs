//! Host settings detection

use corekit_package::{SettingAxis, Settings};

/// Build type used when no profile or flag picks one
pub const DEFAULT_BUILD_TYPE: &str = "Release";

/// Setting values describing the machine we are running on
pub fn detect_host_settings() -> Settings {
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;

    Settings::new()
        .with(SettingAxis::Os, os_setting(os))
        .with(SettingAxis::Compiler, default_compiler(os))
        .with(SettingAxis::BuildType, DEFAULT_BUILD_TYPE)
        .with(SettingAxis::Arch, arch_setting(arch))
}

/// Map a Rust target OS name to its setting value
pub fn os_setting(os: &str) -> String {
    match os {
        "linux" => "Linux".to_string(),
        "macos" => "Macos".to_string(),
        "windows" => "Windows".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        "android" => "Android".to_string(),
        "ios" => "iOS".to_string(),
        other => other.to_string(),
    }
}

/// Map a Rust target arch name to its setting value
pub fn arch_setting(arch: &str) -> String {
    match arch {
        "x86_64" => "x86_64".to_string(),
        "x86" => "x86".to_string(),
        "aarch64" => "armv8".to_string(),
        "arm" => "armv7".to_string(),
        "riscv64" => "riscv64".to_string(),
        other => other.to_string(),
    }
}

/// Platform-conventional compiler
pub fn default_compiler(os: &str) -> &'static str {
    match os {
        "windows" => "msvc",
        "macos" | "ios" => "apple-clang",
        "freebsd" => "clang",
        _ => "gcc",
    }
}
