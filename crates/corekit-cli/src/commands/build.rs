//! Build command - install, then configure and build with CMake

use super::load_builder;
use anyhow::{Context, Result};
use colored::Colorize;
use corekit_build::CMakeDriver;
use std::path::PathBuf;

/// Build command arguments
pub struct BuildArgs {
    /// Project directory
    pub project_dir: PathBuf,
    /// Raw `axis=value` overrides
    pub settings: Vec<String>,
    /// From --release / --debug
    pub build_type: Option<&'static str>,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
    /// Quiet output (errors only)
    pub quiet: bool,
}

/// Run the build command
pub fn run(args: BuildArgs) -> Result<()> {
    let builder = load_builder(&args.project_dir, &args.settings, args.build_type)?;

    let mut driver = CMakeDriver::from_profile(builder.profile());
    if let Some(jobs) = args.jobs {
        driver = driver.with_jobs(jobs);
    }

    let context = builder.build(&mut driver).context("Build failed")?;

    if !args.quiet {
        println!(
            "{} {} ({}) in {:.2}s",
            "Built".green().bold(),
            context.manifest.reference(),
            context.package_id.short(),
            context.stats.total_time.as_secs_f64()
        );
        println!("  Build folder: {}", context.layout.build_folder.display());
        println!(
            "  Install: {:.2}s, configure + build: {:.2}s",
            context.stats.install_time.as_secs_f64(),
            context.stats.build_time.as_secs_f64()
        );
    }

    Ok(())
}
