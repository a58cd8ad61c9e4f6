//! Install command - layout, requirements and generators, no build

use super::load_builder;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

pub struct InstallArgs {
    pub project_dir: PathBuf,
    pub settings: Vec<String>,
    pub build_type: Option<&'static str>,
}

pub fn run(args: InstallArgs) -> Result<()> {
    let builder = load_builder(&args.project_dir, &args.settings, args.build_type)?;
    let context = builder.install().context("Install failed")?;

    println!(
        "{} {} ({})",
        "Installed".green().bold(),
        context.manifest.reference(),
        context.package_id.short()
    );
    println!("  Build folder: {}", context.layout.build_folder.display());
    println!(
        "  Requirements: {} declared ({} host, {} tool)",
        context.graph.len(),
        context.graph.consumer_graph().len(),
        context.graph.tool_requirements().len()
    );
    for path in &context.generated {
        println!("  Generated {}", path.display());
    }

    Ok(())
}
