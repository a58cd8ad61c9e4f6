//! Info command - show a package, its settings and package id

use super::load_builder;
use anyhow::Result;
use colored::Colorize;
use corekit_package::SettingAxis;
use std::path::PathBuf;

pub struct InfoArgs {
    pub project_dir: PathBuf,
    pub settings: Vec<String>,
    pub json: bool,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let builder = load_builder(&args.project_dir, &args.settings, None)?;
    let manifest = builder.manifest();
    let package_id = builder.package_id()?;
    let settings = &builder.profile().settings;

    let declared: Vec<(SettingAxis, &str)> = manifest
        .settings
        .iter()
        .map(|axis| (*axis, settings.get(*axis).unwrap_or("None")))
        .collect();

    if args.json {
        let settings_json: serde_json::Map<String, serde_json::Value> = declared
            .iter()
            .map(|(axis, value)| (axis.name().to_string(), (*value).into()))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "package": manifest.reference().to_string(),
                "package_id": package_id.as_str(),
                "layout": manifest.layout.name(),
                "settings": settings_json,
                "generators": manifest.generators.iter().map(|g| g.name()).collect::<Vec<_>>(),
                "requires": manifest.requires.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
                "tool_requires": manifest.tool_requires.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
            }))?
        );
        return Ok(());
    }

    println!("{}", manifest.reference().to_string().bold());
    if let Some(description) = &manifest.package.description {
        println!("  {}", description);
    }
    println!("  package id: {}", package_id);
    println!("  layout:     {}", manifest.layout.name());
    println!("  settings:");
    for (axis, value) in &declared {
        println!("    {}={}", axis, value);
    }
    if !manifest.generators.is_empty() {
        let names: Vec<&str> = manifest.generators.iter().map(|g| g.name()).collect();
        println!("  generators: {}", names.join(", "));
    }
    println!("  requires:");
    for reference in &manifest.requires {
        println!("    {}", reference);
    }
    println!("  tool_requires:");
    for reference in &manifest.tool_requires {
        println!("    {}", reference);
    }

    Ok(())
}
