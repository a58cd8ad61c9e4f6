use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// CoreKit package build invoker.
///
/// Reads `corekit.toml`, declares its requirements, emits CMake toolchain
/// and dependency files, and drives CMake to configure and build.
///
/// EXAMPLES:
///     corekit info                    Show the package and its package id
///     corekit install                 Lay out, declare and generate files
///     corekit build --release         Full build with build_type=Release
///     corekit build -s arch=armv8     Override a setting
///
/// ENVIRONMENT VARIABLES:
///     COREKIT_HOME        Global configuration directory (default ~/.corekit)
///     COREKIT_<AXIS>      Setting overrides (OS, COMPILER, BUILD_TYPE, ARCH)
///     COREKIT_CMAKE       CMake executable
///     RUST_LOG            Log filter (e.g. corekit_build=debug)
#[derive(Parser)]
#[command(name = "corekit")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory containing corekit.toml
    #[arg(short = 'C', long = "project-dir", global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the manifest, effective settings and package id
    ///
    /// EXAMPLES:
    ///     corekit info
    ///     corekit info --json | jq .package_id
    Info {
        /// Override a setting (axis=value), may repeat
        #[arg(short = 's', long = "setting", value_name = "AXIS=VALUE")]
        settings: Vec<String>,
        /// JSON output
        #[arg(long, env = "COREKIT_JSON")]
        json: bool,
    },

    /// Establish the layout, declare requirements and run generators
    Install {
        /// Override a setting (axis=value), may repeat
        #[arg(short = 's', long = "setting", value_name = "AXIS=VALUE")]
        settings: Vec<String>,
        /// Shorthand for -s build_type=Release
        #[arg(long, conflicts_with = "debug")]
        release: bool,
        /// Shorthand for -s build_type=Debug
        #[arg(long)]
        debug: bool,
    },

    /// Install, then configure and build with CMake
    #[command(visible_alias = "b")]
    Build {
        /// Override a setting (axis=value), may repeat
        #[arg(short = 's', long = "setting", value_name = "AXIS=VALUE")]
        settings: Vec<String>,
        /// Shorthand for -s build_type=Release
        #[arg(long, conflicts_with = "debug")]
        release: bool,
        /// Shorthand for -s build_type=Debug
        #[arg(long)]
        debug: bool,
        /// Parallel build jobs
        #[arg(long, short = 'j')]
        jobs: Option<usize>,
        /// Quiet output (errors only)
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { settings, json } => commands::info::run(commands::info::InfoArgs {
            project_dir: cli.project_dir,
            settings,
            json,
        }),
        Commands::Install {
            settings,
            release,
            debug,
        } => commands::install::run(commands::install::InstallArgs {
            project_dir: cli.project_dir,
            settings,
            build_type: commands::build_type_flag(release, debug),
        }),
        Commands::Build {
            settings,
            release,
            debug,
            jobs,
            quiet,
        } => commands::build::run(commands::build::BuildArgs {
            project_dir: cli.project_dir,
            settings,
            build_type: commands::build_type_flag(release, debug),
            jobs,
            quiet,
        }),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
