//! CMake build driver
//!
//! Runs `cmake -S <src> -B <build> ...` to configure and
//! `cmake --build <build> ...` to build. Output is captured; stdout goes to
//! the debug log, stderr is attached to the error on failure.

use crate::driver::{BuildDriver, DriverContext, DriverError, DriverStep};
use corekit_config::HostProfile;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;

/// CMake driver configured from the host profile
#[derive(Debug, Clone)]
pub struct CMakeDriver {
    program: PathBuf,
    generator: Option<String>,
    jobs: Option<usize>,
}

impl CMakeDriver {
    /// Driver running `program`
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            generator: None,
            jobs: None,
        }
    }

    /// Driver using the profile's tool configuration
    pub fn from_profile(profile: &HostProfile) -> Self {
        Self {
            program: profile.cmake.clone(),
            generator: profile.cmake_generator.clone(),
            jobs: profile.jobs,
        }
    }

    /// Set the CMake generator (`-G`)
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = Some(generator.into());
        self
    }

    /// Set parallel build jobs
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Arguments for the configure step
    pub fn configure_args(&self, ctx: &DriverContext<'_>) -> Vec<OsString> {
        let layout = ctx.layout;
        let mut args: Vec<OsString> = vec![
            "-S".into(),
            layout.source_folder.clone().into(),
            "-B".into(),
            layout.build_folder.clone().into(),
        ];

        if let Some(generator) = &self.generator {
            args.push("-G".into());
            args.push(generator.into());
        }

        if let Some(toolchain) = &ctx.toolchain_file {
            let mut define = OsString::from("-DCMAKE_TOOLCHAIN_FILE=");
            define.push(toolchain);
            args.push(define);
        }

        if !layout.multi_config {
            if let Some(build_type) = ctx.build_type() {
                args.push(format!("-DCMAKE_BUILD_TYPE={}", build_type).into());
            }
        }

        args
    }

    /// Arguments for the build step
    pub fn build_args(&self, ctx: &DriverContext<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--build".into(), ctx.layout.build_folder.clone().into()];

        if ctx.layout.multi_config {
            if let Some(build_type) = ctx.build_type() {
                args.push("--config".into());
                args.push(build_type.into());
            }
        }

        if let Some(jobs) = self.jobs {
            args.push("--parallel".into());
            args.push(jobs.to_string().into());
        }

        args
    }

    fn run(
        &self,
        step: DriverStep,
        args: Vec<OsString>,
        ctx: &DriverContext<'_>,
    ) -> Result<(), DriverError> {
        tracing::debug!(
            "Running {} {}",
            self.program.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let start = Instant::now();
        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(&ctx.layout.source_folder)
            .envs(ctx.env)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => DriverError::ToolNotFound {
                    program: self.program.clone(),
                },
                _ => DriverError::Spawn {
                    program: self.program.clone(),
                    source: e,
                },
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            tracing::debug!("[cmake {}] {}", step, line);
        }

        if !output.status.success() {
            let status = match output.status.code() {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            };
            return Err(DriverError::StepFailed {
                step,
                status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        tracing::debug!(
            "cmake {} finished in {:.2}s",
            step,
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }
}

impl Default for CMakeDriver {
    fn default() -> Self {
        Self::new(corekit_config::profile::DEFAULT_CMAKE)
    }
}

impl BuildDriver for CMakeDriver {
    fn name(&self) -> &str {
        "cmake"
    }

    fn configure(&mut self, ctx: &DriverContext<'_>) -> Result<(), DriverError> {
        let args = self.configure_args(ctx);
        self.run(DriverStep::Configure, args, ctx)
    }

    fn build(&mut self, ctx: &DriverContext<'_>) -> Result<(), DriverError> {
        let args = self.build_args(ctx);
        self.run(DriverStep::Build, args, ctx)
    }
}
