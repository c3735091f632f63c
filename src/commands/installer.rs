use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;
use tokio::process::Command;

use super::endpoint::Endpoint;
use crate::event::Logger;

/// Flags forwarded to the installation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    pub force_latest: bool,
    pub production: bool,
    /// `None` when not given on the command line; the project default applies.
    pub save: Option<bool>,
    pub save_dev: bool,
}

impl InstallOptions {
    /// Command line flags for the engine.
    pub fn engine_args(&self) -> Vec<&'static str> {
        let mut args = Vec::new();
        if self.force_latest {
            args.push("--force-latest");
        }
        if self.production {
            args.push("--production");
        }
        if self.save == Some(true) {
            args.push("--save");
        }
        if self.save_dev {
            args.push("--save-dev");
        }
        args
    }
}

/// Fetches and installs packages into the components directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Installer: Send + Sync {
    /// Install `endpoints` (all manifest dependencies when empty) and return
    /// the endpoints that were requested.
    async fn install(&self, endpoints: &[Endpoint], options: &InstallOptions) -> Result<Vec<Endpoint>>;
}

/// Runs an external installation engine such as `bower install`.
pub struct ProcessInstaller {
    program: String,
    cwd: PathBuf,
    logger: Logger,
}

impl ProcessInstaller {
    pub fn new(program: impl Into<String>, cwd: PathBuf, logger: Logger) -> Self {
        Self {
            program: program.into(),
            cwd,
            logger,
        }
    }

    pub fn args(endpoints: &[Endpoint], options: &InstallOptions) -> Vec<String> {
        let mut args = vec!["install".to_string()];
        args.extend(endpoints.iter().map(Endpoint::to_string));
        args.extend(options.engine_args().into_iter().map(String::from));
        args
    }
}

#[async_trait]
impl Installer for ProcessInstaller {
    #[tracing::instrument(skip(self))]
    async fn install(&self, endpoints: &[Endpoint], options: &InstallOptions) -> Result<Vec<Endpoint>> {
        let args = Self::args(endpoints, options);
        debug!("Running {} {:?} in {:?}", self.program, args, self.cwd);
        self.logger
            .action("install", format!("{} {}", self.program, args.join(" ")));

        let status = Command::new(&self.program)
            .args(&args)
            .current_dir(&self.cwd)
            .status()
            .await
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !status.success() {
            bail!("{} install failed with {}", self.program, status);
        }

        Ok(endpoints.to_vec())
    }
}
