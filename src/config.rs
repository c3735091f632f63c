//! Project configuration, read once at startup.
//!
//! Values come from `.bowerrc` in the working directory, then environment
//! overrides, with fixed defaults for anything left unset. The resulting
//! [`Config`] is passed by reference to every command.

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::path::PathBuf;

use crate::runtime::{Runtime, normalize_path, relative_path_from_dir};

pub const RC_FILE: &str = ".bowerrc";
pub const DEFAULT_DIRECTORY: &str = "bower_components";
pub const DEFAULT_ENGINE: &str = "bower";

/// Raw `.bowerrc` contents; unknown keys are ignored.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct RcFile {
    cwd: Option<PathBuf>,
    directory: Option<PathBuf>,
    rjs_config: Option<PathBuf>,
    default_save: Option<bool>,
    engine: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Process working directory, the base for rendered component locations.
    pub process_cwd: PathBuf,
    /// Project root (absolute).
    pub cwd: PathBuf,
    /// Components directory, relative to `cwd` unless absolute.
    pub directory: PathBuf,
    /// RequireJS configuration file (absolute) when configured.
    pub rjs_config: Option<PathBuf>,
    /// Save installed endpoints to the manifest by default.
    pub default_save: bool,
    /// Installation engine executable.
    pub engine: String,
}

impl Config {
    /// Load configuration for the project at `cwd` (defaults to the process working directory).
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, cwd: Option<PathBuf>) -> Result<Self> {
        let process_cwd = runtime.current_dir()?;
        let mut project_dir = match cwd {
            Some(dir) => normalize_path(&process_cwd.join(dir)),
            None => process_cwd.clone(),
        };

        let rc_path = project_dir.join(RC_FILE);
        let rc = if runtime.is_file(&rc_path) {
            debug!("Reading {:?}", rc_path);
            let content = runtime.read_to_string(&rc_path)?;
            serde_json::from_str::<RcFile>(&content)
                .with_context(|| format!("Failed to parse {:?}", rc_path))?
        } else {
            RcFile::default()
        };

        if let Some(dir) = rc.cwd {
            project_dir = normalize_path(&project_dir.join(dir));
        }

        let directory = runtime
            .env_var("BOWER_DIRECTORY")
            .ok()
            .map(PathBuf::from)
            .or(rc.directory)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIRECTORY));

        let rjs_config = runtime
            .env_var("BOWER_RJS_CONFIG")
            .ok()
            .map(PathBuf::from)
            .or(rc.rjs_config)
            .map(|p| normalize_path(&project_dir.join(p)));

        Ok(Self {
            process_cwd,
            cwd: project_dir,
            directory,
            rjs_config,
            default_save: rc.default_save.unwrap_or(false),
            engine: rc.engine.unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
        })
    }

    /// Absolute path of the components directory.
    pub fn components_dir(&self) -> PathBuf {
        normalize_path(&self.cwd.join(&self.directory))
    }

    /// Components directory as seen from the process working directory.
    /// This is the base of every `location` written into loader configs.
    pub fn components_base(&self) -> PathBuf {
        let project = relative_path_from_dir(&self.process_cwd, &self.cwd)
            .unwrap_or_else(|| self.cwd.clone());
        normalize_path(&project.join(&self.directory))
    }
}
