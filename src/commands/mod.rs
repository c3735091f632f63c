//! Command implementations behind the CLI.

mod endpoint;
mod install;
mod installer;
mod plant;
mod render;

pub use endpoint::Endpoint;
pub use install::install;
pub use installer::{InstallOptions, Installer, ProcessInstaller};
pub use plant::plant;
pub use render::{OutputFormat, format_entry, format_error, spawn_renderer};

#[cfg(test)]
pub use installer::MockInstaller;
