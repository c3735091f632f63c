use log::debug;

use super::endpoint::Endpoint;
use super::installer::{InstallOptions, Installer};
use crate::config::Config;
use crate::error::SyncError;
use crate::event::Logger;
use crate::loader::{MergeOptions, VendorRegistry};
use crate::package::PackageTree;
use crate::pipeline::{run_vendors, sync_vendor};
use crate::runtime::Runtime;

/// Install endpoints, then synchronize every configured loader.
///
/// Loaders are only touched after installation succeeded. The returned value
/// is whatever the installer reported; loader results are not merged into it.
#[tracing::instrument(skip(runtime, config, registry, installer, tree, logger))]
#[allow(clippy::too_many_arguments)]
pub async fn install<R, I, T>(
    runtime: &R,
    config: &Config,
    registry: &VendorRegistry,
    installer: &I,
    tree: &T,
    endpoints: &[String],
    options: InstallOptions,
    logger: &Logger,
) -> Result<Vec<Endpoint>, SyncError>
where
    R: Runtime,
    I: Installer + ?Sized,
    T: PackageTree + ?Sized,
{
    let endpoints = endpoints
        .iter()
        .map(|e| e.parse::<Endpoint>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut options = options;
    if options.save.is_none() {
        options.save = Some(config.default_save);
    }

    let installed = installer
        .install(&endpoints, &options)
        .await
        .map_err(SyncError::Upstream)?;

    let vendors = registry.configured(config);
    debug!("Synchronizing {} configured loader(s)", vendors.len());

    let jobs = vendors
        .iter()
        .map(|vendor| {
            sync_vendor(
                runtime,
                config,
                tree,
                vendor.as_ref(),
                MergeOptions::default(),
                logger,
            )
        })
        .collect();

    run_vendors(installed, jobs).await
}
