use crate::config::Config;
use crate::error::SyncError;
use crate::event::Logger;
use crate::loader::{MergeOptions, VendorRegistry};
use crate::package::{EntryMap, PackageTree};
use crate::pipeline::sync_vendor;
use crate::runtime::Runtime;

/// Synchronize the configuration of one explicitly requested loader vendor.
///
/// A missing or unknown vendor id is a user error reported before anything
/// is read. Other loaders configured for the project are left alone.
#[tracing::instrument(skip(runtime, config, registry, tree, logger))]
pub async fn plant<R, T>(
    runtime: &R,
    config: &Config,
    registry: &VendorRegistry,
    tree: &T,
    vendor_id: Option<&str>,
    options: MergeOptions,
    logger: &Logger,
) -> Result<EntryMap, SyncError>
where
    R: Runtime,
    T: PackageTree + ?Sized,
{
    let vendor = registry.resolve(vendor_id)?;

    sync_vendor(runtime, config, tree, vendor.as_ref(), options, logger).await
}
