//! Fan-out of loader synchronization over vendors.
//!
//! Each vendor runs as one sub-job. Sub-jobs share the caller's [`Logger`],
//! so their progress entries reach subscribers as they happen, in order per
//! sub-job. Sub-jobs are polled together on the current task; nothing is
//! spawned and there is no cancellation.

use futures_util::future::join_all;
use log::debug;
use std::future::Future;

use crate::config::Config;
use crate::error::SyncError;
use crate::event::Logger;
use crate::loader::{MergeOptions, Vendor};
use crate::package::{EntryMap, PackageTree, synthesize_entries};
use crate::runtime::Runtime;

/// Drive every job to completion and fold the outcomes.
///
/// With no jobs the upstream value is returned straight away. Otherwise the
/// upstream value is returned once all jobs succeeded (their results are
/// dropped), or the first failure in job order once all jobs have finished.
pub async fn run_vendors<T, O, F>(upstream: T, jobs: Vec<F>) -> Result<T, SyncError>
where
    F: Future<Output = Result<O, SyncError>>,
{
    if jobs.is_empty() {
        return Ok(upstream);
    }

    let mut failure = None;
    for result in join_all(jobs).await {
        if let Err(err) = result {
            if failure.is_none() {
                failure = Some(err);
            } else {
                debug!("Additional vendor failure: {}", err);
            }
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(upstream),
    }
}

/// Synchronize one vendor's configuration with the installed tree.
#[tracing::instrument(skip_all, fields(vendor = vendor.id()))]
pub async fn sync_vendor<R, T>(
    runtime: &R,
    config: &Config,
    tree: &T,
    vendor: &dyn Vendor,
    options: MergeOptions,
    logger: &Logger,
) -> Result<EntryMap, SyncError>
where
    R: Runtime,
    T: PackageTree + ?Sized,
{
    let nodes = tree.read_tree().await.map_err(SyncError::Upstream)?;
    let entries = synthesize_entries(runtime, &nodes, &config.components_base()).map_err(
        |source| SyncError::Io {
            path: config.components_dir(),
            source,
        },
    )?;

    logger.info(
        "updating",
        format!("Updating {} packages definitions.", vendor.id()),
    );

    let path = vendor
        .config_path(config)
        .ok_or_else(|| SyncError::ConfigNotFound {
            vendor: vendor.id().to_string(),
            path: config.cwd.clone(),
        })?;
    if !(runtime.exists(&path) && runtime.is_file(&path)) {
        return Err(SyncError::ConfigNotFound {
            vendor: vendor.id().to_string(),
            path,
        });
    }

    let existing = runtime
        .read_to_string(&path)
        .map_err(|source| SyncError::Io {
            path: path.clone(),
            source,
        })?;

    let updated = vendor
        .synthesize(&entries, &existing, options, logger)
        .map_err(|e| SyncError::Parse {
            path: path.clone(),
            message: format!("{:#}", e),
        })?;

    runtime
        .write(&path, updated.as_bytes())
        .map_err(|source| SyncError::Io {
            path: path.clone(),
            source,
        })?;

    logger.info(
        "updated",
        format!("Updated {} packages with components", vendor.label()),
    );

    Ok(entries)
}
