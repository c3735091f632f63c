use anyhow::Result;
use std::path::PathBuf;

use super::merge::{MergeOptions, merge_packages};
use super::transform::{ConfigTransform, RequireJsTransform};
use super::vendor::Vendor;
use crate::config::Config;
use crate::event::Logger;
use crate::package::EntryMap;

/// RequireJS (`r.js`) package configuration.
pub struct RequireJsVendor {
    transform: Box<dyn ConfigTransform>,
}

impl RequireJsVendor {
    pub fn new() -> Self {
        Self::with_transform(Box::new(RequireJsTransform))
    }

    pub fn with_transform(transform: Box<dyn ConfigTransform>) -> Self {
        Self { transform }
    }
}

impl Default for RequireJsVendor {
    fn default() -> Self {
        Self::new()
    }
}

impl Vendor for RequireJsVendor {
    fn id(&self) -> &'static str {
        "rjs"
    }

    fn label(&self) -> &'static str {
        "RequireJS"
    }

    fn config_path(&self, config: &Config) -> Option<PathBuf> {
        config.rjs_config.clone()
    }

    fn synthesize(
        &self,
        entries: &EntryMap,
        existing: &str,
        options: MergeOptions,
        logger: &Logger,
    ) -> Result<String> {
        let mut document = self.transform.parse(existing)?;
        let (packages, report) =
            merge_packages(document.packages(), entries, options, self.id(), logger);
        log::debug!(
            "rjs merge: {} updated, {} added, {} pruned",
            report.updated.len(),
            report.added.len(),
            report.pruned.len()
        );
        document.set_packages(packages);
        self.transform.serialize(&document)
    }
}
