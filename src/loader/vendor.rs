//! Vendor registry for dispatching synchronization by loader id.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::merge::MergeOptions;
use super::rjs::RequireJsVendor;
use crate::config::Config;
use crate::error::SyncError;
use crate::event::Logger;
use crate::package::EntryMap;

/// One AMD loader whose configuration can be synchronized.
#[cfg_attr(test, mockall::automock)]
pub trait Vendor: Send + Sync {
    /// Identifier used on the command line, e.g. `rjs`.
    fn id(&self) -> &'static str;

    /// Human readable name for messages.
    fn label(&self) -> &'static str;

    /// Configuration file for this loader, when the project configures one.
    fn config_path(&self, config: &Config) -> Option<PathBuf>;

    /// Merge `entries` into the existing configuration text and return the new text.
    fn synthesize(
        &self,
        entries: &EntryMap,
        existing: &str,
        options: MergeOptions,
        logger: &Logger,
    ) -> Result<String>;
}

/// Lookup table from vendor id to implementation.
pub struct VendorRegistry {
    vendors: BTreeMap<&'static str, Arc<dyn Vendor>>,
}

impl VendorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            vendors: BTreeMap::new(),
        }
    }

    /// Registry with every built-in vendor.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RequireJsVendor::new()));
        registry
    }

    /// Register a vendor, replacing any vendor with the same id.
    pub fn register(&mut self, vendor: Arc<dyn Vendor>) {
        self.vendors.insert(vendor.id(), vendor);
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Vendor>> {
        self.vendors.get(id)
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.vendors.keys().copied().collect()
    }

    /// Resolve a vendor requested by the user.
    pub fn resolve(&self, id: Option<&str>) -> Result<Arc<dyn Vendor>, SyncError> {
        let id = id.filter(|s| !s.is_empty()).ok_or(SyncError::MissingVendor)?;
        self.get(id)
            .cloned()
            .ok_or_else(|| SyncError::UnsupportedVendor(id.to_string()))
    }

    /// Vendors whose configuration file is set in `config`, in id order.
    pub fn configured(&self, config: &Config) -> Vec<Arc<dyn Vendor>> {
        self.vendors
            .values()
            .filter(|v| v.config_path(config).is_some())
            .cloned()
            .collect()
    }
}

impl Default for VendorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
