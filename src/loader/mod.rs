//! AMD loader configuration support.
//!
//! - `transform` - locating and rewriting the configuration object in a file
//! - `merge` - reconciling entry descriptors with a `packages` list
//! - `vendor` - the [`Vendor`] trait and the id-keyed [`VendorRegistry`]
//! - `rjs` - RequireJS

mod merge;
mod rjs;
mod transform;
mod vendor;

pub use merge::{MergeOptions, MergeReport, merge_packages};
pub use rjs::RequireJsVendor;
pub use transform::{ConfigTransform, LoaderDocument, RequireJsTransform};
pub use vendor::{Vendor, VendorRegistry};

#[cfg(test)]
pub use vendor::MockVendor;
