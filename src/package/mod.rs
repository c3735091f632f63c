//! Installed package model and entry descriptor synthesis.
//!
//! This module reads the flattened tree of installed components, guesses
//! entry files when manifests are ambiguous and builds the per-package
//! descriptors handed to loader vendors.

mod entry;
mod guess;
mod node;
mod tree;

pub use entry::{EntryDescriptor, EntryMap, synthesize_entries, synthesize_entry};
pub use guess::{SEARCH_DIRS, guess_main, guess_main_file};
pub use node::{Manifest, ManifestMain, PackageNode};
pub use tree::{ComponentsTree, PackageTree};

#[cfg(test)]
pub use tree::MockPackageTree;
