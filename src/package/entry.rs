use anyhow::Result;
use glob::{MatchOptions, Pattern};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::guess::guess_main;
use super::node::PackageNode;
use crate::runtime::{Runtime, normalize_path, to_slash};

/// Synthesized loader-facing description of one installed package.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EntryDescriptor {
    pub name: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
}

/// Entry descriptors keyed by name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryMap {
    entries: Vec<EntryDescriptor>,
}

impl EntryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any entry with the same name in place.
    pub fn insert(&mut self, entry: EntryDescriptor) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&EntryDescriptor> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntryDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<EntryDescriptor> for EntryMap {
    fn from_iter<I: IntoIterator<Item = EntryDescriptor>>(iter: I) -> Self {
        let mut map = EntryMap::new();
        for entry in iter {
            map.insert(entry);
        }
        map
    }
}

/// `*` stays within one path segment and skips dotfiles, so `dist/a.js`
/// and `./a.js` are not plain script candidates.
const SCRIPT_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

fn is_script(file: &str) -> bool {
    Pattern::new("*.js")
        .map(|p| p.matches_with(file, SCRIPT_MATCH))
        .unwrap_or(false)
}

/// Build the descriptor of one installed package.
pub fn synthesize_entry<R: Runtime>(
    runtime: &R,
    node: &PackageNode,
    base_path: &Path,
) -> Result<EntryDescriptor> {
    let location = to_slash(&normalize_path(&base_path.join(&node.name)));

    let mut mains: Vec<String> = node
        .declared_mains()
        .into_iter()
        .filter(|file| is_script(file))
        .collect();

    if mains.len() != 1 {
        // A guess replaces the manifest candidates outright
        if let Some(guessed) = guess_main(runtime, node)? {
            debug!("Guessed main {} for {}", guessed, node.name);
            mains = vec![guessed];
        }
    }

    let main = if mains.len() == 1 { mains.pop() } else { None };

    Ok(EntryDescriptor {
        name: node.name.clone(),
        location,
        main,
    })
}

/// Build one descriptor per installed package. Missing packages are skipped.
#[tracing::instrument(skip(runtime, nodes))]
pub fn synthesize_entries<R: Runtime>(
    runtime: &R,
    nodes: &[PackageNode],
    base_path: &Path,
) -> Result<EntryMap> {
    let mut entries = EntryMap::new();
    for node in nodes.iter().filter(|n| !n.missing) {
        entries.insert(synthesize_entry(runtime, node, base_path)?);
    }
    Ok(entries)
}
