//! Reconciling synthesized entry descriptors with a loader's `packages` list.

use serde_json::{Map, Value, json};

use crate::event::{Level, Logger};
use crate::package::{EntryDescriptor, EntryMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Drop loader packages that are no longer installed.
    pub prune: bool,
}

/// What a merge changed, by package name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub updated: Vec<String>,
    pub added: Vec<String>,
    pub pruned: Vec<String>,
    pub missing_main: Vec<String>,
}

/// One item of the `packages` list. Items without a usable name are kept
/// as they are and never pruned.
enum Slot {
    Named(String, Map<String, Value>),
    Opaque(Value),
}

fn has_main(descriptor: &Map<String, Value>) -> bool {
    match descriptor.get("main") {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn to_slot(item: Value) -> Slot {
    match item {
        // "packages": ["foo"] is shorthand for {"name": "foo"}
        Value::String(name) => {
            let mut descriptor = Map::new();
            descriptor.insert("name".to_string(), Value::String(name.clone()));
            Slot::Named(name, descriptor)
        }
        Value::Object(descriptor) => match descriptor.get("name").and_then(Value::as_str) {
            Some(name) => Slot::Named(name.to_string(), descriptor),
            None => Slot::Opaque(Value::Object(descriptor)),
        },
        other => Slot::Opaque(other),
    }
}

fn to_descriptor(entry: &EntryDescriptor) -> Map<String, Value> {
    let mut descriptor = Map::new();
    descriptor.insert("name".to_string(), json!(entry.name));
    descriptor.insert("location".to_string(), json!(entry.location));
    if let Some(main) = &entry.main {
        descriptor.insert("main".to_string(), json!(main));
    }
    descriptor
}

/// Merge `entries` into the existing `packages` list and return the new list.
///
/// Existing descriptors keep their position and any `main` they already
/// declare; only `location` is always refreshed. New packages are appended
/// in entry order. With `prune`, descriptors without an installed package
/// are removed. Every descriptor left without a `main` is reported.
pub fn merge_packages(
    existing: Vec<Value>,
    entries: &EntryMap,
    options: MergeOptions,
    vendor: &str,
    logger: &Logger,
) -> (Vec<Value>, MergeReport) {
    let mut report = MergeReport::default();
    let mut slots: Vec<Slot> = Vec::with_capacity(existing.len() + entries.len());

    for item in existing {
        match to_slot(item) {
            Slot::Named(name, descriptor) => {
                // A later duplicate replaces the earlier one in its position
                let earlier = slots.iter_mut().find_map(|slot| match slot {
                    Slot::Named(n, d) if *n == name => Some(d),
                    _ => None,
                });
                match earlier {
                    Some(first) => *first = descriptor,
                    None => slots.push(Slot::Named(name, descriptor)),
                }
            }
            opaque => slots.push(opaque),
        }
    }

    for entry in entries.iter() {
        let existing = slots.iter_mut().find_map(|slot| match slot {
            Slot::Named(name, descriptor) if *name == entry.name => Some(descriptor),
            _ => None,
        });

        match existing {
            Some(descriptor) => {
                descriptor.insert("location".to_string(), json!(entry.location));
                if !has_main(descriptor)
                    && let Some(main) = &entry.main
                {
                    descriptor.insert("main".to_string(), json!(main));
                }
                report.updated.push(entry.name.clone());
            }
            None => {
                slots.push(Slot::Named(entry.name.clone(), to_descriptor(entry)));
                report.added.push(entry.name.clone());
            }
        }
    }

    if options.prune {
        slots.retain(|slot| match slot {
            Slot::Named(name, _) if !entries.contains(name) => {
                logger.log(
                    Level::Info,
                    "pruned",
                    format!(
                        "Pruned {} package: {} that is not found in installed components.",
                        vendor, name
                    ),
                    Some(json!({ "name": name })),
                );
                report.pruned.push(name.clone());
                false
            }
            _ => true,
        });
    }

    for slot in &slots {
        if let Slot::Named(name, descriptor) = slot
            && !has_main(descriptor)
        {
            logger.log(
                Level::Warn,
                "missing",
                format!("Missing main file manifest in bower package: {}", name),
                Some(json!({ "name": name })),
            );
            report.missing_main.push(name.clone());
        }
    }

    let packages = slots
        .into_iter()
        .map(|slot| match slot {
            Slot::Named(_, descriptor) => Value::Object(descriptor),
            Slot::Opaque(value) => value,
        })
        .collect();

    (packages, report)
}
