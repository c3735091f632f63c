use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// The `main` field of a component manifest: one path or an ordered list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ManifestMain {
    Single(String),
    Many(Vec<String>),
}

impl ManifestMain {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            ManifestMain::Single(path) => vec![path.clone()],
            ManifestMain::Many(paths) => paths.clone(),
        }
    }
}

/// The subset of a component manifest (`bower.json` / `.bower.json`) we read.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub main: Option<ManifestMain>,
    #[serde(default)]
    pub dependencies: Map<String, Value>,
    #[serde(default)]
    pub dev_dependencies: Map<String, Value>,
}

impl Manifest {
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}

/// One package of the flattened installed tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageNode {
    /// Key of the package in the flattened tree (its directory name).
    pub name: String,
    /// `name` declared by the package's own manifest, if any.
    pub manifest_name: Option<String>,
    pub canonical_dir: PathBuf,
    pub main: Option<ManifestMain>,
    pub missing: bool,
}

impl PackageNode {
    pub fn installed(name: &str, canonical_dir: impl Into<PathBuf>, main: Option<ManifestMain>) -> Self {
        Self {
            name: name.to_string(),
            manifest_name: None,
            canonical_dir: canonical_dir.into(),
            main,
            missing: false,
        }
    }

    pub fn missing(name: &str, canonical_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            manifest_name: None,
            canonical_dir: canonical_dir.into(),
            main: None,
            missing: true,
        }
    }

    /// The name used for guessing entry files.
    pub fn guess_name(&self) -> &str {
        self.manifest_name.as_deref().unwrap_or(&self.name)
    }

    /// Declared mains coerced to a list.
    pub fn declared_mains(&self) -> Vec<String> {
        self.main.as_ref().map(ManifestMain::to_vec).unwrap_or_default()
    }
}
