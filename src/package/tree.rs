use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};

use super::node::{Manifest, PackageNode};
use crate::runtime::Runtime;

/// Installed component manifests, in order of preference.
const COMPONENT_MANIFESTS: [&str; 2] = [".bower.json", "bower.json"];
const PROJECT_MANIFEST: &str = "bower.json";

/// Source of the flattened installed-package tree.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageTree: Send + Sync {
    async fn read_tree(&self) -> Result<Vec<PackageNode>>;
}

/// Reads the tree from a project's components directory.
///
/// Every directory under the components directory is an installed package.
/// Dependencies declared by the project manifest or by any installed package
/// that have no directory are reported as missing.
pub struct ComponentsTree<'a, R: Runtime> {
    runtime: &'a R,
    project_dir: PathBuf,
    components_dir: PathBuf,
}

impl<'a, R: Runtime> ComponentsTree<'a, R> {
    pub fn new(runtime: &'a R, project_dir: PathBuf, components_dir: PathBuf) -> Self {
        Self {
            runtime,
            project_dir,
            components_dir,
        }
    }

    fn load_manifest(&self, dir: &Path, candidates: &[&str]) -> Result<Option<Manifest>> {
        for file in candidates {
            let path = dir.join(file);
            if self.runtime.is_file(&path) {
                let content = self.runtime.read_to_string(&path)?;
                let manifest = Manifest::parse(&content)
                    .with_context(|| format!("Failed to parse manifest {:?}", path))?;
                return Ok(Some(manifest));
            }
        }
        Ok(None)
    }

    fn installed_dirs(&self) -> Result<Vec<PathBuf>> {
        if !self.runtime.is_dir(&self.components_dir) {
            debug!("No components directory at {:?}", self.components_dir);
            return Ok(Vec::new());
        }
        let mut dirs: Vec<PathBuf> = self
            .runtime
            .read_dir(&self.components_dir)
            .with_context(|| format!("Failed to list {:?}", self.components_dir))?
            .into_iter()
            .filter(|p| self.runtime.is_dir(p))
            .collect();
        dirs.sort();
        Ok(dirs)
    }
}

#[async_trait]
impl<R: Runtime> PackageTree for ComponentsTree<'_, R> {
    #[tracing::instrument(skip(self))]
    async fn read_tree(&self) -> Result<Vec<PackageNode>> {
        let mut nodes = Vec::new();
        let mut declared: Vec<String> = Vec::new();

        if let Some(project) = self.load_manifest(&self.project_dir, &[PROJECT_MANIFEST])? {
            declared.extend(project.dependencies.keys().cloned());
            declared.extend(project.dev_dependencies.keys().cloned());
        }

        for dir in self.installed_dirs()? {
            let Some(name) = dir.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            let manifest = self
                .load_manifest(&dir, &COMPONENT_MANIFESTS)?
                .unwrap_or_default();
            declared.extend(manifest.dependencies.keys().cloned());

            nodes.push(PackageNode {
                name,
                manifest_name: manifest.name,
                canonical_dir: dir,
                main: manifest.main,
                missing: false,
            });
        }

        for name in declared {
            if !nodes.iter().any(|n| n.name == name) {
                debug!("Declared dependency {} is not installed", name);
                let dir = self.components_dir.join(&name);
                nodes.push(PackageNode::missing(&name, dir));
            }
        }

        Ok(nodes)
    }
}
