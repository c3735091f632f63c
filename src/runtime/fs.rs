//! File system operations (read, write, existence checks, top-level glob).

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::{Path, PathBuf};

use super::RealRuntime;

/// Dotfiles are only matched by patterns that spell out the leading dot.
const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

impl RealRuntime {
    #[tracing::instrument(skip(self, contents))]
    pub(crate) fn write_impl(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).context("Failed to write to file")?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context("Failed to read file to string")
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn exists_impl(&self, path: &Path) -> bool {
        path.exists()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_dir_impl(&self, path: &Path) -> bool {
        path.is_dir()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_file_impl(&self, path: &Path) -> bool {
        path.is_file()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_dir_impl(&self, path: &Path) -> Result<Vec<PathBuf>> {
        fs::read_dir(path)?.map(|entry| Ok(entry?.path())).collect()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn glob_impl(&self, cwd: &Path, pattern: &str) -> Result<Vec<String>> {
        let matcher = Pattern::new(pattern)
            .with_context(|| format!("Invalid glob pattern: {}", pattern))?;

        let mut matches = Vec::new();
        for entry in fs::read_dir(cwd).with_context(|| format!("Failed to list {:?}", cwd))? {
            let entry = entry?;
            // Symlinked files count, dangling links do not
            if !entry.path().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if matcher.matches_with(&name, GLOB_OPTIONS) {
                matches.push(name);
            }
        }
        matches.sort();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_file_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.js");

        // Test write
        runtime.write(&file_path, b"hello").unwrap();
        assert!(runtime.exists(&file_path));
        assert!(runtime.is_file(&file_path));
        assert!(!runtime.is_dir(&file_path));

        // Test read_to_string
        let content = runtime.read_to_string(&file_path).unwrap();
        assert_eq!(content, "hello");

        // Directories are not regular files
        assert!(runtime.is_dir(dir.path()));
        assert!(!runtime.is_file(dir.path()));
    }

    #[test]
    fn test_real_runtime_glob_top_level_only() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();

        for name in ["b.js", "a.js", "a.min.js", "style.css", ".hidden.js"] {
            runtime.write(&dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir_all(dir.path().join("lib")).unwrap();
        runtime.write(&dir.path().join("lib/nested.js"), b"").unwrap();
        // A directory whose name looks like a script is not a file match
        std::fs::create_dir_all(dir.path().join("folder.js")).unwrap();

        let matches = runtime.glob(dir.path(), "*.js").unwrap();
        assert_eq!(matches, vec!["a.js", "a.min.js", "b.js"]);

        let matches = runtime.glob(dir.path(), "*.min.js").unwrap();
        assert_eq!(matches, vec!["a.min.js"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_real_runtime_glob_follows_symlinks() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let shared = dir.path().join("shared");
        let pkg = dir.path().join("backbone");
        std::fs::create_dir_all(&shared).unwrap();
        std::fs::create_dir_all(&pkg).unwrap();
        runtime.write(&shared.join("backbone.js"), b"").unwrap();

        std::os::unix::fs::symlink(shared.join("backbone.js"), pkg.join("backbone.js")).unwrap();
        std::os::unix::fs::symlink(shared.join("gone.js"), pkg.join("dangling.js")).unwrap();
        std::os::unix::fs::symlink(&shared, pkg.join("linked.js")).unwrap();

        let matches = runtime.glob(&pkg, "*.js").unwrap();
        assert_eq!(matches, vec!["backbone.js"]);
    }

    #[test]
    fn test_real_runtime_errors() {
        let runtime = RealRuntime;

        // Test read non-existent file
        let result = runtime.read_to_string(std::path::Path::new("/nonexistent/path/file.txt"));
        assert!(result.is_err());

        // Test glob in non-existent directory
        let result = runtime.glob(std::path::Path::new("/nonexistent/path"), "*.js");
        assert!(result.is_err());
    }
}
