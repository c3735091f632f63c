use anyhow::Result;
use std::path::Path;

use super::node::PackageNode;
use crate::pattern::glob_files;
use crate::runtime::{Runtime, normalize_path, to_slash};

/// Top-level scripts that can be an entry file.
const CANDIDATE_PATTERNS: [&str; 5] = ["*.js", "!*.min.js", "!*-min.js", "!grunt.js", "!Gruntfile.js"];

/// Directories searched for an entry file, first hit wins.
pub const SEARCH_DIRS: [&str; 2] = ["dist", "."];

/// Guess the primary script of package `name` inside `canonical_dir/subdir`.
///
/// Looks for `<name>.js`, then `<name without trailing "js">.js` (so
/// `requirejs` finds `require.js`). The result is relative to the package
/// root, e.g. `dist/backbone.js`, or just `backbone.js` for `subdir = "."`.
#[tracing::instrument(skip(runtime))]
pub fn guess_main_file<R: Runtime>(
    runtime: &R,
    name: &str,
    canonical_dir: &Path,
    subdir: &str,
) -> Result<Option<String>> {
    let cwd = canonical_dir.join(subdir);
    if !(runtime.exists(&cwd) && runtime.is_dir(&cwd)) {
        return Ok(None);
    }

    let candidates = glob_files(runtime, &cwd, &CANDIDATE_PATTERNS)?;

    let guesses = [
        format!("{}.js", name),
        format!("{}.js", name.strip_suffix("js").unwrap_or(name)),
    ];

    Ok(guesses
        .iter()
        .find(|guess| candidates.contains(guess))
        .map(|guess| to_slash(&normalize_path(&Path::new(subdir).join(guess)))))
}

/// Try every search directory in order and return the first guess.
pub fn guess_main<R: Runtime>(runtime: &R, node: &PackageNode) -> Result<Option<String>> {
    for subdir in SEARCH_DIRS {
        if let Some(found) = guess_main_file(runtime, node.guess_name(), &node.canonical_dir, subdir)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn touch(dir: &Path, files: &[&str]) {
        std::fs::create_dir_all(dir).unwrap();
        for file in files {
            std::fs::write(dir.join(file), "").unwrap();
        }
    }

    #[test]
    fn test_guess_by_package_name() {
        let pkg = tempdir().unwrap();
        touch(pkg.path(), &["backbone.js", "backbone.min.js"]);

        let guess = guess_main_file(&RealRuntime, "backbone", pkg.path(), ".").unwrap();
        assert_eq!(guess.as_deref(), Some("backbone.js"));
    }

    #[test]
    fn test_guess_strips_trailing_js() {
        let pkg = tempdir().unwrap();
        touch(pkg.path(), &["require.js", "r.js"]);

        let guess = guess_main_file(&RealRuntime, "requirejs", pkg.path(), ".").unwrap();
        assert_eq!(guess.as_deref(), Some("require.js"));
    }

    #[test]
    fn test_guess_prefers_full_name() {
        let pkg = tempdir().unwrap();
        touch(pkg.path(), &["require.js", "requirejs.js"]);

        let guess = guess_main_file(&RealRuntime, "requirejs", pkg.path(), ".").unwrap();
        assert_eq!(guess.as_deref(), Some("requirejs.js"));
    }

    #[test]
    fn test_guess_ignores_minified_and_build_files() {
        let pkg = tempdir().unwrap();
        touch(pkg.path(), &["grunt.js", "Gruntfile.js", "lib-min.js"]);

        assert_eq!(guess_main_file(&RealRuntime, "grunt", pkg.path(), ".").unwrap(), None);
        assert_eq!(guess_main_file(&RealRuntime, "Gruntfile", pkg.path(), ".").unwrap(), None);
        assert_eq!(guess_main_file(&RealRuntime, "lib-min", pkg.path(), ".").unwrap(), None);
    }

    #[test]
    fn test_guess_in_dist_is_prefixed() {
        let pkg = tempdir().unwrap();
        touch(&pkg.path().join("dist"), &["moment.js"]);

        let guess = guess_main_file(&RealRuntime, "moment", pkg.path(), "dist").unwrap();
        assert_eq!(guess.as_deref(), Some("dist/moment.js"));
    }

    #[test]
    fn test_guess_missing_subdir_fails_fast() {
        // Only the directory check happens, no glob
        let mut runtime = MockRuntime::new();
        let dir = PathBuf::from("/c/lodash");

        runtime
            .expect_exists()
            .with(eq(dir.join("dist")))
            .returning(|_| false);

        let guess = guess_main_file(&runtime, "lodash", &dir, "dist").unwrap();
        assert_eq!(guess, None);
    }

    #[test]
    fn test_guess_main_tries_dist_then_root() {
        let pkg = tempdir().unwrap();
        touch(pkg.path(), &["when.js"]);
        touch(&pkg.path().join("dist"), &["other.js"]);

        let node = PackageNode::installed("when", pkg.path(), None);
        assert_eq!(guess_main(&RealRuntime, &node).unwrap().as_deref(), Some("when.js"));

        touch(&pkg.path().join("dist"), &["when.js"]);
        assert_eq!(guess_main(&RealRuntime, &node).unwrap().as_deref(), Some("dist/when.js"));
    }

    #[test]
    fn test_guess_main_none() {
        let pkg = tempdir().unwrap();
        touch(pkg.path(), &["index.css"]);

        let node = PackageNode::installed("styles", pkg.path(), None);
        assert_eq!(guess_main(&RealRuntime, &node).unwrap(), None);
    }
}
