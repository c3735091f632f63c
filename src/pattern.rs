//! Ordered include/exclude glob pattern evaluation.
//!
//! Patterns are applied strictly left to right onto one running [`PathSet`].
//! An inclusion is matched independently of earlier exclusions, so a path
//! removed by `!a.js` comes back if a later `a.js` matches it again.

use anyhow::Result;
use std::path::Path;

use crate::runtime::Runtime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Include(String),
    Exclude(String),
}

impl Pattern {
    /// Parse a pattern string; a leading `!` marks an exclusion.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('!') {
            Some(rest) => Pattern::Exclude(rest.to_string()),
            None => Pattern::Include(raw.to_string()),
        }
    }

    pub fn glob(&self) -> &str {
        match self {
            Pattern::Include(g) | Pattern::Exclude(g) => g,
        }
    }
}

/// An ordered, duplicate-free sequence of paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSet {
    paths: Vec<String>,
}

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every path not already present, keeping first-seen order.
    pub fn union<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for path in paths {
            let path = path.into();
            if !self.contains(&path) {
                self.paths.push(path);
            }
        }
    }

    /// Remove every member that appears in `paths`.
    pub fn difference<S: AsRef<str>>(&mut self, paths: &[S]) {
        self.paths
            .retain(|existing| !paths.iter().any(|p| p.as_ref() == existing));
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.paths
    }
}

/// Fold `patterns` into a path set, asking `matcher` for the current matches
/// of each (non-negated) glob.
pub fn resolve_patterns<F>(patterns: &[Pattern], mut matcher: F) -> Result<PathSet>
where
    F: FnMut(&str) -> Result<Vec<String>>,
{
    patterns.iter().try_fold(PathSet::new(), |mut set, pattern| {
        let matches = matcher(pattern.glob())?;
        match pattern {
            Pattern::Include(_) => set.union(matches),
            Pattern::Exclude(_) => set.difference(&matches),
        }
        Ok(set)
    })
}

/// Resolve pattern strings against the files directly inside `cwd`.
#[tracing::instrument(skip(runtime, patterns))]
pub fn glob_files<R: Runtime>(runtime: &R, cwd: &Path, patterns: &[&str]) -> Result<PathSet> {
    let patterns: Vec<Pattern> = patterns.iter().map(|p| Pattern::parse(p)).collect();
    resolve_patterns(&patterns, |glob| runtime.glob(cwd, glob))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    /// Match function over a fixed file list understanding `*` prefixes only.
    fn fixed_matcher(files: &'static [&'static str]) -> impl FnMut(&str) -> Result<Vec<String>> {
        move |glob: &str| {
            Ok(files
                .iter()
                .filter(|f| match glob.strip_prefix('*') {
                    Some(suffix) => f.ends_with(suffix),
                    None => **f == glob,
                })
                .map(|f| f.to_string())
                .collect())
        }
    }

    fn parse_all(raw: &[&str]) -> Vec<Pattern> {
        raw.iter().map(|p| Pattern::parse(p)).collect()
    }

    #[test]
    fn test_pattern_parse() {
        assert_eq!(Pattern::parse("*.js"), Pattern::Include("*.js".into()));
        assert_eq!(Pattern::parse("!*.min.js"), Pattern::Exclude("*.min.js".into()));
        assert_eq!(Pattern::parse("!*.min.js").glob(), "*.min.js");
    }

    #[test]
    fn test_exclusion_removes_matches() {
        let patterns = parse_all(&["*.js", "!*.min.js"]);
        let set = resolve_patterns(&patterns, fixed_matcher(&["a.js", "a.min.js", "b.js"])).unwrap();
        assert_eq!(set.into_vec(), vec!["a.js", "b.js"]);
    }

    #[test]
    fn test_later_inclusion_re_adds_excluded_path() {
        let patterns = parse_all(&["*.js", "!a.js", "a.js"]);
        let set = resolve_patterns(&patterns, fixed_matcher(&["a.js", "b.js"])).unwrap();
        assert!(set.contains("a.js"));
        // Re-added paths go to the end
        assert_eq!(set.into_vec(), vec!["b.js", "a.js"]);
    }

    #[test]
    fn test_union_keeps_first_seen_order_without_duplicates() {
        let patterns = parse_all(&["b.js", "*.js"]);
        let set = resolve_patterns(&patterns, fixed_matcher(&["a.js", "b.js", "c.js"])).unwrap();
        assert_eq!(set.into_vec(), vec!["b.js", "a.js", "c.js"]);
    }

    #[test]
    fn test_exclusion_before_inclusion_has_no_effect() {
        let patterns = parse_all(&["!a.js", "*.js"]);
        let set = resolve_patterns(&patterns, fixed_matcher(&["a.js", "b.js"])).unwrap();
        assert_eq!(set.into_vec(), vec!["a.js", "b.js"]);
    }

    #[test]
    fn test_empty_pattern_list_yields_empty_set() {
        let set = resolve_patterns(&[], |_| panic!("matcher must not be called")).unwrap();
        assert!(set.into_vec().is_empty());
    }

    #[test]
    fn test_matcher_error_propagates() {
        let patterns = parse_all(&["*.js"]);
        let result = resolve_patterns(&patterns, |_| anyhow::bail!("unreadable"));
        assert!(result.is_err());
    }

    #[test]
    fn test_glob_files_uses_runtime() {
        let mut runtime = MockRuntime::new();
        let cwd = PathBuf::from("/pkg");

        runtime
            .expect_glob()
            .with(eq(cwd.clone()), eq("*.js"))
            .returning(|_, _| Ok(vec!["app.js".into(), "app.min.js".into()]));
        runtime
            .expect_glob()
            .with(eq(cwd.clone()), eq("*.min.js"))
            .returning(|_, _| Ok(vec!["app.min.js".into()]));

        let set = glob_files(&runtime, &cwd, &["*.js", "!*.min.js"]).unwrap();
        assert_eq!(set.into_vec(), vec!["app.js"]);
    }
}
