//! Reading and writing the configuration object inside loader config files.

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};

/// A loader configuration split around its configuration object.
///
/// Text around the object is carried through untouched; only `body` is
/// re-rendered on serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderDocument {
    prefix: String,
    pub body: Map<String, Value>,
    suffix: String,
    indent: String,
}

impl LoaderDocument {
    #[cfg(test)]
    pub fn from_body(body: Map<String, Value>) -> Self {
        Self {
            prefix: String::new(),
            body,
            suffix: String::new(),
            indent: String::new(),
        }
    }

    /// The `packages` list, or an empty list when absent or not a list.
    pub fn packages(&self) -> Vec<Value> {
        match self.body.get("packages") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    }

    pub fn set_packages(&mut self, packages: Vec<Value>) {
        self.body.insert("packages".to_string(), Value::Array(packages));
    }
}

/// Parses and serializes one loader's configuration file format.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigTransform: Send + Sync {
    fn parse(&self, text: &str) -> Result<LoaderDocument>;
    fn serialize(&self, document: &LoaderDocument) -> Result<String>;
}

/// RequireJS configuration files.
///
/// Accepts `require.config({...})`, `requirejs.config({...})`,
/// `var require = {...}` (and `requirejs = {...}`) or a bare `{...}`
/// object. The object may be written as a JavaScript literal (unquoted
/// keys, single quotes, trailing commas, comments); it is written back as
/// JSON.
pub struct RequireJsTransform;

const ANCHORS: [&str; 6] = [
    "requirejs.config(",
    "require.config(",
    "requirejs =",
    "require =",
    "requirejs=",
    "require=",
];

impl RequireJsTransform {
    /// Byte offset of the opening brace of the configuration object.
    fn find_object_start(text: &str) -> Result<usize> {
        let mut anchor_ends: Vec<(usize, usize)> = ANCHORS
            .iter()
            .flat_map(|&anchor| {
                text.match_indices(anchor)
                    .map(move |(pos, _)| (pos, pos + anchor.len()))
            })
            .collect();
        anchor_ends.sort_unstable();

        // First anchor followed by an object literal, else a bare object
        anchor_ends
            .into_iter()
            .map(|(_, end)| end)
            .chain(std::iter::once(0))
            .map(|from| Self::skip_whitespace(text, from))
            .find(|&start| text[start..].starts_with('{'))
            .ok_or_else(|| anyhow!("no configuration object found"))
    }

    fn skip_whitespace(text: &str, from: usize) -> usize {
        let rest = &text[from..];
        from + (rest.len() - rest.trim_start().len())
    }

    /// Strict JSON first, then JavaScript object literal syntax.
    fn parse_object(object: &str) -> Result<Map<String, Value>> {
        match serde_json::from_str(object) {
            Ok(body) => Ok(body),
            Err(_) => json5::from_str(object)
                .context("configuration object is not a valid object literal"),
        }
    }

    /// Byte offset just past the brace closing the object opened at `start`.
    fn find_object_end(text: &str, start: usize) -> Result<usize> {
        let bytes = text.as_bytes();
        let mut depth = 0usize;
        let mut i = start;

        while i < bytes.len() {
            match bytes[i] {
                quote @ (b'"' | b'\'') => {
                    i += 1;
                    while i < bytes.len() && bytes[i] != quote {
                        if bytes[i] == b'\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                }
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    i += 2;
                    while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                        i += 1;
                    }
                    i += 1;
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(i + 1);
                    }
                }
                _ => {}
            }
            i += 1;
        }

        Err(anyhow!("unterminated configuration object"))
    }

    /// Leading whitespace of the line the object starts on.
    fn line_indent(text: &str, start: usize) -> String {
        let line_start = text[..start].rfind('\n').map(|p| p + 1).unwrap_or(0);
        text[line_start..start]
            .chars()
            .take_while(|c| c.is_whitespace())
            .collect()
    }
}

impl ConfigTransform for RequireJsTransform {
    fn parse(&self, text: &str) -> Result<LoaderDocument> {
        let start = Self::find_object_start(text)?;
        let end = Self::find_object_end(text, start)?;

        let body = Self::parse_object(&text[start..end])?;

        Ok(LoaderDocument {
            prefix: text[..start].to_string(),
            body,
            suffix: text[end..].to_string(),
            indent: Self::line_indent(text, start),
        })
    }

    fn serialize(&self, document: &LoaderDocument) -> Result<String> {
        let rendered = serde_json::to_string_pretty(&document.body)?;
        let rendered = if document.indent.is_empty() {
            rendered
        } else {
            rendered.replace('\n', &format!("\n{}", document.indent))
        };
        Ok(format!("{}{}{}", document.prefix, rendered, document.suffix))
    }
}
