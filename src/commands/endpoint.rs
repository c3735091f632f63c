use std::fmt;
use std::str::FromStr;

use crate::error::SyncError;

/// An install endpoint in `[name=]source[#target]` form.
///
/// Examples: `jquery`, `jquery#~2.1`, `lodash=lodash-compat#3`,
/// `https://example.com/pkg.zip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: Option<String>,
    pub source: String,
    pub target: String,
}

impl Endpoint {
    pub const ANY_TARGET: &'static str = "*";
}

impl FromStr for Endpoint {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SyncError::InvalidEndpoint(s.to_string());
        let s_trimmed = s.trim();
        if s_trimmed.is_empty() {
            return Err(invalid());
        }

        // A name never contains '/', ':' or '#', which keeps URLs with '=' intact
        let (name, rest) = match s_trimmed.split_once('=') {
            Some((name, rest)) if !name.contains(['/', ':', '#']) => {
                if name.is_empty() {
                    return Err(invalid());
                }
                (Some(name.to_string()), rest)
            }
            _ => (None, s_trimmed),
        };

        let (source, target) = match rest.split_once('#') {
            Some((source, target)) if !target.is_empty() => (source, target),
            Some((source, _)) => (source, Self::ANY_TARGET),
            None => (rest, Self::ANY_TARGET),
        };

        if source.is_empty() {
            return Err(invalid());
        }

        Ok(Endpoint {
            name,
            source: source.to_string(),
            target: target.to_string(),
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{}=", name)?;
        }
        write!(f, "{}", self.source)?;
        if self.target != Self::ANY_TARGET {
            write!(f, "#{}", self.target)?;
        }
        Ok(())
    }
}
