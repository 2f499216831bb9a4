//! Scope paths for addressing nested state machines
//!
//! Provides [`ScopePath`], the parsed form of a merge-scope string. A scope is
//! either a bare machine name (`Emotes`) or a slash-separated path
//! (`Action/Emotes/Standing`).

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator between path segments
pub const SCOPE_SEPARATOR: char = '/';

/// Parsed merge scope
///
/// # Examples
/// - `Emotes` → bare name, matched anywhere below the root
/// - `Action/Emotes` → matched segment by segment from the root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopePath(Vec<String>);

impl ScopePath {
    /// Create path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Create path from a single name
    #[inline]
    #[must_use]
    pub fn single(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path has no segments
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the path was written as a bare name
    #[inline]
    #[must_use]
    pub fn is_bare_name(&self) -> bool {
        self.0.len() == 1
    }

    /// First segment (if any)
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Segments after the first
    #[inline]
    #[must_use]
    pub fn rest(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }
}

impl Display for ScopePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.0 {
            if !first {
                write!(f, "{SCOPE_SEPARATOR}")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for ScopePath {
    type Err = PathError;

    /// Parse a scope string
    ///
    /// Surrounding whitespace is trimmed, and leading or trailing separators
    /// are ignored so `/Action/Emotes/` equals `Action/Emotes`. Names may
    /// contain spaces and punctuation, since machine names are free text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches(SCOPE_SEPARATOR);
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }

        let segments = trimmed
            .split(SCOPE_SEPARATOR)
            .map(|seg| {
                let seg = seg.trim();
                if seg.is_empty() {
                    Err(PathError::EmptySegment(s.to_string()))
                } else {
                    Ok(seg.to_string())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(segments))
    }
}

/// Errors for scope path operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Nothing but whitespace or separators
    #[error("empty scope path")]
    Empty,

    /// Two separators with nothing between them
    #[error("empty segment in scope path '{0}'")]
    EmptySegment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name() {
        let path: ScopePath = "Emotes".parse().unwrap();
        assert!(path.is_bare_name());
        assert_eq!(path.first(), Some("Emotes"));
        assert!(path.rest().is_empty());
    }

    #[test]
    fn nested_path() {
        let path: ScopePath = "Action/Emotes/Standing".parse().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), Some("Action"));
        assert_eq!(path.rest(), &["Emotes".to_string(), "Standing".to_string()]);
        assert_eq!(path.to_string(), "Action/Emotes/Standing");
    }

    #[test]
    fn outer_separators_and_whitespace_ignored() {
        let path: ScopePath = "  /Action/Sub State/ ".parse().unwrap();
        assert_eq!(path.segments(), &["Action".to_string(), "Sub State".to_string()]);
    }

    #[test]
    fn empty_inputs_rejected() {
        assert_eq!("".parse::<ScopePath>(), Err(PathError::Empty));
        assert_eq!(" / ".parse::<ScopePath>(), Err(PathError::Empty));
        assert!(matches!(
            "Action//Emotes".parse::<ScopePath>(),
            Err(PathError::EmptySegment(_))
        ));
    }
}
