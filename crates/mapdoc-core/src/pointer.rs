//! # JSON Pointer
//!
//! RFC 6901 pointers used to scope every report entry to the document node
//! it concerns. Pointers are built segment by segment while the validators
//! walk the tree and rendered to the canonical string form for reporting.
//!
//! ## Invariant
//!
//! Every pointer emitted into a [`ValidationReport`](crate::ValidationReport)
//! must resolve against the document tree that produced it. This is checked
//! in tests, not enforced at runtime.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// One step of a pointer: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object member name.
    Key(String),
    /// Array element position.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // RFC 6901 escaping: `~` -> `~0`, `/` -> `~1`.
            Self::Key(key) => write!(f, "{}", key.replace('~', "~0").replace('/', "~1")),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Error parsing a pointer from its RFC 6901 string form.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PointerParseError {
    /// A non-empty pointer must start with `/`.
    #[error("pointer must start with '/': {0:?}")]
    MissingLeadingSlash(String),

    /// `~` must be followed by `0` or `1`.
    #[error("invalid escape sequence in segment {0:?}")]
    InvalidEscape(String),
}

/// An RFC 6901 JSON Pointer.
///
/// The empty pointer addresses the document root. `Display` renders the
/// canonical string form (`""` for the root, `/a/0/b` otherwise).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer {
    segments: Vec<Segment>,
}

impl Pointer {
    /// The root pointer (empty segment list).
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a pointer from parsed segments.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// The segments of this pointer, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True for the root pointer.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extend with an object key.
    pub fn child_key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.into()));
        Self { segments }
    }

    /// Extend with an array index.
    pub fn child_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    /// Resolve this pointer against a document value.
    ///
    /// An `Index` segment also matches an object key spelled as the decimal
    /// index, mirroring RFC 6901 resolution over heterogeneous trees.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for segment in &self.segments {
            current = match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => map.get(key)?,
                (Segment::Index(index), Value::Array(items)) => items.get(*index)?,
                (Segment::Index(index), Value::Object(map)) => map.get(&index.to_string())?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl Serialize for Pointer {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for Pointer {
    type Err = PointerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = s.strip_prefix('/') else {
            return Err(PointerParseError::MissingLeadingSlash(s.to_string()));
        };
        let mut segments = Vec::new();
        for raw in rest.split('/') {
            segments.push(parse_segment(raw)?);
        }
        Ok(Self { segments })
    }
}

fn parse_segment(raw: &str) -> Result<Segment, PointerParseError> {
    let mut unescaped = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '~' {
            match chars.next() {
                Some('0') => unescaped.push('~'),
                Some('1') => unescaped.push('/'),
                _ => return Err(PointerParseError::InvalidEscape(raw.to_string())),
            }
        } else {
            unescaped.push(ch);
        }
    }
    // A bare decimal with no leading zero addresses an array index.
    if !unescaped.is_empty()
        && unescaped.chars().all(|c| c.is_ascii_digit())
        && (unescaped == "0" || !unescaped.starts_with('0'))
    {
        if let Ok(index) = unescaped.parse::<usize>() {
            return Ok(Segment::Index(index));
        }
    }
    Ok(Segment::Key(unescaped))
}
