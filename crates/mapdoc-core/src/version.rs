//! # Schema Revisions & Version Info
//!
//! The map format is versioned by schema revision. A document declares which
//! revision it targets; the structural phase validates against that
//! revision's schema and version-gated constraints compare revisions with
//! `<` / `>=` to scope deprecation notices.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// A supported map schema revision.
///
/// Variants are declared oldest-first so the derived `Ord` matches revision
/// age: `SchemaRevision::V17 < SchemaRevision::V17_3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaRevision {
    /// Final pre-v17 revision, kept for migration notices.
    V16_4,
    /// v17.0.
    V17,
    /// v17.1.
    V17_1,
    /// v17.2.
    V17_2,
    /// v17.3.
    V17_3,
}

impl SchemaRevision {
    /// All revisions the validator accepts, oldest first.
    pub const SUPPORTED: &'static [SchemaRevision] = &[
        Self::V16_4,
        Self::V17,
        Self::V17_1,
        Self::V17_2,
        Self::V17_3,
    ];

    /// The revision new documents should target.
    pub const RECOMMENDED: SchemaRevision = Self::V17_3;

    /// Canonical name, as used in schema file names and `$schema` URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V16_4 => "v16.4",
            Self::V17 => "v17",
            Self::V17_1 => "v17.1",
            Self::V17_2 => "v17.2",
            Self::V17_3 => "v17.3",
        }
    }
}

impl fmt::Display for SchemaRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a revision name.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("unsupported schema revision: {0:?}")]
pub struct UnknownRevision(pub String);

impl FromStr for SchemaRevision {
    type Err = UnknownRevision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SUPPORTED
            .iter()
            .copied()
            .find(|rev| rev.as_str() == s)
            .ok_or_else(|| UnknownRevision(s.to_string()))
    }
}

/// Version context for one validation call.
///
/// Immutable; created once the document's declared revision is known and
/// passed unchanged through both validation phases. Fragment documents
/// (partial maps meant to be included into others) are validated
/// permissively: required-property failures are suppressed and several
/// error classes are downgraded to warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapVersionInfo {
    /// Declared schema revision of the document.
    pub revision: SchemaRevision,
    /// True when the document is a fragment rather than a full map.
    pub is_fragment: bool,
}

impl MapVersionInfo {
    /// Version info for a full map document.
    pub fn full(revision: SchemaRevision) -> Self {
        Self {
            revision,
            is_fragment: false,
        }
    }

    /// Version info for a fragment.
    pub fn fragment(revision: SchemaRevision) -> Self {
        Self {
            revision,
            is_fragment: true,
        }
    }
}
