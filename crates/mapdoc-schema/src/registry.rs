//! # Schema Registry
//!
//! Revision-keyed store of parsed schemas and the [`SchemaResolver`]
//! capability the structural phase consumes. Schemas are registered once
//! at startup; resolution is read-only and shareable across threads.

use std::collections::HashMap;

use mapdoc_core::{MapVersionInfo, SchemaRevision};
use serde_json::Value;
use thiserror::Error;

use crate::schema::SchemaNode;

/// Error during schema registration or resolution.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// No schema registered for the document's declared revision.
    #[error("no schema registered for revision {0}")]
    UnknownRevision(SchemaRevision),

    /// A schema file failed to deserialize into the schema model.
    #[error("schema for revision {revision} is not valid: {reason}")]
    InvalidSchema {
        /// Revision whose schema was rejected.
        revision: SchemaRevision,
        /// Deserialization failure detail.
        reason: String,
    },
}

/// Capability resolving the schema a document must be validated against.
pub trait SchemaResolver: Send + Sync {
    /// Resolve the schema for the given version.
    fn resolve(&self, version: &MapVersionInfo) -> Result<&SchemaNode, SchemaError>;
}

/// In-memory [`SchemaResolver`] keyed by schema revision.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<SchemaRevision, SchemaNode>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already-parsed schema for a revision, replacing any
    /// previous registration.
    pub fn register(&mut self, revision: SchemaRevision, schema: SchemaNode) {
        self.schemas.insert(revision, schema);
    }

    /// Register a schema from its JSON representation.
    pub fn register_value(
        &mut self,
        revision: SchemaRevision,
        value: Value,
    ) -> Result<(), SchemaError> {
        let schema = SchemaNode::from_value(value).map_err(|e| SchemaError::InvalidSchema {
            revision,
            reason: e.to_string(),
        })?;
        self.register(revision, schema);
        Ok(())
    }

    /// Revisions with a registered schema, oldest first.
    pub fn revisions(&self) -> Vec<SchemaRevision> {
        let mut revisions: Vec<SchemaRevision> = self.schemas.keys().copied().collect();
        revisions.sort();
        revisions
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// True when no schema is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl SchemaResolver for SchemaRegistry {
    fn resolve(&self, version: &MapVersionInfo) -> Result<&SchemaNode, SchemaError> {
        self.schemas
            .get(&version.revision)
            .ok_or(SchemaError::UnknownRevision(version.revision))
    }
}
