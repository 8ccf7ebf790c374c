//! # External Capabilities
//!
//! Interfaces the constraint catalog consumes but does not implement.
//! The file-existence lookup in particular may be backed by wiki storage
//! and perform real I/O; the pipeline treats each call as a bounded,
//! blocking lookup with no retry.

/// Capability answering "does a file with this name exist?".
///
/// A `required-files-exist` finding hinges on this answer. Lookup
/// failures are treated by the consuming rule as "file does not exist"
/// (fail-closed), so an implementation should only error for genuinely
/// unanswerable lookups.
pub trait FileLookup: Send + Sync {
    /// Check whether `name` resolves to an existing file.
    fn file_exists(&self, name: &str) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

/// Lookup that reports every file as present. Useful for callers that
/// validate documents detached from any file store.
#[derive(Debug, Default)]
pub struct AllFilesPresent;

impl FileLookup for AllFilesPresent {
    fn file_exists(&self, _name: &str) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(true)
    }
}
