//! # Pipeline Configuration
//!
//! Explicit configuration handed to the catalog at construction. Rules
//! must not reach for ambient or static configuration during evaluation;
//! everything they need is captured here once, which keeps pipeline runs
//! reproducible and testable.

/// Configuration for the standard constraint catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Zoom level assumed when `settings.zoom.min` is absent.
    pub default_zoom_min: f64,
    /// Zoom level assumed when `settings.zoom.max` is absent.
    pub default_zoom_max: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_zoom_min: -16.0,
            default_zoom_max: 6.0,
        }
    }
}
