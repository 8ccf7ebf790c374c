//! # Constraint Pipeline
//!
//! Owns the rule catalog and the order rules run in. Ordering is derived
//! once at construction from the declared dependencies: a stable
//! topological sort that preserves registration order among rules whose
//! dependencies are equally satisfied, so two runs over the same catalog
//! always evaluate in the same sequence.
//!
//! ## Design
//!
//! Catalog defects — an unknown dependency id, a duplicate id, a
//! dependency cycle — are programming errors in the caller, not document
//! findings, and surface as [`PipelineError`] from the constructor. Once
//! built, a pipeline run never aborts early: every rule sees the document
//! and the report accumulates everything.

use mapdoc_core::{DocumentTree, MapVersionInfo, ValidationReport};

use crate::constraint::{Constraint, ReportSink};

/// Catalog defect detected while building a pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Two constraints registered the same id.
    #[error("duplicate constraint id `{0}`")]
    DuplicateId(String),
    /// A constraint depends on an id no catalog member declares.
    #[error("constraint `{id}` depends on unknown constraint `{dependency}`")]
    UnknownDependency {
        /// The dependent constraint.
        id: String,
        /// The missing dependency id.
        dependency: String,
    },
    /// The dependency graph contains a cycle.
    #[error("constraint dependency cycle among: {0}")]
    DependencyCycle(String),
}

/// Dependency-ordered collection of semantic rules.
pub struct ConstraintPipeline {
    // Stored in execution order.
    constraints: Vec<Box<dyn Constraint>>,
}

impl ConstraintPipeline {
    /// Build a pipeline from a catalog, resolving execution order.
    pub fn new(catalog: Vec<Box<dyn Constraint>>) -> Result<Self, PipelineError> {
        let order = execution_order(&catalog)?;
        let mut slots: Vec<Option<Box<dyn Constraint>>> =
            catalog.into_iter().map(Some).collect();
        let mut constraints = Vec::with_capacity(slots.len());
        for index in order {
            if let Some(constraint) = slots[index].take() {
                constraints.push(constraint);
            }
        }
        Ok(Self { constraints })
    }

    /// Run every rule against `document`, in dependency order.
    ///
    /// The run never stops early; a failing rule does not suppress the
    /// ones after it.
    pub fn run(&self, version: &MapVersionInfo, document: &DocumentTree) -> ValidationReport {
        let mut report = ValidationReport::new();
        let mut sink = ReportSink::new(&mut report, version.is_fragment);
        for constraint in &self.constraints {
            let passed = constraint.evaluate(&mut sink, version, document);
            if !passed {
                tracing::debug!(
                    constraint = constraint.descriptor().id,
                    "constraint reported findings"
                );
            }
        }
        report
    }

    /// Ids in the order rules will execute. Exposed for diagnostics.
    pub fn execution_order(&self) -> Vec<&'static str> {
        self.constraints.iter().map(|c| c.descriptor().id).collect()
    }

    /// Number of rules in the catalog.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

// Stable Kahn: among ready nodes, always pick the lowest registration
// index, so ordering is deterministic for a given catalog.
fn execution_order(catalog: &[Box<dyn Constraint>]) -> Result<Vec<usize>, PipelineError> {
    let descriptors: Vec<_> = catalog.iter().map(|c| c.descriptor()).collect();

    let mut index_of = std::collections::HashMap::new();
    for (index, descriptor) in descriptors.iter().enumerate() {
        if index_of.insert(descriptor.id, index).is_some() {
            return Err(PipelineError::DuplicateId(descriptor.id.to_owned()));
        }
    }

    // dependents[i] lists nodes that must wait for i.
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); descriptors.len()];
    let mut pending: Vec<usize> = vec![0; descriptors.len()];
    for (index, descriptor) in descriptors.iter().enumerate() {
        for dependency in descriptor.depends_on {
            let Some(&dep_index) = index_of.get(dependency) else {
                return Err(PipelineError::UnknownDependency {
                    id: descriptor.id.to_owned(),
                    dependency: (*dependency).to_owned(),
                });
            };
            dependents[dep_index].push(index);
            pending[index] += 1;
        }
    }

    let mut order = Vec::with_capacity(descriptors.len());
    let mut ready: Vec<usize> = (0..descriptors.len()).filter(|&i| pending[i] == 0).collect();
    while let Some(position) = ready.iter().enumerate().min_by_key(|(_, &i)| i).map(|(p, _)| p)
    {
        let index = ready.swap_remove(position);
        order.push(index);
        for &dependent in &dependents[index] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.push(dependent);
            }
        }
    }

    if order.len() != descriptors.len() {
        let mut stuck: Vec<&str> = descriptors
            .iter()
            .enumerate()
            .filter(|(i, _)| pending[*i] > 0)
            .map(|(_, d)| d.id)
            .collect();
        stuck.sort_unstable();
        return Err(PipelineError::DependencyCycle(stuck.join(", ")));
    }
    Ok(order)
}
