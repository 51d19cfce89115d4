//! Component view structs for read model
//!
//! These structs provide a flattened, query-optimized view of components
//! and of the orphan findings about them.

use serde::Serialize;

/// View representation of a component identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentRefView {
    /// Snake-case kind (`view`, `column`, ...)
    pub kind: String,
    pub name: String,
}

/// Orphan findings for one component kind
#[derive(Debug, Clone, Serialize)]
pub struct KindFindingsView {
    pub kind: String,
    /// Title-case kind for headings
    pub label: String,
    /// Parsed components of this kind
    pub total: usize,
    pub orphans: Vec<OrphanView>,
    pub exempted: Vec<ExemptedView>,
    pub inert: Vec<InertView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrphanView {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExemptedView {
    pub name: String,
    /// Description of the exemption rule that matched
    pub rule: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InertView {
    pub name: String,
    pub field: String,
    pub condition: String,
}
