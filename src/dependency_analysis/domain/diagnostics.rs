use super::component::{ComponentId, ComponentKind};
use super::reference::{EdgeKind, Reference};
use std::collections::BTreeSet;

/// A candidate mention that did not resolve to exactly one component
///
/// An empty `candidates` set means nothing matched; more than one means
/// a name collision the resolver refused to guess at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub from: ComponentId,
    pub field_origin: String,
    pub mention: String,
    pub expected: Vec<ComponentKind>,
    pub edge_kind: EdgeKind,
    pub candidates: BTreeSet<ComponentId>,
}

impl UnresolvedReference {
    pub fn is_not_found(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// A reference whose target matched a known name but has no parsed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingTarget {
    pub reference: Reference,
}

/// A mention of a data table rather than a component
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExternalTableReference {
    pub from: ComponentId,
    pub field_origin: String,
    pub table: String,
}

/// An input record that could not become a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub kind: ComponentKind,
    pub index: usize,
    pub reason: String,
}

/// A configured root name with no matching component
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnknownRoot {
    pub kind: ComponentKind,
    pub name: String,
}

/// Non-fatal anomalies collected during one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub unresolved: Vec<UnresolvedReference>,
    pub dangling: Vec<DanglingTarget>,
    pub external_tables: Vec<ExternalTableReference>,
    pub skipped_records: Vec<SkippedRecord>,
    pub unknown_roots: Vec<UnknownRoot>,
}

impl Diagnostics {
    pub fn not_found_count(&self) -> usize {
        self.unresolved.iter().filter(|u| u.is_not_found()).count()
    }

    pub fn collision_count(&self) -> usize {
        self.unresolved.len() - self.not_found_count()
    }

    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
            && self.dangling.is_empty()
            && self.skipped_records.is_empty()
            && self.unknown_roots.is_empty()
    }
}
