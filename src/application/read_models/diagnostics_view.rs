//! Diagnostics view structs for read model

use super::component_view::ComponentRefView;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagnosticsView {
    pub unresolved: Vec<UnresolvedView>,
    pub dangling: Vec<DanglingView>,
    pub external_tables: Vec<ExternalTableView>,
    pub skipped_records: Vec<SkippedRecordView>,
    pub unknown_roots: Vec<ComponentRefView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnresolvedView {
    pub from: ComponentRefView,
    pub field: String,
    pub mention: String,
    pub expected: Vec<String>,
    pub edge_kind: String,
    /// Empty when nothing matched, several on a name collision
    pub candidates: Vec<ComponentRefView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DanglingView {
    pub from: ComponentRefView,
    pub to: ComponentRefView,
    pub edge_kind: String,
    pub field: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExternalTableView {
    pub from: ComponentRefView,
    pub field: String,
    pub table: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecordView {
    pub kind: String,
    pub index: usize,
    pub reason: String,
}
