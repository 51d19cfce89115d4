//! Analysis read model for query operations
//!
//! This module provides the main read model struct that aggregates
//! all analysis results in a formatter-friendly shape.

use super::component_view::{ComponentRefView, KindFindingsView};
use super::diagnostics_view::DiagnosticsView;
use super::trace_view::{GroupFindingView, TraceView};
use serde::Serialize;

/// Main read model for an analysis run
///
/// A denormalized view of the response following the CQRS-lite pattern;
/// the JSON formatter serializes it as is.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReadModel {
    pub metadata: AnalysisMetadataView,
    pub summary: GraphSummaryView,
    pub roots: Vec<ComponentRefView>,
    pub orphans: Vec<KindFindingsView>,
    pub traces: Vec<TraceView>,
    pub column_cycles: Vec<Vec<String>>,
    pub group_findings: Vec<GroupFindingView>,
    pub diagnostics: DiagnosticsView,
}

impl AnalysisReadModel {
    pub fn orphan_count(&self) -> usize {
        self.orphans.iter().map(|k| k.orphans.len()).sum()
    }
}

/// View representation of run metadata
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadataView {
    pub timestamp: String,
    pub tool_name: String,
    pub tool_version: String,
    pub run_id: String,
    pub input: String,
}

/// Node and edge counts of the built graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphSummaryView {
    pub nodes: usize,
    pub edges: usize,
    /// Parsed components per kind, in canonical kind order
    pub components: Vec<CountView>,
    /// Edges per edge kind, kinds with no edges omitted
    pub edge_kinds: Vec<CountView>,
    pub dangling_targets: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountView {
    pub name: String,
    pub count: usize,
}
