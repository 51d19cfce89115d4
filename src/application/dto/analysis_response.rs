use super::analysis_request::TraceRequest;
use crate::dependency_analysis::domain::{
    AnalysisMetadata, ComponentId, DependencyGraph, Diagnostics, Path,
};
use crate::dependency_analysis::services::OrphanReport;

/// Paths found for one trace request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceResult {
    pub request: TraceRequest,
    pub paths: Vec<Path>,
    /// More paths existed than the configured maximum
    pub limited: bool,
}

/// Members of a grouped action that never run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFinding {
    pub group: ComponentId,
    pub unreachable_members: Vec<ComponentId>,
}

/// AnalysisResponse - Internal response DTO from the analysis use case
///
/// Carries the built graph alongside everything derived from it, so
/// formatters and callers can query further without rebuilding.
#[derive(Debug, Clone)]
pub struct AnalysisResponse {
    pub graph: DependencyGraph,
    pub diagnostics: Diagnostics,
    pub orphans: OrphanReport,
    pub traces: Vec<TraceResult>,
    pub column_cycles: Vec<Vec<ComponentId>>,
    pub group_findings: Vec<GroupFinding>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResponse {
    pub fn has_orphans(&self) -> bool {
        self.orphans.orphan_count() > 0
    }
}
