//! Builder for constructing AnalysisReadModel from an analysis response

use super::analysis_read_model::{
    AnalysisMetadataView, AnalysisReadModel, CountView, GraphSummaryView,
};
use super::component_view::{
    ComponentRefView, ExemptedView, InertView, KindFindingsView, OrphanView,
};
use super::diagnostics_view::{
    DanglingView, DiagnosticsView, ExternalTableView, SkippedRecordView, UnresolvedView,
};
use super::trace_view::{GroupFindingView, HopView, PathView, TraceView};
use crate::application::dto::{AnalysisResponse, GroupFinding, TraceResult};
use crate::dependency_analysis::domain::{
    AnalysisMetadata, ComponentId, ComponentKind, DependencyGraph, Diagnostics, EdgeKind, Path,
    Reference, Termination,
};
use crate::dependency_analysis::services::OrphanReport;

/// Builder for constructing AnalysisReadModel from an analysis response
pub struct AnalysisReadModelBuilder;

impl AnalysisReadModelBuilder {
    /// Builds the read model
    ///
    /// # Arguments
    /// * `response` - The analysis use case response
    ///
    /// # Returns
    /// A fully constructed AnalysisReadModel
    pub fn build(response: &AnalysisResponse) -> AnalysisReadModel {
        AnalysisReadModel {
            metadata: Self::build_metadata(&response.metadata),
            summary: Self::build_summary(&response.graph),
            roots: response.orphans.roots.iter().map(component_ref).collect(),
            orphans: Self::build_findings(&response.orphans),
            traces: response.traces.iter().map(Self::build_trace).collect(),
            column_cycles: response
                .column_cycles
                .iter()
                .map(|cycle| cycle.iter().map(|id| id.name().to_string()).collect())
                .collect(),
            group_findings: response
                .group_findings
                .iter()
                .map(Self::build_group_finding)
                .collect(),
            diagnostics: Self::build_diagnostics(&response.diagnostics),
        }
    }

    fn build_metadata(metadata: &AnalysisMetadata) -> AnalysisMetadataView {
        AnalysisMetadataView {
            timestamp: metadata.timestamp().to_string(),
            tool_name: metadata.tool_name().to_string(),
            tool_version: metadata.tool_version().to_string(),
            run_id: metadata.run_id().to_string(),
            input: metadata.input().to_string(),
        }
    }

    fn build_summary(graph: &DependencyGraph) -> GraphSummaryView {
        let components = ComponentKind::ALL
            .iter()
            .map(|kind| CountView {
                name: kind.as_str().to_string(),
                count: graph.components_of_kind(*kind).len(),
            })
            .collect();

        let edge_kinds = EdgeKind::ALL
            .iter()
            .map(|kind| CountView {
                name: kind.as_str().to_string(),
                count: graph.references().filter(|r| r.edge_kind() == *kind).count(),
            })
            .filter(|count| count.count > 0)
            .collect();

        GraphSummaryView {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            components,
            edge_kinds,
            dangling_targets: graph.components().filter(|c| graph.is_dangling(c.id())).count(),
        }
    }

    fn build_findings(report: &OrphanReport) -> Vec<KindFindingsView> {
        report
            .by_kind
            .iter()
            .map(|findings| KindFindingsView {
                kind: findings.kind.as_str().to_string(),
                label: findings.kind.label().to_string(),
                total: findings.total,
                orphans: findings
                    .orphans
                    .iter()
                    .map(|orphan| OrphanView {
                        name: orphan.id.name().to_string(),
                        reason: orphan.reason.to_string(),
                    })
                    .collect(),
                exempted: findings
                    .exempted
                    .iter()
                    .map(|exempted| ExemptedView {
                        name: exempted.id.name().to_string(),
                        rule: exempted.rule.clone(),
                    })
                    .collect(),
                inert: findings
                    .inert
                    .iter()
                    .map(|inert| InertView {
                        name: inert.id.name().to_string(),
                        field: inert.field.clone(),
                        condition: inert.condition.clone(),
                    })
                    .collect(),
            })
            .collect()
    }

    fn build_trace(result: &TraceResult) -> TraceView {
        TraceView {
            shape: result.request.shape.as_str().to_string(),
            start: component_ref(&result.request.start),
            limited: result.limited,
            paths: result.paths.iter().map(Self::build_path).collect(),
        }
    }

    fn build_path(path: &Path) -> PathView {
        let termination = match path.termination {
            Termination::Leaf => "leaf",
            Termination::Cycle(_) => "cycle",
            Termination::DepthLimit => "depth_limit",
        };
        PathView {
            components: path.components().iter().map(|id| id.name().to_string()).collect(),
            hops: path.hops.iter().map(|hop| hop_view(&hop.reference)).collect(),
            termination: termination.to_string(),
            display: path.to_string(),
        }
    }

    fn build_group_finding(finding: &GroupFinding) -> GroupFindingView {
        GroupFindingView {
            group: finding.group.name().to_string(),
            unreachable_members: finding
                .unreachable_members
                .iter()
                .map(|id| id.name().to_string())
                .collect(),
        }
    }

    fn build_diagnostics(diagnostics: &Diagnostics) -> DiagnosticsView {
        DiagnosticsView {
            unresolved: diagnostics
                .unresolved
                .iter()
                .map(|u| UnresolvedView {
                    from: component_ref(&u.from),
                    field: u.field_origin.clone(),
                    mention: u.mention.clone(),
                    expected: u.expected.iter().map(|k| k.as_str().to_string()).collect(),
                    edge_kind: u.edge_kind.as_str().to_string(),
                    candidates: u.candidates.iter().map(component_ref).collect(),
                })
                .collect(),
            dangling: diagnostics
                .dangling
                .iter()
                .map(|d| {
                    let hop = hop_view(&d.reference);
                    DanglingView {
                        from: hop.from,
                        to: hop.to,
                        edge_kind: hop.edge_kind,
                        field: hop.field,
                    }
                })
                .collect(),
            external_tables: diagnostics
                .external_tables
                .iter()
                .map(|e| ExternalTableView {
                    from: component_ref(&e.from),
                    field: e.field_origin.clone(),
                    table: e.table.clone(),
                })
                .collect(),
            skipped_records: diagnostics
                .skipped_records
                .iter()
                .map(|s| SkippedRecordView {
                    kind: s.kind.as_str().to_string(),
                    index: s.index,
                    reason: s.reason.clone(),
                })
                .collect(),
            unknown_roots: diagnostics
                .unknown_roots
                .iter()
                .map(|root| ComponentRefView {
                    kind: root.kind.as_str().to_string(),
                    name: root.name.clone(),
                })
                .collect(),
        }
    }
}

fn component_ref(id: &ComponentId) -> ComponentRefView {
    ComponentRefView {
        kind: id.kind().as_str().to_string(),
        name: id.name().to_string(),
    }
}

fn hop_view(reference: &Reference) -> HopView {
    HopView {
        from: component_ref(reference.from()),
        to: component_ref(reference.to()),
        edge_kind: reference.edge_kind().as_str().to_string(),
        field: reference.field_origin().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::TraceRequest;
    use crate::dependency_analysis::domain::{Component, Hop, PathShape, UnresolvedReference};
    use crate::dependency_analysis::services::{KindFindings, Orphan, OrphanReason};
    use indexmap::IndexMap;
    use std::collections::BTreeSet;

    fn view(name: &str) -> ComponentId {
        ComponentId::new(ComponentKind::View, name)
    }

    fn create_test_metadata() -> AnalysisMetadata {
        AnalysisMetadata::new(
            "2024-01-15T10:30:00Z".to_string(),
            "appsheet-deps".to_string(),
            "0.1.0".to_string(),
            "urn:uuid:12345678-1234-1234-1234-123456789012".to_string(),
            "records.yaml".to_string(),
        )
    }

    fn create_test_response() -> AnalysisResponse {
        let mut graph = DependencyGraph::new();
        for name in ["Home", "Details", "Old"] {
            graph
                .add_node(Component::new(view(name), IndexMap::new(), None, Some(0)))
                .unwrap();
        }
        let edge = Reference::new(view("Home"), view("Details"), EdgeKind::Navigation, "linked_view");
        graph.add_edge(edge.clone()).unwrap();

        let diagnostics = Diagnostics {
            unresolved: vec![UnresolvedReference {
                from: view("Home"),
                field_origin: "show_if".to_string(),
                mention: "Price".to_string(),
                expected: vec![ComponentKind::Column],
                edge_kind: EdgeKind::ColumnFormula,
                candidates: BTreeSet::new(),
            }],
            ..Diagnostics::default()
        };

        AnalysisResponse {
            graph,
            diagnostics,
            orphans: OrphanReport {
                roots: BTreeSet::from([view("Home")]),
                unknown_roots: Vec::new(),
                by_kind: vec![KindFindings {
                    kind: ComponentKind::View,
                    total: 3,
                    orphans: vec![Orphan {
                        id: view("Old"),
                        reason: OrphanReason::Isolated,
                    }],
                    exempted: Vec::new(),
                    inert: Vec::new(),
                }],
            },
            traces: vec![TraceResult {
                request: TraceRequest::new(PathShape::Navigation, view("Home")),
                paths: vec![Path {
                    start: view("Home"),
                    hops: vec![Hop { reference: edge }],
                    termination: Termination::Leaf,
                }],
                limited: false,
            }],
            column_cycles: Vec::new(),
            group_findings: Vec::new(),
            metadata: create_test_metadata(),
        }
    }

    #[test]
    fn test_build_metadata() {
        let model = AnalysisReadModelBuilder::build(&create_test_response());
        assert_eq!(model.metadata.tool_name, "appsheet-deps");
        assert_eq!(model.metadata.input, "records.yaml");
        assert!(model.metadata.run_id.starts_with("urn:uuid:"));
    }

    #[test]
    fn test_build_summary_counts() {
        let model = AnalysisReadModelBuilder::build(&create_test_response());
        assert_eq!(model.summary.nodes, 3);
        assert_eq!(model.summary.edges, 1);
        assert_eq!(
            model.summary.components[0],
            CountView {
                name: "view".to_string(),
                count: 3
            }
        );
        assert_eq!(model.summary.edge_kinds.len(), 1);
        assert_eq!(model.summary.edge_kinds[0].name, "navigation");
    }

    #[test]
    fn test_build_orphans_and_roots() {
        let model = AnalysisReadModelBuilder::build(&create_test_response());
        assert_eq!(model.orphan_count(), 1);
        assert_eq!(model.orphans[0].label, "View");
        assert_eq!(model.orphans[0].orphans[0].reason, "isolated");
        assert_eq!(model.roots[0].name, "Home");
    }

    #[test]
    fn test_build_trace_paths() {
        let model = AnalysisReadModelBuilder::build(&create_test_response());
        let trace = &model.traces[0];
        assert_eq!(trace.shape, "navigation");
        assert_eq!(trace.paths[0].components, vec!["Home", "Details"]);
        assert_eq!(trace.paths[0].termination, "leaf");
        assert_eq!(trace.paths[0].display, "Home → Details");
        assert_eq!(trace.paths[0].hops[0].field, "linked_view");
    }

    #[test]
    fn test_build_diagnostics() {
        let model = AnalysisReadModelBuilder::build(&create_test_response());
        let unresolved = &model.diagnostics.unresolved[0];
        assert_eq!(unresolved.mention, "Price");
        assert_eq!(unresolved.expected, vec!["column"]);
        assert!(unresolved.candidates.is_empty());
    }
}
