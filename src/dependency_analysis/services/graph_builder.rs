use super::name_resolver::{normalize_name, NameResolver};
use super::reference_extractor::{split_names, ReferenceExtractor};
use crate::dependency_analysis::domain::{
    CandidateReference, Component, ComponentKind, ComponentRecords, DanglingTarget,
    DependencyGraph, Diagnostics, EdgeInsertion, EdgeKind, ExpectedKind, ExternalTableReference,
    Reference, ResolutionContext, ResolutionResult, UnresolvedReference,
};
use crate::dependency_analysis::policies::ActionVisibility;
use crate::shared::Result;
use serde_json::Value;

/// View types whose Row Selected event may be left to AppSheet
const AUTO_NAVIGATING_VIEW_TYPES: &[&str] = &["table", "deck", "gallery"];

const AUTO_EVENT_ACTION: &str = "**auto**";

/// A finished graph plus everything that did not resolve cleanly
#[derive(Debug, Clone)]
pub struct BuiltGraph {
    pub graph: DependencyGraph,
    pub diagnostics: Diagnostics,
}

/// GraphBuilder service turning component records into a dependency graph
///
/// Nodes are added first, so every edge source exists and only targets can
/// dangle. The resulting graph is not modified again.
pub struct GraphBuilder;

impl GraphBuilder {
    /// Builds the graph for one document
    ///
    /// # Errors
    /// Returns `AnalysisError::DuplicateIdentity` if two records share a
    /// `(kind, name)` pair; no partial graph is returned in that case
    pub fn build(records: &ComponentRecords) -> Result<BuiltGraph> {
        Self::build_with_progress(records, |_, _| {})
    }

    /// Builds the graph, calling `on_progress(done, total)` after each
    /// component's references are resolved
    pub fn build_with_progress<F>(records: &ComponentRecords, mut on_progress: F) -> Result<BuiltGraph>
    where
        F: FnMut(usize, usize),
    {
        let extractor = ReferenceExtractor::new()?;
        let (components, skipped_records) = records.to_components();
        let known_tables = records.known_tables(&components);
        let resolver = NameResolver::new(components.iter()).with_declared(&records.declared);

        // Step 1: every parsed record becomes a node
        let mut graph = DependencyGraph::new();
        for component in &components {
            graph.add_node(component.clone())?;
        }

        // Step 2: extract, resolve and link references
        let mut diagnostics = Diagnostics {
            skipped_records,
            ..Diagnostics::default()
        };
        let total = components.len();
        for (index, component) in components.iter().enumerate() {
            for candidate in extractor.extract(component) {
                Self::link(&mut graph, &resolver, &known_tables, candidate, &mut diagnostics)?;
            }
            if component.kind() == ComponentKind::View {
                Self::link_visible_actions(&mut graph, &resolver, component, &mut diagnostics)?;
                if let Some(target) = auto_navigation_target(component, &components) {
                    let reference = Reference::new(
                        component.id().clone(),
                        target.id().clone(),
                        EdgeKind::Navigation,
                        "view_configuration",
                    );
                    graph.add_edge(reference)?;
                }
            }
            on_progress(index + 1, total);
        }

        Ok(BuiltGraph { graph, diagnostics })
    }

    fn link(
        graph: &mut DependencyGraph,
        resolver: &NameResolver,
        known_tables: &[String],
        candidate: CandidateReference,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let context = ResolutionContext::new(
            candidate.context_table.as_deref(),
            &candidate.mention.qualifier,
        );

        match resolver.resolve(&candidate.mention.text, &candidate.expected, &context) {
            ResolutionResult::Resolved(target) => {
                let reference = Reference::new(
                    candidate.from,
                    target,
                    candidate.edge_kind,
                    candidate.field_origin,
                );
                if graph.add_edge(reference.clone())? == EdgeInsertion::Dangling {
                    diagnostics.dangling.push(DanglingTarget { reference });
                }
            }
            ResolutionResult::NotFound
                if candidate.table_fallback
                    && is_known_table(&candidate.mention.text, known_tables) =>
            {
                let external = ExternalTableReference {
                    from: candidate.from,
                    field_origin: candidate.field_origin,
                    table: candidate.mention.text,
                };
                if !diagnostics.external_tables.contains(&external) {
                    diagnostics.external_tables.push(external);
                }
            }
            unresolved => {
                let entry = UnresolvedReference {
                    from: candidate.from,
                    field_origin: candidate.field_origin,
                    mention: candidate.mention.to_string(),
                    expected: candidate.expected.kinds().to_vec(),
                    edge_kind: candidate.edge_kind,
                    candidates: unresolved.candidates(),
                };
                if !diagnostics.unresolved.contains(&entry) {
                    diagnostics.unresolved.push(entry);
                }
            }
        }

        Ok(())
    }

    /// Links the entries of a view's `available_actions` that the view
    /// actually displays
    ///
    /// The list also names AppSheet's built-in actions, so entries that do
    /// not resolve are dropped without a diagnostic.
    fn link_visible_actions(
        graph: &mut DependencyGraph,
        resolver: &NameResolver,
        view: &Component,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let Some(listed) = view.field("available_actions") else {
            return Ok(());
        };
        let expected = ExpectedKind::Exactly(ComponentKind::Action);

        for name in split_names(listed) {
            let ResolutionResult::Resolved(target) =
                resolver.resolve(name, &expected, &ResolutionContext::unqualified())
            else {
                continue;
            };
            let visible = graph
                .component(&target)
                .is_some_and(|action| ActionVisibility::is_visible(action, view));
            if !visible {
                continue;
            }

            let reference = Reference::new(
                view.id().clone(),
                target,
                EdgeKind::ViewAction,
                "available_actions",
            );
            if graph.add_edge(reference.clone())? == EdgeInsertion::Dangling {
                diagnostics.dangling.push(DanglingTarget { reference });
            }
        }

        Ok(())
    }
}

/// The detail view AppSheet opens when a row is selected in `view` and its
/// Row Selected event is left on `**auto**`
///
/// Candidates are the detail views over the same data source. User views win
/// over system views; ties go to the alphabetically first name.
fn auto_navigation_target<'c>(view: &Component, components: &'c [Component]) -> Option<&'c Component> {
    let view_type = view.field("view_type")?.to_lowercase();
    if !AUTO_NAVIGATING_VIEW_TYPES.contains(&view_type.as_str()) {
        return None;
    }
    let configuration = view.field("view_configuration")?;
    if !configuration.contains(AUTO_EVENT_ACTION) {
        return None;
    }
    if let Ok(json) = serde_json::from_str::<Value>(configuration) {
        let explicit_row_selected = json
            .get("Events")
            .and_then(Value::as_array)
            .is_some_and(|events| {
                events.iter().any(|event| {
                    let event_type = event.get("EventType").and_then(Value::as_str).unwrap_or_default();
                    let action = event.get("EventAction").and_then(Value::as_str).unwrap_or_default();
                    event_type.eq_ignore_ascii_case("row selected") && action != AUTO_EVENT_ACTION
                })
            });
        if explicit_row_selected {
            return None;
        }
    }

    let data_source = view.first_field(&["data_source", "source_table"])?;
    let (system, user): (Vec<&Component>, Vec<&Component>) = components
        .iter()
        .filter(|other| {
            other.kind() == ComponentKind::View
                && other
                    .field("view_type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("detail"))
                && (other.field("data_source") == Some(data_source)
                    || other.field("source_table") == Some(data_source))
        })
        .partition(|detail| detail.flag("is_system_view"));

    let preferred = if user.is_empty() { system } else { user };
    preferred.into_iter().min_by(|a, b| a.name().cmp(b.name()))
}

/// Without any table list, every unmatched source is taken to be a table
fn is_known_table(name: &str, known_tables: &[String]) -> bool {
    if known_tables.is_empty() {
        return true;
    }
    let wanted = normalize_name(name);
    known_tables.iter().any(|table| normalize_name(table) == wanted)
}
