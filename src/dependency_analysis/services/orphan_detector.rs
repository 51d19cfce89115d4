use super::name_resolver::normalize_name;
use crate::dependency_analysis::domain::{
    Component, ComponentId, ComponentKind, DependencyGraph, UnknownRoot,
};
use crate::dependency_analysis::policies::{ConstantCondition, ExemptionRules, RootSet};
use std::collections::BTreeSet;
use std::fmt;

/// Why a component counts as orphaned
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OrphanReason {
    /// No edges in or out
    Isolated,
    /// Nothing refers to it
    Unreferenced,
    /// Referred to, but only by components that are themselves dead
    UnreachableFromRoots,
}

impl OrphanReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrphanReason::Isolated => "isolated",
            OrphanReason::Unreferenced => "unreferenced",
            OrphanReason::UnreachableFromRoots => "unreachable_from_roots",
        }
    }
}

impl fmt::Display for OrphanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orphan {
    pub id: ComponentId,
    pub reason: OrphanReason,
}

/// Unreachable, but kept alive by an exemption rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExemptedComponent {
    pub id: ComponentId,
    pub rule: String,
}

/// Live by reachability, but its condition can never be true
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InertComponent {
    pub id: ComponentId,
    pub field: String,
    pub condition: String,
}

/// Orphan findings for one component kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindFindings {
    pub kind: ComponentKind,
    pub total: usize,
    pub orphans: Vec<Orphan>,
    pub exempted: Vec<ExemptedComponent>,
    pub inert: Vec<InertComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanReport {
    pub roots: BTreeSet<ComponentId>,
    pub unknown_roots: Vec<UnknownRoot>,
    pub by_kind: Vec<KindFindings>,
}

impl OrphanReport {
    pub fn orphan_count(&self) -> usize {
        self.by_kind.iter().map(|k| k.orphans.len()).sum()
    }

    pub fn orphans_of(&self, kind: ComponentKind) -> impl Iterator<Item = &Orphan> {
        self.by_kind
            .iter()
            .filter(move |k| k.kind == kind)
            .flat_map(|k| k.orphans.iter())
    }
}

/// OrphanDetector service finding components no entry point can reach
///
/// Reachability is computed over every edge kind. Exemption rules are
/// applied afterwards, so they only ever remove components from the
/// orphan set.
pub struct OrphanDetector;

impl OrphanDetector {
    /// Resolves configured roots to components
    ///
    /// Names are matched exactly, then normalized (every normalized match
    /// becomes a root). Selector matches are added on top.
    ///
    /// # Returns
    /// The root identities plus every configured name that matched nothing
    pub fn resolve_roots(
        graph: &DependencyGraph,
        roots: &RootSet,
    ) -> (BTreeSet<ComponentId>, Vec<UnknownRoot>) {
        let mut resolved = BTreeSet::new();
        let mut unknown = Vec::new();

        for kind in ComponentKind::ALL {
            let candidates = graph.components_of_kind(kind);

            for name in roots.names(kind) {
                let exact = ComponentId::new(kind, name.trim());
                if graph.contains(&exact) {
                    resolved.insert(exact);
                    continue;
                }

                let wanted = normalize_name(name);
                let matches: Vec<&Component> = candidates
                    .iter()
                    .copied()
                    .filter(|c| normalize_name(c.name()) == wanted)
                    .collect();
                if matches.is_empty() {
                    unknown.push(UnknownRoot {
                        kind,
                        name: name.to_string(),
                    });
                }
                resolved.extend(matches.into_iter().map(|c| c.id().clone()));
            }

            resolved.extend(
                candidates
                    .iter()
                    .filter(|c| roots.selects(c))
                    .map(|c| c.id().clone()),
            );
        }

        (resolved, unknown)
    }

    /// Components of `kind` unreachable from `roots` and not exempt
    pub fn find_orphans(
        graph: &DependencyGraph,
        kind: ComponentKind,
        roots: &BTreeSet<ComponentId>,
        rules: &ExemptionRules,
    ) -> BTreeSet<ComponentId> {
        let live = graph.reachable_from(roots);
        graph
            .components_of_kind(kind)
            .into_iter()
            .filter(|c| !live.contains(c.id()) && !rules.is_exempt(c))
            .map(|c| c.id().clone())
            .collect()
    }

    /// Full per-kind report: orphans with reasons, exemptions and inert components
    pub fn report(graph: &DependencyGraph, roots: &RootSet, rules: &ExemptionRules) -> OrphanReport {
        let (root_ids, unknown_roots) = Self::resolve_roots(graph, roots);
        let live = graph.reachable_from(&root_ids);

        let by_kind = ComponentKind::ALL
            .iter()
            .map(|&kind| {
                let components = graph.components_of_kind(kind);
                let mut findings = KindFindings {
                    kind,
                    total: components.len(),
                    orphans: Vec::new(),
                    exempted: Vec::new(),
                    inert: Vec::new(),
                };

                for component in components {
                    let id = component.id();
                    let exemption = rules.exempting_rule(component);

                    match (live.contains(id), exemption) {
                        (false, Some(rule)) => findings.exempted.push(ExemptedComponent {
                            id: id.clone(),
                            rule: rule.describe(),
                        }),
                        (false, None) => findings.orphans.push(Orphan {
                            id: id.clone(),
                            reason: Self::reason(graph, id),
                        }),
                        (true, None) => {
                            if let Some((field, condition)) = Self::inert_condition(component) {
                                findings.inert.push(InertComponent {
                                    id: id.clone(),
                                    field: field.to_string(),
                                    condition: condition.to_string(),
                                });
                            }
                        }
                        (true, Some(_)) => {}
                    }
                }

                findings.orphans.sort_by(|a, b| a.id.cmp(&b.id));
                findings.exempted.sort_by(|a, b| a.id.cmp(&b.id));
                findings.inert.sort_by(|a, b| a.id.cmp(&b.id));
                findings
            })
            .collect();

        OrphanReport {
            roots: root_ids,
            unknown_roots,
            by_kind,
        }
    }

    fn reason(graph: &DependencyGraph, id: &ComponentId) -> OrphanReason {
        match (graph.incoming(id).is_empty(), graph.outgoing(id).is_empty()) {
            (true, true) => OrphanReason::Isolated,
            (true, false) => OrphanReason::Unreferenced,
            (false, _) => OrphanReason::UnreachableFromRoots,
        }
    }

    /// The field whose constant-false value makes a component inert
    pub fn inert_condition(component: &Component) -> Option<(&'static str, &str)> {
        if component.kind() == ComponentKind::FormatRule && component.flag("is_disabled") {
            return component.field("is_disabled").map(|value| ("is_disabled", value));
        }

        let field = match component.kind() {
            ComponentKind::View | ComponentKind::Column => "show_if",
            ComponentKind::Action => "only_if_condition",
            ComponentKind::Slice => "row_filter_condition",
            ComponentKind::FormatRule => "condition",
        };
        component
            .field(field)
            .filter(|condition| ConstantCondition::is_always_false(condition))
            .map(|condition| (field, condition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_analysis::domain::{EdgeKind, Reference};
    use crate::dependency_analysis::policies::AttributePredicate;
    use indexmap::IndexMap;

    fn component(kind: ComponentKind, name: &str, pairs: &[(&str, &str)]) -> Component {
        let fields: IndexMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Component::new(ComponentId::new(kind, name), fields, None, Some(0))
    }

    fn view_id(name: &str) -> ComponentId {
        ComponentId::new(ComponentKind::View, name)
    }

    fn nav(from: &str, to: &str) -> Reference {
        Reference::new(view_id(from), view_id(to), EdgeKind::Navigation, "linked_view")
    }

    /// Home → Details, Dead → Gone, Lonely alone
    fn sample_graph() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for name in ["Home", "Details", "Dead", "Gone", "Lonely"] {
            graph.add_node(component(ComponentKind::View, name, &[])).unwrap();
        }
        graph.add_edge(nav("Home", "Details")).unwrap();
        graph.add_edge(nav("Dead", "Gone")).unwrap();
        graph
    }

    #[test]
    fn test_find_orphans_excludes_reachable() {
        let graph = sample_graph();
        let roots = BTreeSet::from([view_id("Home")]);
        let orphans =
            OrphanDetector::find_orphans(&graph, ComponentKind::View, &roots, &ExemptionRules::new());
        assert_eq!(
            orphans,
            BTreeSet::from([view_id("Dead"), view_id("Gone"), view_id("Lonely")])
        );
    }

    #[test]
    fn test_orphan_reasons() {
        let graph = sample_graph();
        let roots = RootSet::new().with_names(ComponentKind::View, ["Home"]);
        let report = OrphanDetector::report(&graph, &roots, &ExemptionRules::new());
        let reasons: Vec<(String, OrphanReason)> = report
            .orphans_of(ComponentKind::View)
            .map(|o| (o.id.name().to_string(), o.reason))
            .collect();
        assert_eq!(
            reasons,
            vec![
                ("Dead".to_string(), OrphanReason::Unreferenced),
                ("Gone".to_string(), OrphanReason::UnreachableFromRoots),
                ("Lonely".to_string(), OrphanReason::Isolated),
            ]
        );
        assert_eq!(report.orphan_count(), 3);
    }

    #[test]
    fn test_exemption_applies_after_reachability() {
        let mut graph = DependencyGraph::new();
        graph
            .add_node(component(ComponentKind::View, "Orders_Detail", &[("is_system_view", "Yes")]))
            .unwrap();
        let rules = ExemptionRules::new()
            .with_rule(ComponentKind::View, AttributePredicate::equals("is_system_view", "Yes"));

        let report = OrphanDetector::report(&graph, &RootSet::new(), &rules);
        assert_eq!(report.orphan_count(), 0);
        let view_findings = &report.by_kind[0];
        assert_eq!(view_findings.exempted.len(), 1);
        assert_eq!(view_findings.exempted[0].rule, "is_system_view = Yes");
    }

    #[test]
    fn test_roots_resolve_normalized_and_report_unknown() {
        let graph = sample_graph();
        let roots = RootSet::new().with_names(ComponentKind::View, ["home", "Nowhere"]);
        let (resolved, unknown) = OrphanDetector::resolve_roots(&graph, &roots);
        assert!(resolved.contains(&view_id("Home")));
        assert_eq!(
            unknown,
            vec![UnknownRoot {
                kind: ComponentKind::View,
                name: "Nowhere".to_string()
            }]
        );
    }

    #[test]
    fn test_selector_roots() {
        let mut graph = DependencyGraph::new();
        graph
            .add_node(component(ComponentKind::View, "Home", &[("category", "menu")]))
            .unwrap();
        graph
            .add_node(component(ComponentKind::View, "Hidden", &[("category", "ref")]))
            .unwrap();
        let (resolved, _) = OrphanDetector::resolve_roots(&graph, &RootSet::appsheet_defaults());
        assert_eq!(resolved, BTreeSet::from([view_id("Home")]));
    }

    #[test]
    fn test_inert_component_is_live_but_never_shown() {
        let mut graph = DependencyGraph::new();
        graph
            .add_node(component(ComponentKind::View, "Home", &[("show_if", "=FALSE")]))
            .unwrap();
        let roots = RootSet::new().with_names(ComponentKind::View, ["Home"]);
        let report = OrphanDetector::report(&graph, &roots, &ExemptionRules::new());
        assert_eq!(report.orphan_count(), 0);
        assert_eq!(report.by_kind[0].inert.len(), 1);
        assert_eq!(report.by_kind[0].inert[0].field, "show_if");
    }

    #[test]
    fn test_disabled_format_rule_is_inert() {
        let rule = component(ComponentKind::FormatRule, "Old", &[("is_disabled", "Yes")]);
        assert_eq!(OrphanDetector::inert_condition(&rule), Some(("is_disabled", "Yes")));
        let enabled = component(ComponentKind::FormatRule, "New", &[("condition", "[Late]")]);
        assert_eq!(OrphanDetector::inert_condition(&enabled), None);
    }

    #[test]
    fn test_placeholders_are_never_orphans() {
        let mut graph = DependencyGraph::new();
        graph.add_node(component(ComponentKind::View, "Home", &[])).unwrap();
        graph.add_edge(nav("Home", "Ghost")).unwrap();
        let orphans = OrphanDetector::find_orphans(
            &graph,
            ComponentKind::View,
            &BTreeSet::new(),
            &ExemptionRules::new(),
        );
        assert_eq!(orphans, BTreeSet::from([view_id("Home")]));
    }
}
