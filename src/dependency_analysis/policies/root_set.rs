use super::attribute_predicate::AttributePredicate;
use crate::dependency_analysis::domain::{Component, ComponentKind};
use std::collections::{BTreeMap, BTreeSet};

/// Entry points considered inherently live, per component kind
///
/// Roots are given either by name or by selector predicates over raw
/// fields (e.g. every view whose `category` is `primary`). Both are
/// configuration; nothing here is discovered from the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootSet {
    names: BTreeMap<ComponentKind, BTreeSet<String>>,
    selectors: BTreeMap<ComponentKind, Vec<AttributePredicate>>,
}

impl RootSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roots for an AppSheet app without explicit configuration
    ///
    /// Primary and menu views are what a user can open directly. Format
    /// rules are applied by the platform, so enabled rules are live.
    pub fn appsheet_defaults() -> Self {
        Self::new()
            .with_selector(
                ComponentKind::View,
                AttributePredicate::one_of("category", &["primary", "menu"]),
            )
            .with_selector(
                ComponentKind::FormatRule,
                AttributePredicate::not_equals("is_disabled", "Yes"),
            )
    }

    pub fn with_names<I, S>(mut self, kind: ComponentKind, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names
            .entry(kind)
            .or_default()
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_selector(mut self, kind: ComponentKind, selector: AttributePredicate) -> Self {
        self.selectors.entry(kind).or_default().push(selector);
        self
    }

    pub fn names(&self, kind: ComponentKind) -> impl Iterator<Item = &str> {
        self.names
            .get(&kind)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }

    pub fn selectors(&self, kind: ComponentKind) -> &[AttributePredicate] {
        self.selectors.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if a selector for the component's kind matches it
    pub fn selects(&self, component: &Component) -> bool {
        self.selectors(component.kind())
            .iter()
            .any(|selector| selector.matches(component))
    }

    pub fn is_empty(&self) -> bool {
        self.names.values().all(BTreeSet::is_empty) && self.selectors.values().all(Vec::is_empty)
    }
}
