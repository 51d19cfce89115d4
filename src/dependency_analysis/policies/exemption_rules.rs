use super::attribute_predicate::AttributePredicate;
use crate::dependency_analysis::domain::{Component, ComponentKind};
use std::collections::BTreeMap;

/// Per-kind predicates that keep a component out of the orphan set
///
/// Rules are evaluated after reachability, so an exempt component that is
/// unreachable is still reported, just as exempt rather than orphaned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExemptionRules {
    rules: BTreeMap<ComponentKind, Vec<AttributePredicate>>,
}

impl ExemptionRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// AppSheet's built-in exceptions
    ///
    /// - system views and system-generated actions are created per table by the platform
    /// - physical columns hold data whether or not anything reads them
    /// - `Related ...` columns with `REF_ROWS(` are generated reverse references
    /// - label columns are used implicitly to display rows
    pub fn appsheet_defaults() -> Self {
        Self::new()
            .with_rule(ComponentKind::View, AttributePredicate::equals("is_system_view", "Yes"))
            .with_rule(
                ComponentKind::View,
                AttributePredicate::equals("is_system_generated", "Yes"),
            )
            .with_rule(
                ComponentKind::Action,
                AttributePredicate::equals("is_system_generated", "Yes"),
            )
            .with_rule(ComponentKind::Column, AttributePredicate::not_equals("is_virtual", "Yes"))
            .with_rule(
                ComponentKind::Column,
                AttributePredicate::AllOf {
                    all_of: vec![
                        AttributePredicate::name_starts_with("Related "),
                        AttributePredicate::contains("app_formula", "REF_ROWS("),
                    ],
                },
            )
            .with_rule(ComponentKind::Column, AttributePredicate::equals("is_label", "Yes"))
    }

    pub fn with_rule(mut self, kind: ComponentKind, rule: AttributePredicate) -> Self {
        self.rules.entry(kind).or_default().push(rule);
        self
    }

    pub fn rules(&self, kind: ComponentKind) -> &[AttributePredicate] {
        self.rules.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first rule exempting this component, if any
    pub fn exempting_rule(&self, component: &Component) -> Option<&AttributePredicate> {
        self.rules(component.kind())
            .iter()
            .find(|rule| rule.matches(component))
    }

    pub fn is_exempt(&self, component: &Component) -> bool {
        self.exempting_rule(component).is_some()
    }
}
