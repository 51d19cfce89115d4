//! Per-kind extraction of candidate references from raw record fields
//!
//! Each component kind has its own rule table mapping field labels to the
//! kind of reference the field carries. Rules are data; the same few
//! extraction strategies serve every kind.

use super::formula_scanner::FormulaScanner;
use crate::dependency_analysis::domain::record::LIST_DELIMITER;
use crate::dependency_analysis::domain::{
    CandidateReference, Component, ComponentKind, EdgeKind, ExpectedKind, Mention,
};
use crate::shared::Result;
use serde_json::Value;

/// Placeholder values AppSheet writes where no name was chosen
const SENTINELS: &[&str] = &["**auto**", "**none**"];

const ACTION_TYPE_FIELDS: &[&str] = &["type", "action_type", "action_type_plain_english"];

/// Fields listing the members of a grouped action
const GROUP_MEMBER_FIELDS: &[&str] = &["members", "referenced_actions"];

/// What a name-bearing field may point at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    View,
    Column,
    Action,
    /// A slice, or else a plain data table
    SliceOrTable,
    ColumnOrAction,
}

impl Target {
    fn expected(self) -> ExpectedKind {
        match self {
            Target::View => ExpectedKind::Exactly(ComponentKind::View),
            Target::Column => ExpectedKind::Exactly(ComponentKind::Column),
            Target::Action => ExpectedKind::Exactly(ComponentKind::Action),
            Target::SliceOrTable => ExpectedKind::Exactly(ComponentKind::Slice),
            Target::ColumnOrAction => {
                ExpectedKind::AnyOf(vec![ComponentKind::Column, ComponentKind::Action])
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmbeddedJson {
    ViewConfiguration,
    ActionProperties,
    TypeQualifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extraction {
    /// `|||`-separated names; a single name is a one-item list
    Names(Target),
    /// A view name, or a navigation expression naming views
    ViewOrExpression,
    /// Formula text: column mentions get the rule's edge kind, view
    /// mentions are navigation, qualifiers are slice sources
    Formula,
    Json(EmbeddedJson),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applies {
    Always,
    GroupedOnly,
    NonGroupedOnly,
}

#[derive(Debug, Clone, Copy)]
struct FieldRule {
    labels: &'static [&'static str],
    extraction: Extraction,
    edge_kind: EdgeKind,
    applies: Applies,
    /// Read only the first label that is present
    first_present: bool,
}

const fn rule(
    labels: &'static [&'static str],
    extraction: Extraction,
    edge_kind: EdgeKind,
) -> FieldRule {
    FieldRule {
        labels,
        extraction,
        edge_kind,
        applies: Applies::Always,
        first_present: false,
    }
}

const VIEW_RULES: &[FieldRule] = &[
    rule(
        &["navigation_target", "navigate_target", "linked_view"],
        Extraction::ViewOrExpression,
        EdgeKind::Navigation,
    ),
    rule(&["dashboard_view_entries"], Extraction::Names(Target::View), EdgeKind::Navigation),
    rule(
        &["referenced_actions", "event_actions"],
        Extraction::Names(Target::Action),
        EdgeKind::ViewAction,
    ),
    rule(&["view_columns"], Extraction::Names(Target::Column), EdgeKind::ViewColumn),
    rule(&["data_source"], Extraction::Names(Target::SliceOrTable), EdgeKind::SliceSource),
    rule(&["show_if"], Extraction::Formula, EdgeKind::ColumnFormula),
    rule(
        &["view_configuration"],
        Extraction::Json(EmbeddedJson::ViewConfiguration),
        EdgeKind::Navigation,
    ),
];

const ACTION_RULES: &[FieldRule] = &[
    rule(
        &["navigate_target", "target_view", "referenced_views"],
        Extraction::ViewOrExpression,
        EdgeKind::ActionTarget,
    ),
    rule(
        &["target_table", "referenced_table"],
        Extraction::Names(Target::SliceOrTable),
        EdgeKind::ActionTarget,
    ),
    FieldRule {
        labels: GROUP_MEMBER_FIELDS,
        extraction: Extraction::Names(Target::Action),
        edge_kind: EdgeKind::GroupedActionMember,
        applies: Applies::GroupedOnly,
        first_present: true,
    },
    FieldRule {
        labels: &["referenced_actions"],
        extraction: Extraction::Names(Target::Action),
        edge_kind: EdgeKind::ActionInvocation,
        applies: Applies::NonGroupedOnly,
        first_present: false,
    },
    rule(&["source_table"], Extraction::Names(Target::SliceOrTable), EdgeKind::SliceSource),
    rule(&["only_if_condition"], Extraction::Formula, EdgeKind::ColumnFormula),
    rule(&["attach_to_column"], Extraction::Names(Target::Column), EdgeKind::ColumnFormula),
    rule(
        &["with_these_properties"],
        Extraction::Json(EmbeddedJson::ActionProperties),
        EdgeKind::ActionTarget,
    ),
];

const SLICE_RULES: &[FieldRule] = &[
    rule(&["source_table"], Extraction::Names(Target::SliceOrTable), EdgeKind::SliceSource),
    rule(&["row_filter_condition"], Extraction::Formula, EdgeKind::ColumnFormula),
    rule(&["slice_columns"], Extraction::Names(Target::Column), EdgeKind::SliceMember),
    rule(&["slice_actions"], Extraction::Names(Target::Action), EdgeKind::SliceMember),
];

const COLUMN_RULES: &[FieldRule] = &[
    rule(
        &[
            "app_formula",
            "initial_value",
            "valid_if",
            "show_if",
            "required_if",
            "editable_if",
            "reset_if",
            "suggested_values",
            "formula",
            "expression",
        ],
        Extraction::Formula,
        EdgeKind::ColumnFormula,
    ),
    rule(
        &["type_qualifier"],
        Extraction::Json(EmbeddedJson::TypeQualifier),
        EdgeKind::ColumnFormula,
    ),
];

const FORMAT_RULE_RULES: &[FieldRule] = &[
    rule(&["condition"], Extraction::Formula, EdgeKind::FormatRuleCondition),
    rule(
        &["formatted_columns", "formatted_actions"],
        Extraction::Names(Target::ColumnOrAction),
        EdgeKind::FormatTarget,
    ),
    rule(&["source_table"], Extraction::Names(Target::SliceOrTable), EdgeKind::SliceSource),
];

fn rules_for(kind: ComponentKind) -> &'static [FieldRule] {
    match kind {
        ComponentKind::View => VIEW_RULES,
        ComponentKind::Column => COLUMN_RULES,
        ComponentKind::Action => ACTION_RULES,
        ComponentKind::Slice => SLICE_RULES,
        ComponentKind::FormatRule => FORMAT_RULE_RULES,
    }
}

/// True for an action that runs a list of other actions
pub fn is_grouped_action(component: &Component) -> bool {
    component.kind() == ComponentKind::Action
        && ACTION_TYPE_FIELDS
            .iter()
            .filter_map(|label| component.field(label))
            .map(str::to_lowercase)
            .any(|value| value.starts_with("grouped") || value.contains("group of actions"))
}

/// True for an action that moves the user to another view
pub fn is_navigate_action(component: &Component) -> bool {
    component.kind() == ComponentKind::Action
        && (component.field("navigate_target").is_some()
            || ACTION_TYPE_FIELDS
                .iter()
                .filter_map(|label| component.field(label))
                .map(str::to_lowercase)
                .any(|value| value == "navigate" || value.contains("go to another view")))
}

/// Splits a `|||` list, dropping blanks and placeholder values
pub fn split_names(text: &str) -> impl Iterator<Item = &str> {
    text.split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|item| !item.is_empty() && !is_sentinel(item))
}

fn is_sentinel(text: &str) -> bool {
    SENTINELS.iter().any(|s| s.eq_ignore_ascii_case(text))
}

/// ReferenceExtractor service producing candidate references per component
pub struct ReferenceExtractor {
    scanner: FormulaScanner,
}

impl ReferenceExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            scanner: FormulaScanner::new()?,
        })
    }

    /// Lazily extracts candidate references from a component's fields
    ///
    /// Candidates come out in rule order, then field order, then textual
    /// order within a field. Calling again restarts from the beginning.
    pub fn extract<'a>(
        &'a self,
        component: &'a Component,
    ) -> impl Iterator<Item = CandidateReference> + 'a {
        let grouped = is_grouped_action(component);
        rules_for(component.kind())
            .iter()
            .filter(move |rule| match rule.applies {
                Applies::Always => true,
                Applies::GroupedOnly => grouped,
                Applies::NonGroupedOnly => !grouped,
            })
            .flat_map(move |rule| {
                let present = rule
                    .labels
                    .iter()
                    .filter_map(move |label| component.field(label).map(|text| (rule, *label, text)));
                present.take(if rule.first_present { 1 } else { usize::MAX })
            })
            .flat_map(move |(rule, label, text)| self.apply(component, rule, label, text, grouped))
    }

    fn apply(
        &self,
        component: &Component,
        rule: &FieldRule,
        label: &str,
        text: &str,
        grouped: bool,
    ) -> Vec<CandidateReference> {
        let emit = Emitter { component, origin: label };
        match rule.extraction {
            Extraction::Names(target) => split_names(text)
                .map(|name| emit.candidate(Mention::plain(name), target, rule.edge_kind))
                .collect(),
            Extraction::ViewOrExpression => self.view_or_expression(&emit, text, rule.edge_kind),
            Extraction::Formula => self.formula(&emit, text, rule.edge_kind),
            Extraction::Json(layout) => match serde_json::from_str::<Value>(text) {
                Ok(json) => self.embedded(&emit, layout, &json, grouped),
                Err(_) => Vec::new(),
            },
        }
    }

    fn view_or_expression(&self, emit: &Emitter<'_>, text: &str, edge_kind: EdgeKind) -> Vec<CandidateReference> {
        if self.scanner.has_navigation(text) {
            return self
                .scanner
                .view_targets(text)
                .into_iter()
                .map(|view| emit.candidate(Mention::plain(view), Target::View, edge_kind))
                .collect();
        }
        if looks_like_expression(text) {
            return self.formula(emit, text, EdgeKind::ColumnFormula);
        }
        split_names(text)
            .map(|view| emit.candidate(Mention::plain(view), Target::View, edge_kind))
            .collect()
    }

    fn formula(&self, emit: &Emitter<'_>, text: &str, column_edge: EdgeKind) -> Vec<CandidateReference> {
        let mentions = self.scanner.scan(text);
        let qualifiers = mentions
            .qualifiers
            .into_iter()
            .map(|q| emit.candidate(Mention::plain(q), Target::SliceOrTable, EdgeKind::SliceSource));
        let columns = mentions
            .columns
            .into_iter()
            .map(|m| emit.candidate(m, Target::Column, column_edge));
        let views = mentions
            .views
            .into_iter()
            .map(|v| emit.candidate(Mention::plain(v), Target::View, EdgeKind::Navigation));
        columns.chain(qualifiers).chain(views).collect()
    }

    fn embedded(
        &self,
        emit: &Emitter<'_>,
        layout: EmbeddedJson,
        json: &Value,
        grouped: bool,
    ) -> Vec<CandidateReference> {
        let names = |items: Vec<&str>, target: Target, edge_kind: EdgeKind| {
            items
                .into_iter()
                .flat_map(split_names)
                .map(|name| emit.candidate(Mention::plain(name), target, edge_kind))
                .collect::<Vec<_>>()
        };

        match layout {
            EmbeddedJson::ViewConfiguration => {
                let mut found = names(strings(json.get("ColumnOrder")), Target::Column, EdgeKind::ViewColumn);
                found.extend(names(
                    field_of_each(json.get("ViewEntries"), "ViewName"),
                    Target::View,
                    EdgeKind::Navigation,
                ));
                found.extend(names(
                    strings(json.get("ActionBarEntries")),
                    Target::Action,
                    EdgeKind::ViewAction,
                ));
                found.extend(names(
                    field_of_each(json.get("Events"), "EventAction"),
                    Target::Action,
                    EdgeKind::ViewAction,
                ));
                found
            }
            EmbeddedJson::ActionProperties => {
                let mut found = Vec::new();
                // A plain member list takes precedence over the embedded one
                let has_member_field = emit.component.first_field(GROUP_MEMBER_FIELDS).is_some();
                if grouped && !has_member_field {
                    found.extend(names(
                        field_of_each(json.get("Actions"), "ActionName"),
                        Target::Action,
                        EdgeKind::GroupedActionMember,
                    ));
                }
                found.extend(names(
                    strings(json.get("ReferencedAction")),
                    Target::Action,
                    EdgeKind::ActionInvocation,
                ));
                for target in strings(json.get("NavigateTarget")) {
                    found.extend(self.view_or_expression(emit, target, EdgeKind::ActionTarget));
                }
                found.extend(names(
                    strings(json.get("ReferencedTable")),
                    Target::SliceOrTable,
                    EdgeKind::ActionTarget,
                ));
                found
            }
            EmbeddedJson::TypeQualifier => {
                let mut texts = Vec::new();
                collect_strings(json, &mut texts);
                texts
                    .into_iter()
                    .flat_map(|text| self.formula(emit, text, EdgeKind::ColumnFormula))
                    .collect()
            }
        }
    }
}

/// Builds candidates from one field of one component
struct Emitter<'a> {
    component: &'a Component,
    origin: &'a str,
}

impl Emitter<'_> {
    fn candidate(&self, mention: Mention, target: Target, edge_kind: EdgeKind) -> CandidateReference {
        CandidateReference {
            from: self.component.id().clone(),
            mention,
            expected: target.expected(),
            edge_kind,
            field_origin: self.origin.to_string(),
            context_table: self.component.table().map(str::to_string),
            table_fallback: target == Target::SliceOrTable,
        }
    }
}

fn looks_like_expression(text: &str) -> bool {
    text.starts_with('=') || text.contains('(') || text.contains('[')
}

/// A JSON string, or every string in a JSON array
fn strings(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::String(text)) => vec![text.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// `key` of every object in a JSON array
fn field_of_each<'a>(value: Option<&'a Value>, key: &str) -> Vec<&'a str> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get(key).and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(text) => out.push(text),
        Value::Array(items) => items.iter().for_each(|item| collect_strings(item, out)),
        Value::Object(map) => map.values().for_each(|item| collect_strings(item, out)),
        _ => {}
    }
}
