//! Raw component records as produced by the documentation parser
//!
//! A record is an ordered map from field label to value. Values arrive as
//! strings, flags, numbers or lists depending on the export format; they are
//! flattened into AppSheet's textual conventions before the engine sees them.

use super::component::{column_identity, split_column_identity, Component, ComponentId, ComponentKind};
use super::diagnostics::SkippedRecord;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Delimiter AppSheet uses for list-valued fields in its documentation
pub const LIST_DELIMITER: &str = "|||";

/// A raw field value before flattening to text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Integer(i64),
    Number(f64),
    List(Vec<FieldValue>),
    Empty(()),
}

impl FieldValue {
    /// Flattens the value the way the documentation export renders it
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Flag(true) => "Yes".to_string(),
            FieldValue::Flag(false) => "No".to_string(),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::List(items) => items
                .iter()
                .map(FieldValue::to_text)
                .filter(|item| !item.trim().is_empty())
                .collect::<Vec<_>>()
                .join(LIST_DELIMITER),
            FieldValue::Empty(()) => String::new(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::List(values.into_iter().map(FieldValue::from).collect())
    }
}

/// One record: field label to raw value, in document order
pub type RawRecord = IndexMap<String, FieldValue>;

/// Builds a record from label/value pairs
pub fn record<K, V, I>(fields: I) -> RawRecord
where
    K: Into<String>,
    V: Into<FieldValue>,
    I: IntoIterator<Item = (K, V)>,
{
    fields
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Input to the engine: ordered records per component kind
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComponentRecords {
    pub views: Vec<RawRecord>,
    pub columns: Vec<RawRecord>,
    pub actions: Vec<RawRecord>,
    pub slices: Vec<RawRecord>,
    pub format_rules: Vec<RawRecord>,
    /// Names listed by the app summary without a detailed record
    pub declared: BTreeMap<ComponentKind, Vec<String>>,
    /// Known data tables (tables are not components)
    pub tables: Vec<String>,
}

impl ComponentRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record, returning self for chaining
    pub fn with(mut self, kind: ComponentKind, record: RawRecord) -> Self {
        self.records_mut(kind).push(record);
        self
    }

    pub fn records_of(&self, kind: ComponentKind) -> &[RawRecord] {
        match kind {
            ComponentKind::View => &self.views,
            ComponentKind::Column => &self.columns,
            ComponentKind::Action => &self.actions,
            ComponentKind::Slice => &self.slices,
            ComponentKind::FormatRule => &self.format_rules,
        }
    }

    fn records_mut(&mut self, kind: ComponentKind) -> &mut Vec<RawRecord> {
        match kind {
            ComponentKind::View => &mut self.views,
            ComponentKind::Column => &mut self.columns,
            ComponentKind::Action => &mut self.actions,
            ComponentKind::Slice => &mut self.slices,
            ComponentKind::FormatRule => &mut self.format_rules,
        }
    }

    pub fn total_records(&self) -> usize {
        ComponentKind::ALL
            .iter()
            .map(|kind| self.records_of(*kind).len())
            .sum()
    }

    /// Converts every record into a component, in kind order then document order
    ///
    /// # Returns
    /// The components plus one `SkippedRecord` per record that carries no name
    pub fn to_components(&self) -> (Vec<Component>, Vec<SkippedRecord>) {
        let mut components = Vec::with_capacity(self.total_records());
        let mut skipped = Vec::new();

        for kind in ComponentKind::ALL {
            for (index, raw) in self.records_of(kind).iter().enumerate() {
                match to_component(kind, index, raw) {
                    Some(component) => components.push(component),
                    None => skipped.push(SkippedRecord {
                        kind,
                        index,
                        reason: format!("no {} field", name_fields(kind).join(" or ")),
                    }),
                }
            }
        }

        (components, skipped)
    }

    /// Known table names: the explicit list plus every column's table
    pub fn known_tables(&self, components: &[Component]) -> Vec<String> {
        let mut tables: Vec<String> = self.tables.iter().map(|t| t.trim().to_string()).collect();
        for component in components {
            if component.kind() == ComponentKind::Column {
                if let Some(table) = component.table() {
                    tables.push(table.to_string());
                }
            }
        }
        tables.sort();
        tables.dedup();
        tables.retain(|t| !t.is_empty());
        tables
    }
}

/// Field labels carrying the component name, in priority order
pub fn name_fields(kind: ComponentKind) -> &'static [&'static str] {
    match kind {
        ComponentKind::View => &["view_name", "name"],
        ComponentKind::Column => &["column_name", "name"],
        ComponentKind::Action => &["action_name", "name"],
        ComponentKind::Slice => &["slice_name", "name"],
        ComponentKind::FormatRule => &["rule_name", "name"],
    }
}

fn source_table_fields(kind: ComponentKind) -> &'static [&'static str] {
    match kind {
        ComponentKind::View => &["data_source", "source_table"],
        ComponentKind::Column => &["table_name", "source_table"],
        _ => &["source_table"],
    }
}

fn to_component(kind: ComponentKind, index: usize, raw: &RawRecord) -> Option<Component> {
    let fields: IndexMap<String, String> = raw
        .iter()
        .map(|(label, value)| (label.clone(), value.to_text()))
        .collect();

    let first = |labels: &[&str]| -> Option<String> {
        labels
            .iter()
            .filter_map(|label| fields.get(*label))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .map(str::to_string)
    };

    let source_table = first(source_table_fields(kind));

    let name = match kind {
        ComponentKind::Column => match first(&["column_name"]) {
            Some(column) => Some(column_identity(source_table.as_deref(), &column)),
            None => first(&["unique_identifier", "name"]),
        },
        _ => first(name_fields(kind)),
    }?;

    // A column identified only by `Table[Column]` still knows its table
    let source_table = match (kind, source_table) {
        (ComponentKind::Column, None) => split_column_identity(&name).0.map(str::to_string),
        (_, table) => table,
    };

    Some(Component::new(
        ComponentId::new(kind, name),
        fields,
        source_table,
        Some(index),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_flattening() {
        assert_eq!(FieldValue::from("Home").to_text(), "Home");
        assert_eq!(FieldValue::Flag(true).to_text(), "Yes");
        assert_eq!(FieldValue::Integer(3).to_text(), "3");
        assert_eq!(FieldValue::from(vec!["SendA", "", "SendB"]).to_text(), "SendA|||SendB");
        assert_eq!(FieldValue::Empty(()).to_text(), "");
    }

    #[test]
    fn test_deserialize_mixed_value_types_from_json() {
        let json = r#"{
            "views": [{"name": "Home", "is_system_view": false, "view_columns": ["A", "B"]}],
            "actions": [{"name": "Go", "position": 2, "only_if_condition": null}]
        }"#;
        let records: ComponentRecords = serde_json::from_str(json).unwrap();
        assert_eq!(records.views.len(), 1);
        assert_eq!(records.views[0]["is_system_view"].to_text(), "No");
        assert_eq!(records.views[0]["view_columns"].to_text(), "A|||B");
        assert_eq!(records.actions[0]["only_if_condition"].to_text(), "");
    }

    #[test]
    fn test_deserialize_yaml_with_declared_names() {
        let yaml = r#"
views:
  - view_name: Home
declared:
  view: [Archive]
tables: [Orders]
"#;
        let records: ComponentRecords = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(records.declared[&ComponentKind::View], vec!["Archive"]);
        assert_eq!(records.tables, vec!["Orders"]);
    }

    #[test]
    fn test_name_aliases_per_kind() {
        let records = ComponentRecords::new()
            .with(ComponentKind::View, record([("view_name", "Home"), ("name", "ignored")]))
            .with(ComponentKind::Action, record([("name", "Send")]))
            .with(ComponentKind::FormatRule, record([("rule_name", "Late")]));

        let (components, skipped) = records.to_components();
        let names: Vec<&str> = components.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Home", "Send", "Late"]);
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_column_gets_table_qualified_identity() {
        let records = ComponentRecords::new().with(
            ComponentKind::Column,
            record([("table_name", "Orders"), ("column_name", "Price")]),
        );
        let (components, _) = records.to_components();
        assert_eq!(components[0].name(), "Orders[Price]");
        assert_eq!(components[0].source_table(), Some("Orders"));
    }

    #[test]
    fn test_column_from_unique_identifier_only() {
        let records = ComponentRecords::new().with(
            ComponentKind::Column,
            record([("unique_identifier", "Orders[Total]")]),
        );
        let (components, _) = records.to_components();
        assert_eq!(components[0].name(), "Orders[Total]");
        assert_eq!(components[0].source_table(), Some("Orders"));
    }

    #[test]
    fn test_nameless_record_is_skipped_not_fatal() {
        let records = ComponentRecords::new()
            .with(ComponentKind::Slice, record([("source_table", "Orders")]))
            .with(ComponentKind::Slice, record([("slice_name", "Open Orders")]));

        let (components, skipped) = records.to_components();
        assert_eq!(components.len(), 1);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].kind, ComponentKind::Slice);
        assert_eq!(skipped[0].index, 0);
    }

    #[test]
    fn test_known_tables_merges_explicit_and_column_tables() {
        let mut records = ComponentRecords::new().with(
            ComponentKind::Column,
            record([("table_name", "Orders"), ("column_name", "Id")]),
        );
        records.tables = vec!["Customers".to_string(), "Orders".to_string()];
        let (components, _) = records.to_components();
        assert_eq!(records.known_tables(&components), vec!["Customers", "Orders"]);
    }
}
