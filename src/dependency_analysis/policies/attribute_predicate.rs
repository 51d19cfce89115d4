use crate::dependency_analysis::domain::{Component, FieldValue};
use serde::Deserialize;

/// Declarative predicate over a component's raw fields
///
/// Used both to select root components and to exempt components from orphan
/// detection. Field comparisons are trimmed and case-insensitive, and a
/// missing field reads as the empty string. Name predicates compare the
/// component name exactly.
///
/// In YAML each variant is written by its distinguishing key:
///
/// ```yaml
/// - field: is_system_view
///   equals: "Yes"
/// - name_starts_with: "Related "
/// - all_of:
///     - field: is_virtual
///       equals: true
///     - field: app_formula
///       contains: "REF_ROWS("
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttributePredicate {
    AllOf { all_of: Vec<AttributePredicate> },
    AnyOf { any_of: Vec<AttributePredicate> },
    NameStartsWith { name_starts_with: String },
    NameEndsWith { name_ends_with: String },
    Equals { field: String, equals: FieldValue },
    NotEquals { field: String, not_equals: FieldValue },
    OneOf { field: String, one_of: Vec<FieldValue> },
    Contains { field: String, contains: String },
    Present { field: String, present: bool },
}

impl AttributePredicate {
    pub fn equals(field: &str, value: &str) -> Self {
        AttributePredicate::Equals {
            field: field.to_string(),
            equals: FieldValue::from(value),
        }
    }

    pub fn not_equals(field: &str, value: &str) -> Self {
        AttributePredicate::NotEquals {
            field: field.to_string(),
            not_equals: FieldValue::from(value),
        }
    }

    pub fn one_of(field: &str, values: &[&str]) -> Self {
        AttributePredicate::OneOf {
            field: field.to_string(),
            one_of: values.iter().map(|v| FieldValue::from(*v)).collect(),
        }
    }

    pub fn contains(field: &str, needle: &str) -> Self {
        AttributePredicate::Contains {
            field: field.to_string(),
            contains: needle.to_string(),
        }
    }

    pub fn name_starts_with(prefix: &str) -> Self {
        AttributePredicate::NameStartsWith {
            name_starts_with: prefix.to_string(),
        }
    }

    pub fn matches(&self, component: &Component) -> bool {
        match self {
            AttributePredicate::AllOf { all_of } => all_of.iter().all(|p| p.matches(component)),
            AttributePredicate::AnyOf { any_of } => any_of.iter().any(|p| p.matches(component)),
            AttributePredicate::NameStartsWith { name_starts_with } => {
                component.local_name().starts_with(name_starts_with.as_str())
            }
            AttributePredicate::NameEndsWith { name_ends_with } => {
                component.local_name().ends_with(name_ends_with.as_str())
            }
            AttributePredicate::Equals { field, equals } => {
                field_text(component, field) == fold(&equals.to_text())
            }
            AttributePredicate::NotEquals { field, not_equals } => {
                field_text(component, field) != fold(&not_equals.to_text())
            }
            AttributePredicate::OneOf { field, one_of } => {
                let actual = field_text(component, field);
                one_of.iter().any(|v| fold(&v.to_text()) == actual)
            }
            AttributePredicate::Contains { field, contains } => {
                field_text(component, field).contains(&fold(contains))
            }
            AttributePredicate::Present { field, present } => {
                !field_text(component, field).is_empty() == *present
            }
        }
    }

    /// Human-readable form used in reports
    pub fn describe(&self) -> String {
        match self {
            AttributePredicate::AllOf { all_of } => format!("all of ({})", join(all_of)),
            AttributePredicate::AnyOf { any_of } => format!("any of ({})", join(any_of)),
            AttributePredicate::NameStartsWith { name_starts_with } => {
                format!("name starts with '{}'", name_starts_with)
            }
            AttributePredicate::NameEndsWith { name_ends_with } => {
                format!("name ends with '{}'", name_ends_with)
            }
            AttributePredicate::Equals { field, equals } => {
                format!("{} = {}", field, equals.to_text())
            }
            AttributePredicate::NotEquals { field, not_equals } => {
                format!("{} <> {}", field, not_equals.to_text())
            }
            AttributePredicate::OneOf { field, one_of } => {
                let values: Vec<String> = one_of.iter().map(FieldValue::to_text).collect();
                format!("{} in [{}]", field, values.join(", "))
            }
            AttributePredicate::Contains { field, contains } => {
                format!("{} contains '{}'", field, contains)
            }
            AttributePredicate::Present { field, present: true } => format!("{} is set", field),
            AttributePredicate::Present { field, present: false } => {
                format!("{} is blank", field)
            }
        }
    }

    /// Checks the predicate is well-formed
    ///
    /// # Errors
    /// Returns a message naming the first empty field label or empty combinator
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            AttributePredicate::AllOf { all_of: nested } | AttributePredicate::AnyOf { any_of: nested } => {
                if nested.is_empty() {
                    return Err("all_of/any_of must contain at least one predicate".to_string());
                }
                nested.iter().try_for_each(AttributePredicate::validate)
            }
            AttributePredicate::NameStartsWith { .. } | AttributePredicate::NameEndsWith { .. } => Ok(()),
            AttributePredicate::Equals { field, .. }
            | AttributePredicate::NotEquals { field, .. }
            | AttributePredicate::OneOf { field, .. }
            | AttributePredicate::Contains { field, .. }
            | AttributePredicate::Present { field, .. } => {
                if field.trim().is_empty() {
                    Err("predicate 'field' must not be empty".to_string())
                } else {
                    Ok(())
                }
            }
        }
    }
}

fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

fn field_text(component: &Component, field: &str) -> String {
    match component.field(field) {
        Some(value) => fold(value),
        None if field == "name" => fold(component.name()),
        None => String::new(),
    }
}

fn join(predicates: &[AttributePredicate]) -> String {
    predicates
        .iter()
        .map(AttributePredicate::describe)
        .collect::<Vec<_>>()
        .join(", ")
}
