use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;

/// The closed set of AppSheet component kinds found in a documentation export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    View,
    Column,
    Action,
    Slice,
    FormatRule,
}

impl ComponentKind {
    /// All kinds in canonical processing order
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::View,
        ComponentKind::Column,
        ComponentKind::Action,
        ComponentKind::Slice,
        ComponentKind::FormatRule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::View => "view",
            ComponentKind::Column => "column",
            ComponentKind::Action => "action",
            ComponentKind::Slice => "slice",
            ComponentKind::FormatRule => "format_rule",
        }
    }

    /// Title-case label for reports
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::View => "View",
            ComponentKind::Column => "Column",
            ComponentKind::Action => "Action",
            ComponentKind::Slice => "Slice",
            ComponentKind::FormatRule => "Format Rule",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "view" | "views" => Ok(ComponentKind::View),
            "column" | "columns" => Ok(ComponentKind::Column),
            "action" | "actions" => Ok(ComponentKind::Action),
            "slice" | "slices" => Ok(ComponentKind::Slice),
            "format_rule" | "format_rules" | "formatrule" => Ok(ComponentKind::FormatRule),
            _ => Err(format!(
                "Invalid component kind: {}. Expected one of view, column, action, slice, format_rule",
                s
            )),
        }
    }
}

/// Identity of a component: names are unique per kind, not globally
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId {
    kind: ComponentKind,
    name: String,
}

impl ComponentId {
    pub fn new(kind: ComponentKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)
    }
}

/// Builds the AppSheet unique identifier of a column, `Table[Column]`
pub fn column_identity(table: Option<&str>, column: &str) -> String {
    match table.map(str::trim).filter(|t| !t.is_empty()) {
        Some(table) => format!("{}[{}]", table, column.trim()),
        None => column.trim().to_string(),
    }
}

/// Splits a `Table[Column]` identifier; bare names have no table part
pub fn split_column_identity(identity: &str) -> (Option<&str>, &str) {
    if let Some(stripped) = identity.strip_suffix(']') {
        if let Some(open) = stripped.find('[') {
            let table = stripped[..open].trim();
            if !table.is_empty() {
                return (Some(table), stripped[open + 1..].trim());
            }
        }
    }
    (None, identity)
}

/// A canonical component record
///
/// `raw_fields` keeps every field label of the source record in document
/// order; extraction and exemption rules read from it by label.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    id: ComponentId,
    raw_fields: IndexMap<String, String>,
    source_table: Option<String>,
    record_index: Option<usize>,
}

impl Component {
    pub fn new(
        id: ComponentId,
        raw_fields: IndexMap<String, String>,
        source_table: Option<String>,
        record_index: Option<usize>,
    ) -> Self {
        Self {
            id,
            raw_fields,
            source_table,
            record_index,
        }
    }

    /// A stand-in node for a target that has no parsed record
    pub fn placeholder(id: ComponentId) -> Self {
        Self {
            id,
            raw_fields: IndexMap::new(),
            source_table: None,
            record_index: None,
        }
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn kind(&self) -> ComponentKind {
        self.id.kind()
    }

    pub fn name(&self) -> &str {
        self.id.name()
    }

    pub fn raw_fields(&self) -> &IndexMap<String, String> {
        &self.raw_fields
    }

    pub fn source_table(&self) -> Option<&str> {
        self.source_table.as_deref()
    }

    /// Position of the originating record within its kind's list
    pub fn record_index(&self) -> Option<usize> {
        self.record_index
    }

    /// Returns a field's trimmed text, treating blank values as absent
    pub fn field(&self, label: &str) -> Option<&str> {
        self.raw_fields
            .get(label)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Returns the first non-blank field among `labels`
    pub fn first_field(&self, labels: &[&str]) -> Option<&str> {
        labels.iter().find_map(|label| self.field(label))
    }

    /// Case-insensitive check of a Yes/No style flag
    pub fn flag(&self, label: &str) -> bool {
        self.field(label)
            .map(|v| matches!(v.to_lowercase().as_str(), "yes" | "true" | "y" | "1"))
            .unwrap_or(false)
    }

    /// For a column, the table it belongs to
    pub fn table(&self) -> Option<&str> {
        match self.kind() {
            ComponentKind::Column => split_column_identity(self.name()).0.or(self.source_table()),
            _ => self.source_table(),
        }
    }

    /// For a column, the column name without its table qualifier
    pub fn local_name(&self) -> &str {
        match self.kind() {
            ComponentKind::Column => split_column_identity(self.name()).1,
            _ => self.name(),
        }
    }
}
