use super::component::{ComponentId, ComponentKind};
use std::fmt;

/// Label on a dependency edge, naming how one component refers to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// "Go to view" style reference (linked view, LINKTOVIEW, dashboard entry)
    Navigation,
    /// Target view or table of an action
    ActionTarget,
    /// Data source of a view, slice, action or rule
    SliceSource,
    /// Column mention inside a formula
    ColumnFormula,
    /// Column mention inside a format rule condition
    FormatRuleCondition,
    /// Member of a grouped action, in execution order
    GroupedActionMember,
    /// Action shown or fired by a view
    ViewAction,
    /// Column displayed by a view
    ViewColumn,
    /// Column or action styled by a format rule
    FormatTarget,
    /// Column or action exposed through a slice
    SliceMember,
    /// Action run by a non-grouped action (e.g. on a set of rows)
    ActionInvocation,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 11] = [
        EdgeKind::Navigation,
        EdgeKind::ActionTarget,
        EdgeKind::SliceSource,
        EdgeKind::ColumnFormula,
        EdgeKind::FormatRuleCondition,
        EdgeKind::GroupedActionMember,
        EdgeKind::ViewAction,
        EdgeKind::ViewColumn,
        EdgeKind::FormatTarget,
        EdgeKind::SliceMember,
        EdgeKind::ActionInvocation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Navigation => "navigation",
            EdgeKind::ActionTarget => "action_target",
            EdgeKind::SliceSource => "slice_source",
            EdgeKind::ColumnFormula => "column_formula",
            EdgeKind::FormatRuleCondition => "format_rule_condition",
            EdgeKind::GroupedActionMember => "grouped_action_member",
            EdgeKind::ViewAction => "view_action",
            EdgeKind::ViewColumn => "view_column",
            EdgeKind::FormatTarget => "format_target",
            EdgeKind::SliceMember => "slice_member",
            EdgeKind::ActionInvocation => "action_invocation",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved, directed dependency edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reference {
    from: ComponentId,
    to: ComponentId,
    edge_kind: EdgeKind,
    field_origin: String,
}

impl Reference {
    pub fn new(
        from: ComponentId,
        to: ComponentId,
        edge_kind: EdgeKind,
        field_origin: impl Into<String>,
    ) -> Self {
        Self {
            from,
            to,
            edge_kind,
            field_origin: field_origin.into(),
        }
    }

    pub fn from(&self) -> &ComponentId {
        &self.from
    }

    pub fn to(&self) -> &ComponentId {
        &self.to
    }

    pub fn edge_kind(&self) -> EdgeKind {
        self.edge_kind
    }

    pub fn field_origin(&self) -> &str {
        &self.field_origin
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -[{} via {}]-> {}",
            self.from, self.edge_kind, self.field_origin, self.to
        )
    }
}

/// How a column mention is qualified in formula text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Qualifier {
    /// `[Col]`: the context table applies
    None,
    /// `Table[Col]` or `Slice[Col]`
    Table(String),
    /// `[RefCol].[Col]`: the table referenced by `RefCol`
    Deref(String),
}

/// A textual mention of a component, before resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mention {
    pub text: String,
    pub qualifier: Qualifier,
}

impl Mention {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            qualifier: Qualifier::None,
        }
    }

    pub fn qualified(table: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            qualifier: Qualifier::Table(table.into()),
        }
    }

    pub fn dereferenced(ref_column: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            qualifier: Qualifier::Deref(ref_column.into()),
        }
    }
}

impl fmt::Display for Mention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Qualifier::None => write!(f, "{}", self.text),
            Qualifier::Table(table) => write!(f, "{}[{}]", table, self.text),
            Qualifier::Deref(column) => write!(f, "[{}].[{}]", column, self.text),
        }
    }
}

/// The kind (or kinds) a mention may refer to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedKind {
    Exactly(ComponentKind),
    /// The field is ambiguous, e.g. a format target may be a column or an action
    AnyOf(Vec<ComponentKind>),
}

impl ExpectedKind {
    pub fn kinds(&self) -> &[ComponentKind] {
        match self {
            ExpectedKind::Exactly(kind) => std::slice::from_ref(kind),
            ExpectedKind::AnyOf(kinds) => kinds,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        self.kinds().len() > 1
    }
}

/// An extracted, not-yet-resolved reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateReference {
    pub from: ComponentId,
    pub mention: Mention,
    pub expected: ExpectedKind,
    pub edge_kind: EdgeKind,
    pub field_origin: String,
    /// Table used to qualify bare column mentions
    pub context_table: Option<String>,
    /// When the target may be a data table instead of a slice
    pub table_fallback: bool,
}
