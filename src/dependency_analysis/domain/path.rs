use super::component::{ComponentId, ComponentKind};
use super::reference::{EdgeKind, Reference};
use std::fmt;

/// Multi-hop path shapes the chain tracer can enumerate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathShape {
    Navigation,
    GroupedActionExpansion,
    ColumnDependency,
}

impl PathShape {
    /// Whether an edge may be followed by this shape
    pub fn follows(&self, reference: &Reference) -> bool {
        match self {
            PathShape::Navigation => matches!(
                reference.edge_kind(),
                EdgeKind::Navigation
                    | EdgeKind::ActionTarget
                    | EdgeKind::ViewAction
                    | EdgeKind::GroupedActionMember
            ),
            PathShape::GroupedActionExpansion => {
                reference.edge_kind() == EdgeKind::GroupedActionMember
            }
            PathShape::ColumnDependency => {
                reference.edge_kind() == EdgeKind::ColumnFormula
                    && reference.from().kind() == ComponentKind::Column
                    && reference.to().kind() == ComponentKind::Column
            }
        }
    }

    /// Kinds a trace of this shape may start from
    pub fn start_kinds(&self) -> &'static [ComponentKind] {
        match self {
            PathShape::Navigation => &[ComponentKind::View, ComponentKind::Action],
            PathShape::GroupedActionExpansion => &[ComponentKind::Action],
            PathShape::ColumnDependency => &[ComponentKind::Column],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PathShape::Navigation => "navigation",
            PathShape::GroupedActionExpansion => "grouped_action_expansion",
            PathShape::ColumnDependency => "column_dependency",
        }
    }
}

impl fmt::Display for PathShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One step of a path: the edge taken and where it lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    pub reference: Reference,
}

impl Hop {
    pub fn target(&self) -> &ComponentId {
        self.reference.to()
    }
}

/// Why a path stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The last component has no outgoing edges of the traced shape
    Leaf,
    /// The last hop returned to this component, already on the path
    Cycle(ComponentId),
    /// The depth guard stopped the walk
    DepthLimit,
}

/// An ordered chain of references from a start component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub start: ComponentId,
    pub hops: Vec<Hop>,
    pub termination: Termination,
}

impl Path {
    pub fn is_cyclic(&self) -> bool {
        matches!(self.termination, Termination::Cycle(_))
    }

    pub fn is_truncated(&self) -> bool {
        self.termination == Termination::DepthLimit
    }

    /// Start followed by every hop target
    pub fn components(&self) -> Vec<&ComponentId> {
        std::iter::once(&self.start)
            .chain(self.hops.iter().map(Hop::target))
            .collect()
    }

    pub fn last(&self) -> &ComponentId {
        self.hops.last().map(Hop::target).unwrap_or(&self.start)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.components().iter().map(|id| id.name()).collect();
        write!(f, "{}", names.join(" → "))?;
        match &self.termination {
            Termination::Leaf => Ok(()),
            Termination::Cycle(_) => write!(f, " (cycle)"),
            Termination::DepthLimit => write!(f, " (truncated)"),
        }
    }
}
