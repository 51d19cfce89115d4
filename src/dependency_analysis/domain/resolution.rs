use super::component::ComponentId;
use super::reference::Qualifier;
use std::collections::BTreeSet;

static NO_QUALIFIER: Qualifier = Qualifier::None;

/// Outcome of resolving one textual mention
///
/// Callers must handle every arm; there is no "best guess" variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    Resolved(ComponentId),
    /// More than one component matched at the same precedence level
    Unresolved(BTreeSet<ComponentId>),
    NotFound,
}

impl ResolutionResult {
    pub fn resolved(&self) -> Option<&ComponentId> {
        match self {
            ResolutionResult::Resolved(id) => Some(id),
            _ => None,
        }
    }

    /// The candidate set to report when resolution did not succeed
    pub fn candidates(&self) -> BTreeSet<ComponentId> {
        match self {
            ResolutionResult::Resolved(id) => BTreeSet::from([id.clone()]),
            ResolutionResult::Unresolved(ids) => ids.clone(),
            ResolutionResult::NotFound => BTreeSet::new(),
        }
    }
}

/// Where a mention was found, used to qualify column names
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    pub table: Option<&'a str>,
    pub qualifier: &'a Qualifier,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(table: Option<&'a str>, qualifier: &'a Qualifier) -> Self {
        Self { table, qualifier }
    }

    pub fn unqualified() -> ResolutionContext<'static> {
        ResolutionContext {
            table: None,
            qualifier: &NO_QUALIFIER,
        }
    }
}
