//! Directed graph of components and the references between them
//!
//! Nodes are keyed by `ComponentId`; edges carry the full `Reference`, so two
//! references between the same pair with different kinds or field origins
//! are separate edges. The graph is filled during the build phase and only
//! queried afterwards: every query takes `&self`.

use super::component::{Component, ComponentId, ComponentKind};
use super::reference::Reference;
use crate::shared::error::AnalysisError;
use crate::shared::Result;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// What `add_edge` did with a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsertion {
    /// Both endpoints are parsed components
    Linked,
    /// The target has no record; a placeholder node stands in for it
    Dangling,
    /// An identical reference was already present
    Duplicate,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<Component, Reference>,
    node_map: HashMap<ComponentId, NodeIndex>,
    dangling: BTreeSet<ComponentId>,
    edge_keys: HashSet<Reference>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component node
    ///
    /// A placeholder created earlier for a dangling target is replaced by the
    /// real component.
    ///
    /// # Errors
    /// Returns `AnalysisError::DuplicateIdentity` if a parsed component with
    /// the same `(kind, name)` is already present
    pub fn add_node(&mut self, component: Component) -> Result<NodeIndex> {
        if let Some(&existing) = self.node_map.get(component.id()) {
            if self.dangling.remove(component.id()) {
                self.graph[existing] = component;
                return Ok(existing);
            }
            let first = &self.graph[existing];
            return Err(AnalysisError::DuplicateIdentity {
                kind: component.kind().to_string(),
                name: component.name().to_string(),
                first_index: first.record_index().unwrap_or_default(),
                second_index: component.record_index().unwrap_or_default(),
            }
            .into());
        }

        let id = component.id().clone();
        let index = self.graph.add_node(component);
        self.node_map.insert(id, index);
        Ok(index)
    }

    /// Adds a reference edge
    ///
    /// # Errors
    /// Returns `AnalysisError::UnknownEdgeSource` if `from` is not a node
    pub fn add_edge(&mut self, reference: Reference) -> Result<EdgeInsertion> {
        let from = *self.node_map.get(reference.from()).ok_or_else(|| {
            AnalysisError::UnknownEdgeSource {
                kind: reference.from().kind().to_string(),
                name: reference.from().name().to_string(),
            }
        })?;

        if self.edge_keys.contains(&reference) {
            return Ok(EdgeInsertion::Duplicate);
        }

        let to = match self.node_map.get(reference.to()) {
            Some(&index) => index,
            None => {
                let id = reference.to().clone();
                let index = self.graph.add_node(Component::placeholder(id.clone()));
                self.node_map.insert(id.clone(), index);
                self.dangling.insert(id);
                index
            }
        };

        let insertion = if self.dangling.contains(reference.to()) {
            EdgeInsertion::Dangling
        } else {
            EdgeInsertion::Linked
        };

        self.edge_keys.insert(reference.clone());
        self.graph.add_edge(from, to, reference);
        Ok(insertion)
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.node_map.contains_key(id)
    }

    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.node_map.get(id).map(|&index| &self.graph[index])
    }

    /// True for placeholder nodes standing in for targets without a record
    pub fn is_dangling(&self, id: &ComponentId) -> bool {
        self.dangling.contains(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All nodes, placeholders included, in insertion order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.graph.node_weights()
    }

    /// Parsed components of one kind, in insertion order
    pub fn components_of_kind(&self, kind: ComponentKind) -> Vec<&Component> {
        self.components()
            .filter(|c| c.kind() == kind && !self.is_dangling(c.id()))
            .collect()
    }

    /// All references in insertion order
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.graph.edge_weights()
    }

    /// Outgoing references of a node, in insertion order
    pub fn outgoing(&self, id: &ComponentId) -> Vec<&Reference> {
        self.adjacent(id, Direction::Outgoing)
    }

    /// Incoming references of a node, in insertion order
    pub fn incoming(&self, id: &ComponentId) -> Vec<&Reference> {
        self.adjacent(id, Direction::Incoming)
    }

    fn adjacent(&self, id: &ComponentId, direction: Direction) -> Vec<&Reference> {
        let Some(&index) = self.node_map.get(id) else {
            return Vec::new();
        };
        // petgraph walks adjacency lists newest-first
        let mut edges: Vec<_> = self.graph.edges_directed(index, direction).collect();
        edges.sort_by_key(|edge| edge.id());
        edges.into_iter().map(|edge| edge.weight()).collect()
    }

    /// Every component reachable from `roots`, the roots themselves included
    pub fn reachable_from(&self, roots: &BTreeSet<ComponentId>) -> BTreeSet<ComponentId> {
        self.traverse(roots, Direction::Outgoing)
    }

    /// Every component from which some member of `targets` is reachable
    pub fn reverse_reachable_from(&self, targets: &BTreeSet<ComponentId>) -> BTreeSet<ComponentId> {
        self.traverse(targets, Direction::Incoming)
    }

    fn traverse(&self, seeds: &BTreeSet<ComponentId>, direction: Direction) -> BTreeSet<ComponentId> {
        let mut reached: BTreeSet<ComponentId> = seeds.clone();
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut queue: VecDeque<NodeIndex> = seeds
            .iter()
            .filter_map(|id| self.node_map.get(id).copied())
            .collect();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            reached.insert(self.graph[current].id().clone());
            for next in self.graph.neighbors_directed(current, direction) {
                if !visited.contains(&next) {
                    queue.push_back(next);
                }
            }
        }

        reached
    }

    /// Parsed components of `kind` with no incoming edge of any kind
    pub fn unreferenced_of_kind(&self, kind: ComponentKind) -> BTreeSet<ComponentId> {
        self.graph
            .node_indices()
            .filter(|&index| {
                let component = &self.graph[index];
                component.kind() == kind
                    && !self.is_dangling(component.id())
                    && self
                        .graph
                        .neighbors_directed(index, Direction::Incoming)
                        .next()
                        .is_none()
            })
            .map(|index| self.graph[index].id().clone())
            .collect()
    }

    pub fn node_set(&self) -> BTreeSet<ComponentId> {
        self.node_map.keys().cloned().collect()
    }

    /// Canonical edge set, independent of insertion order
    pub fn edge_set(&self) -> BTreeSet<Reference> {
        self.references().cloned().collect()
    }

    /// Strongly connected components over the edges accepted by `filter`
    ///
    /// Each cycle is sorted; self-loops count as one-element cycles.
    pub fn cycles<F>(&self, filter: F) -> Vec<Vec<ComponentId>>
    where
        F: Fn(&Reference) -> bool,
    {
        // filter_map keeps every node, so indices stay valid for `self.graph`
        let filtered: DiGraph<(), ()> = self
            .graph
            .filter_map(|_, _| Some(()), |_, reference| filter(reference).then_some(()));
        let mut cycles: Vec<Vec<ComponentId>> = tarjan_scc(&filtered)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1
                    || scc.first().is_some_and(|&node| {
                        filtered.contains_edge(node, node)
                    })
            })
            .map(|scc| {
                let mut ids: Vec<ComponentId> =
                    scc.into_iter().map(|index| self.graph[index].id().clone()).collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }
}
