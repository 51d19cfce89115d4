use super::reference_extractor::is_navigate_action;
use crate::dependency_analysis::domain::{
    ComponentId, ComponentKind, DependencyGraph, EdgeKind, Hop, Path, PathShape, Reference,
    Termination,
};
use crate::dependency_analysis::policies::ConstantCondition;
use crate::shared::error::AnalysisError;
use crate::shared::Result;
use std::collections::HashSet;

/// ChainTracer service enumerating multi-hop reference chains
///
/// All walks are bounded: a per-path visited set stops cycles and a depth
/// guard stops pathological chains. The visited set is not shared between
/// branches, so a component may appear on several paths from one start.
pub struct ChainTracer;

impl ChainTracer {
    /// Default maximum number of hops in one path
    pub const MAX_TRACE_DEPTH: usize = 64;

    /// Lazily enumerates the paths of `shape` from `start`
    ///
    /// One path is produced per maximal branch, depth-first in edge
    /// insertion order. A start whose kind does not fit the shape yields a
    /// single empty path.
    ///
    /// # Errors
    /// Returns `AnalysisError::InvalidTraceStart` if `start` is not in the graph
    pub fn trace<'g>(
        graph: &'g DependencyGraph,
        start: &ComponentId,
        shape: PathShape,
        max_depth: usize,
    ) -> Result<PathIter<'g>> {
        if !graph.contains(start) {
            return Err(AnalysisError::InvalidTraceStart {
                kind: start.kind().to_string(),
                name: start.name().to_string(),
            }
            .into());
        }
        Ok(PathIter::new(graph, start.clone(), shape, max_depth.max(1)))
    }

    /// The leaf actions a grouped action runs, in execution order
    ///
    /// Nested groups are expanded in place; a group reached again through
    /// its own members is not expanded a second time. Groups nested deeper
    /// than `max_depth` are not expanded.
    pub fn expand_group(graph: &DependencyGraph, group: &ComponentId, max_depth: usize) -> Vec<ComponentId> {
        let mut leaves = Vec::new();
        let mut on_path = HashSet::from([group.clone()]);
        Self::expand_into(graph, group, &mut on_path, &mut leaves, 0, max_depth.max(1));
        leaves
    }

    fn expand_into(
        graph: &DependencyGraph,
        group: &ComponentId,
        on_path: &mut HashSet<ComponentId>,
        leaves: &mut Vec<ComponentId>,
        depth: usize,
        max_depth: usize,
    ) {
        if depth >= max_depth {
            return;
        }
        for reference in graph.outgoing(group) {
            if reference.edge_kind() != EdgeKind::GroupedActionMember {
                continue;
            }
            let member = reference.to();
            let is_group = graph
                .outgoing(member)
                .iter()
                .any(|r| r.edge_kind() == EdgeKind::GroupedActionMember);

            if !is_group {
                leaves.push(member.clone());
            } else if on_path.insert(member.clone()) {
                Self::expand_into(graph, member, on_path, leaves, depth + 1, max_depth);
                on_path.remove(member);
            }
        }
    }

    /// Members of a grouped action that can never run
    ///
    /// An unconditional navigate action leaves the current context, so every
    /// action after it in execution order is skipped.
    pub fn unreachable_members(
        graph: &DependencyGraph,
        group: &ComponentId,
        max_depth: usize,
    ) -> Vec<ComponentId> {
        let sequence = Self::expand_group(graph, group, max_depth);
        let first_exit = sequence.iter().position(|member| {
            graph.component(member).is_some_and(|action| {
                is_navigate_action(action)
                    && ConstantCondition::is_unconditional(action.field("only_if_condition"))
            })
        });

        match first_exit {
            Some(position) => sequence.into_iter().skip(position + 1).collect(),
            None => Vec::new(),
        }
    }

    /// Cycles among column formulas, each sorted, self-references included
    pub fn column_cycles(graph: &DependencyGraph) -> Vec<Vec<ComponentId>> {
        graph.cycles(|reference| PathShape::ColumnDependency.follows(reference))
    }
}

/// Lazy depth-first path enumeration; see `ChainTracer::trace`
pub struct PathIter<'g> {
    graph: &'g DependencyGraph,
    shape: PathShape,
    max_depth: usize,
    start: ComponentId,
    /// Remaining edges to try, one frame per component on the current path
    frames: Vec<std::vec::IntoIter<&'g Reference>>,
    hops: Vec<Hop>,
    on_path: HashSet<ComponentId>,
    pending_empty: bool,
}

impl<'g> PathIter<'g> {
    fn new(graph: &'g DependencyGraph, start: ComponentId, shape: PathShape, max_depth: usize) -> Self {
        let mut iter = Self {
            graph,
            shape,
            max_depth,
            start: start.clone(),
            frames: Vec::new(),
            hops: Vec::new(),
            on_path: HashSet::from([start.clone()]),
            pending_empty: false,
        };

        let children = if shape.start_kinds().contains(&start.kind()) {
            iter.children(&start)
        } else {
            Vec::new()
        };
        if children.is_empty() {
            iter.pending_empty = true;
        } else {
            iter.frames.push(children.into_iter());
        }
        iter
    }

    /// Followable edges out of `id`, one per distinct target
    fn children(&self, id: &ComponentId) -> Vec<&'g Reference> {
        let mut seen = HashSet::new();
        self.graph
            .outgoing(id)
            .into_iter()
            .filter(|reference| self.shape.follows(reference))
            .filter(|reference| !self.is_dead_end_action(reference.to()))
            .filter(|reference| seen.insert(reference.to().clone()))
            .collect()
    }

    /// Navigation through an action that leads nowhere is not a navigation path
    fn is_dead_end_action(&self, id: &ComponentId) -> bool {
        self.shape == PathShape::Navigation
            && id.kind() == ComponentKind::Action
            && !self
                .graph
                .outgoing(id)
                .iter()
                .any(|reference| self.shape.follows(reference))
    }

    fn path(&self, termination: Termination) -> Path {
        Path {
            start: self.start.clone(),
            hops: self.hops.clone(),
            termination,
        }
    }
}

impl Iterator for PathIter<'_> {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        if self.pending_empty {
            self.pending_empty = false;
            return Some(self.path(Termination::Leaf));
        }

        loop {
            let frame = self.frames.last_mut()?;
            let Some(reference) = frame.next() else {
                self.frames.pop();
                if let Some(hop) = self.hops.pop() {
                    self.on_path.remove(hop.target());
                }
                continue;
            };

            let target = reference.to().clone();
            self.hops.push(Hop {
                reference: reference.clone(),
            });

            if self.on_path.contains(&target) {
                let path = self.path(Termination::Cycle(target));
                self.hops.pop();
                return Some(path);
            }

            let children = self.children(&target);
            if children.is_empty() || self.hops.len() >= self.max_depth {
                let termination = if children.is_empty() {
                    Termination::Leaf
                } else {
                    Termination::DepthLimit
                };
                let path = self.path(termination);
                self.hops.pop();
                return Some(path);
            }

            self.on_path.insert(target);
            self.frames.push(children.into_iter());
        }
    }
}
