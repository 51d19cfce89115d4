//! Trace view structs for read model

use super::component_view::ComponentRefView;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TraceView {
    pub shape: String,
    pub start: ComponentRefView,
    /// Paths were cut at the configured maximum
    pub limited: bool,
    pub paths: Vec<PathView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathView {
    /// Component names from start to end
    pub components: Vec<String>,
    pub hops: Vec<HopView>,
    /// `leaf`, `cycle` or `depth_limit`
    pub termination: String,
    /// Rendered as `A → B → C`, with a cycle/truncation marker
    pub display: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HopView {
    pub from: ComponentRefView,
    pub to: ComponentRefView,
    pub edge_kind: String,
    pub field: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupFindingView {
    pub group: String,
    pub unreachable_members: Vec<String>,
}
