pub mod analysis_metadata;
pub mod component;
pub mod dependency_graph;
pub mod diagnostics;
pub mod path;
pub mod record;
pub mod reference;
pub mod resolution;

pub use analysis_metadata::AnalysisMetadata;
pub use component::{Component, ComponentId, ComponentKind};
pub use dependency_graph::{DependencyGraph, EdgeInsertion};
pub use diagnostics::{
    DanglingTarget, Diagnostics, ExternalTableReference, SkippedRecord, UnknownRoot,
    UnresolvedReference,
};
pub use path::{Hop, Path, PathShape, Termination};
pub use record::{record, ComponentRecords, FieldValue, RawRecord};
pub use reference::{CandidateReference, EdgeKind, ExpectedKind, Mention, Qualifier, Reference};
pub use resolution::{ResolutionContext, ResolutionResult};
