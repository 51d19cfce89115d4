pub mod chain_tracer;
pub mod formula_scanner;
pub mod graph_builder;
pub mod metadata_generator;
pub mod name_resolver;
pub mod orphan_detector;
pub mod reference_extractor;

pub use chain_tracer::{ChainTracer, PathIter};
pub use formula_scanner::{FormulaMentions, FormulaScanner};
pub use graph_builder::{BuiltGraph, GraphBuilder};
pub use metadata_generator::MetadataGenerator;
pub use name_resolver::NameResolver;
pub use orphan_detector::{
    ExemptedComponent, InertComponent, KindFindings, Orphan, OrphanDetector, OrphanReason,
    OrphanReport,
};
pub use reference_extractor::ReferenceExtractor;
