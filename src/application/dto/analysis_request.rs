use crate::dependency_analysis::domain::{ComponentId, PathShape};
use crate::dependency_analysis::policies::{ExemptionRules, RootSet};
use crate::dependency_analysis::services::ChainTracer;
use std::path::PathBuf;

/// Default cap on paths collected per trace request
pub const DEFAULT_MAX_PATHS: usize = 1000;

/// One chain trace asked for by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRequest {
    pub shape: PathShape,
    pub start: ComponentId,
}

impl TraceRequest {
    pub fn new(shape: PathShape, start: ComponentId) -> Self {
        Self { shape, start }
    }
}

/// AnalysisRequest - Internal request DTO for the analysis use case
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Path to the record document
    pub input_path: PathBuf,
    pub roots: RootSet,
    pub exemptions: ExemptionRules,
    pub traces: Vec<TraceRequest>,
    /// Maximum hops per traced path
    pub max_depth: usize,
    /// Maximum paths kept per trace request
    pub max_paths: usize,
}

impl AnalysisRequest {
    /// Creates a request using AppSheet's default roots and exemptions
    pub fn new(input_path: PathBuf) -> Self {
        Self {
            input_path,
            roots: RootSet::appsheet_defaults(),
            exemptions: ExemptionRules::appsheet_defaults(),
            traces: Vec::new(),
            max_depth: ChainTracer::MAX_TRACE_DEPTH,
            max_paths: DEFAULT_MAX_PATHS,
        }
    }

    pub fn with_roots(mut self, roots: RootSet) -> Self {
        self.roots = roots;
        self
    }

    pub fn with_exemptions(mut self, exemptions: ExemptionRules) -> Self {
        self.exemptions = exemptions;
        self
    }

    pub fn with_trace(mut self, trace: TraceRequest) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = max_paths;
        self
    }
}
