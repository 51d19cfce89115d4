//! appsheet-deps - dependency analysis for AppSheet documentation exports
//!
//! This library reads the component records of an AppSheet app (views,
//! columns, actions, slices and format rules), builds a typed dependency
//! graph from their names and formulas, and reports orphaned components,
//! reference chains and column formula cycles. It follows hexagonal
//! architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`dependency_analysis`): Graph model, policies and analysis services
//! - **Application Layer** (`application`): Use cases, DTOs and read models
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use appsheet_deps::prelude::*;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<()> {
//! // Create adapters
//! let record_source = FileSystemReader::new();
//! let progress_reporter = StderrProgressReporter::new();
//!
//! // Create use case
//! let use_case = AnalyzeDocumentUseCase::new(record_source, progress_reporter);
//!
//! // Execute
//! let request = AnalysisRequest::new(PathBuf::from("records.yaml"));
//! let response = use_case.execute(request)?;
//!
//! // Format output
//! let read_model = AnalysisReadModelBuilder::build(&response);
//! let output = MarkdownFormatter::new().format(&read_model)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod dependency_analysis;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, MarkdownFormatter};
    pub use crate::application::dto::{
        AnalysisRequest, AnalysisResponse, OutputFormat, TraceRequest,
    };
    pub use crate::application::read_models::{AnalysisReadModel, AnalysisReadModelBuilder};
    pub use crate::application::use_cases::AnalyzeDocumentUseCase;
    pub use crate::ports::outbound::{
        OutputPresenter, ProgressReporter, RecordSource, ReportFormatter,
    };
    pub use crate::dependency_analysis::domain::{
        Component, ComponentId, ComponentKind, ComponentRecords, DependencyGraph, EdgeKind,
        Path, PathShape,
    };
    pub use crate::dependency_analysis::policies::{AttributePredicate, ExemptionRules, RootSet};
    pub use crate::dependency_analysis::services::{
        ChainTracer, GraphBuilder, NameResolver, OrphanDetector,
    };
    pub use crate::shared::Result;
}
