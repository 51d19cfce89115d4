//! Read models for CQRS-lite pattern
//!
//! This module contains view-optimized structs that provide
//! a denormalized representation of analysis results for formatters.

pub mod analysis_read_model;
pub mod analysis_read_model_builder;
pub mod component_view;
pub mod diagnostics_view;
pub mod trace_view;

pub use analysis_read_model::{
    AnalysisMetadataView, AnalysisReadModel, CountView, GraphSummaryView,
};
pub use analysis_read_model_builder::AnalysisReadModelBuilder;
pub use component_view::{ComponentRefView, ExemptedView, InertView, KindFindingsView, OrphanView};
pub use diagnostics_view::{
    DanglingView, DiagnosticsView, ExternalTableView, SkippedRecordView, UnresolvedView,
};
pub use trace_view::{GroupFindingView, HopView, PathView, TraceView};
