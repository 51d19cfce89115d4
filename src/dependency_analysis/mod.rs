/// Dependency analysis core - pure graph construction, resolution and queries
///
/// Nothing in this module performs I/O; records come in, a graph and
/// diagnostics come out.
pub mod domain;
pub mod policies;
pub mod services;
