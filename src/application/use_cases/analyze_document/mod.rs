use crate::application::dto::{
    AnalysisRequest, AnalysisResponse, GroupFinding, TraceRequest, TraceResult,
};
use crate::dependency_analysis::domain::{
    ComponentId, ComponentRecords, DependencyGraph, Diagnostics, ExpectedKind, ResolutionContext,
    ResolutionResult,
};
use crate::dependency_analysis::services::reference_extractor::is_grouped_action;
use crate::dependency_analysis::services::{
    BuiltGraph, ChainTracer, GraphBuilder, MetadataGenerator, NameResolver, OrphanDetector,
    OrphanReport,
};
use crate::ports::outbound::{ProgressReporter, RecordSource};
use crate::shared::Result;

/// AnalyzeDocumentUseCase - Core use case for dependency analysis
///
/// Loads one record document, builds its dependency graph and runs the
/// orphan, trace and cycle queries against it.
///
/// # Type Parameters
/// * `RS` - RecordSource implementation
/// * `PR` - ProgressReporter implementation
pub struct AnalyzeDocumentUseCase<RS, PR> {
    record_source: RS,
    progress_reporter: PR,
}

impl<RS, PR> AnalyzeDocumentUseCase<RS, PR>
where
    RS: RecordSource,
    PR: ProgressReporter,
{
    /// Creates a new AnalyzeDocumentUseCase with injected dependencies
    pub fn new(record_source: RS, progress_reporter: PR) -> Self {
        Self {
            record_source,
            progress_reporter,
        }
    }

    /// Executes the analysis
    ///
    /// # Arguments
    /// * `request` - Input path, roots, exemptions and trace requests
    ///
    /// # Returns
    /// AnalysisResponse holding the graph, diagnostics and every query result
    ///
    /// # Errors
    /// Fails if the document cannot be loaded, two records share an
    /// identity, or a trace start names no component
    pub fn execute(&self, request: AnalysisRequest) -> Result<AnalysisResponse> {
        // Step 1: Load component records
        let records = self.load_records(&request)?;

        // Step 2: Build the dependency graph
        let BuiltGraph {
            graph,
            mut diagnostics,
        } = self.build_graph(&records)?;

        // Step 3: Report reference diagnostics
        self.report_diagnostics(&diagnostics);

        // Step 4: Resolve roots and detect orphans
        let orphans = self.detect_orphans(&graph, &request, &mut diagnostics);

        // Step 5: Run requested traces
        let traces = request
            .traces
            .iter()
            .map(|trace| self.run_trace(&graph, trace, &request))
            .collect::<Result<Vec<_>>>()?;

        // Step 6: Column cycles and unreachable grouped-action members
        let column_cycles = ChainTracer::column_cycles(&graph);
        if !column_cycles.is_empty() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: {} column formula cycle(s)",
                column_cycles.len()
            ));
        }
        let group_findings = Self::find_unreachable_members(&graph, request.max_depth);

        // Step 7: Stamp the run
        let metadata =
            MetadataGenerator::generate_default_metadata(&request.input_path.display().to_string());

        Ok(AnalysisResponse {
            graph,
            diagnostics,
            orphans,
            traces,
            column_cycles,
            group_findings,
            metadata,
        })
    }

    fn load_records(&self, request: &AnalysisRequest) -> Result<ComponentRecords> {
        self.progress_reporter.report(&format!(
            "📖 Loading component records from: {}",
            request.input_path.display()
        ));

        let records = self.record_source.load_records(&request.input_path)?;

        self.progress_reporter.report(&format!(
            "✅ Loaded {} component record(s)",
            records.total_records()
        ));
        Ok(records)
    }

    fn build_graph(&self, records: &ComponentRecords) -> Result<BuiltGraph> {
        let built = GraphBuilder::build_with_progress(records, |done, total| {
            self.progress_reporter
                .report_progress(done, total, Some("resolving references"));
        })?;

        self.progress_reporter.report(&format!(
            "🔗 Built dependency graph: {} node(s), {} edge(s)",
            built.graph.node_count(),
            built.graph.edge_count()
        ));
        Ok(built)
    }

    fn report_diagnostics(&self, diagnostics: &Diagnostics) {
        if !diagnostics.unresolved.is_empty() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: {} unresolved reference(s) ({} not found, {} ambiguous)",
                diagnostics.unresolved.len(),
                diagnostics.not_found_count(),
                diagnostics.collision_count()
            ));
        }
        if !diagnostics.dangling.is_empty() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: {} reference(s) to components without a record",
                diagnostics.dangling.len()
            ));
        }
        if !diagnostics.skipped_records.is_empty() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Skipped {} record(s) without a name",
                diagnostics.skipped_records.len()
            ));
        }
    }

    fn detect_orphans(
        &self,
        graph: &DependencyGraph,
        request: &AnalysisRequest,
        diagnostics: &mut Diagnostics,
    ) -> OrphanReport {
        let report = OrphanDetector::report(graph, &request.roots, &request.exemptions);

        for root in &report.unknown_roots {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Root {} '{}' did not match any component.",
                root.kind, root.name
            ));
        }
        diagnostics.unknown_roots = report.unknown_roots.clone();

        self.progress_reporter.report(&format!(
            "🧹 Found {} orphaned component(s)",
            report.orphan_count()
        ));
        report
    }

    fn run_trace(
        &self,
        graph: &DependencyGraph,
        trace: &TraceRequest,
        request: &AnalysisRequest,
    ) -> Result<TraceResult> {
        let start = Self::resolve_trace_start(graph, &trace.start);

        let mut paths: Vec<_> = ChainTracer::trace(graph, &start, trace.shape, request.max_depth)?
            .take(request.max_paths.saturating_add(1))
            .collect();
        let limited = paths.len() > request.max_paths;
        paths.truncate(request.max_paths);

        self.progress_reporter.report(&format!(
            "🧭 Traced {} {} path(s) from {} '{}'",
            paths.len(),
            trace.shape.as_str(),
            start.kind(),
            start.name()
        ));
        if limited {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Stopped after {} path(s); raise --max-paths to see more",
                request.max_paths
            ));
        }

        Ok(TraceResult {
            request: TraceRequest::new(trace.shape, start),
            paths,
            limited,
        })
    }

    /// Maps a user-typed start name onto a graph identity
    ///
    /// A name that resolves to exactly one component of the requested kind
    /// is used; anything else is passed through so the tracer can reject it.
    fn resolve_trace_start(graph: &DependencyGraph, start: &ComponentId) -> ComponentId {
        if graph.contains(start) {
            return start.clone();
        }
        let resolver = NameResolver::new(graph.components());
        match resolver.resolve(
            start.name(),
            &ExpectedKind::Exactly(start.kind()),
            &ResolutionContext::unqualified(),
        ) {
            ResolutionResult::Resolved(id) => id,
            _ => start.clone(),
        }
    }

    fn find_unreachable_members(graph: &DependencyGraph, max_depth: usize) -> Vec<GroupFinding> {
        graph
            .components()
            .filter(|component| is_grouped_action(component))
            .filter_map(|group| {
                let unreachable_members = ChainTracer::unreachable_members(graph, group.id(), max_depth);
                (!unreachable_members.is_empty()).then(|| GroupFinding {
                    group: group.id().clone(),
                    unreachable_members,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
