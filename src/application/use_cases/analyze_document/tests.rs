use super::*;
use crate::dependency_analysis::domain::{record, ComponentKind, PathShape};
use crate::dependency_analysis::policies::RootSet;
use crate::shared::error::AnalysisError;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

struct MockRecordSource {
    records: ComponentRecords,
}

impl RecordSource for MockRecordSource {
    fn load_records(&self, _path: &Path) -> Result<ComponentRecords> {
        Ok(self.records.clone())
    }
}

struct FailingRecordSource;

impl RecordSource for FailingRecordSource {
    fn load_records(&self, path: &Path) -> Result<ComponentRecords> {
        Err(AnalysisError::InputNotFound {
            path: path.to_path_buf(),
            suggestion: "missing".to_string(),
        }
        .into())
    }
}

#[derive(Default)]
struct RecordingProgressReporter {
    messages: RefCell<Vec<String>>,
    warnings: RefCell<Vec<String>>,
}

impl ProgressReporter for &RecordingProgressReporter {
    fn report(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
    fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
    fn report_error(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
    fn report_completion(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// A small order-taking app: one primary view, a grouped checkout action
/// whose second member never runs, and two virtual columns in a cycle
fn order_app() -> ComponentRecords {
    ComponentRecords::new()
        .with(
            ComponentKind::View,
            record([
                ("view_name", "Home"),
                ("category", "primary"),
                ("linked_view", "Orders List"),
                ("referenced_actions", "Checkout"),
            ]),
        )
        .with(
            ComponentKind::View,
            record([("view_name", "Orders List"), ("category", "ref")]),
        )
        .with(
            ComponentKind::View,
            record([("view_name", "Old Inventory"), ("category", "ref")]),
        )
        .with(
            ComponentKind::Action,
            record([
                ("action_name", "Checkout"),
                ("type", "Grouped: execute a sequence of actions"),
                ("members", "Go Confirm ||| Mark Paid"),
            ]),
        )
        .with(
            ComponentKind::Action,
            record([
                ("action_name", "Go Confirm"),
                ("type", "App: go to another view within this app"),
                ("navigate_target", "Orders List"),
            ]),
        )
        .with(
            ComponentKind::Action,
            record([
                ("action_name", "Mark Paid"),
                ("type", "Data: set the values of some columns in this row"),
                ("source_table", "Orders"),
            ]),
        )
        .with(
            ComponentKind::Column,
            record([
                ("table_name", "Orders"),
                ("column_name", "Total"),
                ("is_virtual", "Yes"),
                ("app_formula", "[Subtotal] + [Tax]"),
            ]),
        )
        .with(
            ComponentKind::Column,
            record([("table_name", "Orders"), ("column_name", "Subtotal")]),
        )
        .with(
            ComponentKind::Column,
            record([
                ("table_name", "Orders"),
                ("column_name", "Tax"),
                ("is_virtual", "Yes"),
                ("app_formula", "[Total] * 0.1"),
            ]),
        )
}

fn execute(records: ComponentRecords, request: AnalysisRequest) -> (Result<AnalysisResponse>, RecordingProgressReporter) {
    let reporter = RecordingProgressReporter::default();
    let result = {
        let use_case = AnalyzeDocumentUseCase::new(MockRecordSource { records }, &reporter);
        use_case.execute(request)
    };
    (result, reporter)
}

fn request() -> AnalysisRequest {
    AnalysisRequest::new(PathBuf::from("orders.yaml"))
}

#[test]
fn test_execute_builds_graph_and_reports_steps() {
    let (result, reporter) = execute(order_app(), request());
    let response = result.unwrap();

    assert_eq!(response.graph.node_count(), 9);
    let messages = reporter.messages.borrow();
    assert_eq!(messages[0], "📖 Loading component records from: orders.yaml");
    assert_eq!(messages[1], "✅ Loaded 9 component record(s)");
    assert!(messages[2].starts_with("🔗 Built dependency graph: 9 node(s)"));
    assert!(messages.iter().any(|m| m == "🧹 Found 3 orphaned component(s)"));
}

#[test]
fn test_execute_finds_orphans_with_default_policies() {
    let (result, _) = execute(order_app(), request());
    let response = result.unwrap();

    let views: Vec<_> = response.orphans.orphans_of(ComponentKind::View).collect();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].id.name(), "Old Inventory");

    let columns: Vec<&str> = response
        .orphans
        .orphans_of(ComponentKind::Column)
        .map(|o| o.id.name())
        .collect();
    assert_eq!(columns, vec!["Orders[Tax]", "Orders[Total]"]);
    assert!(response.orphans.orphans_of(ComponentKind::Action).next().is_none());
    assert!(response.has_orphans());
}

#[test]
fn test_execute_reports_external_table_not_unresolved() {
    let (result, reporter) = execute(order_app(), request());
    let response = result.unwrap();

    assert_eq!(response.diagnostics.external_tables.len(), 1);
    assert_eq!(response.diagnostics.external_tables[0].table, "Orders");
    assert!(response.diagnostics.unresolved.is_empty());
    assert!(!reporter
        .warnings
        .borrow()
        .iter()
        .any(|w| w.contains("unresolved")));
}

#[test]
fn test_execute_detects_column_cycle_and_unreachable_member() {
    let (result, reporter) = execute(order_app(), request());
    let response = result.unwrap();

    assert_eq!(response.column_cycles.len(), 1);
    assert_eq!(response.column_cycles[0].len(), 2);
    assert!(reporter
        .warnings
        .borrow()
        .iter()
        .any(|w| w.contains("1 column formula cycle(s)")));

    assert_eq!(response.group_findings.len(), 1);
    assert_eq!(response.group_findings[0].group.name(), "Checkout");
    assert_eq!(
        response.group_findings[0].unreachable_members,
        vec![ComponentId::new(ComponentKind::Action, "Mark Paid")]
    );
}

#[test]
fn test_execute_runs_navigation_trace() {
    let home = ComponentId::new(ComponentKind::View, "Home");
    let (result, _) = execute(
        order_app(),
        request().with_trace(TraceRequest::new(PathShape::Navigation, home)),
    );
    let response = result.unwrap();

    let trace = &response.traces[0];
    assert!(!trace.limited);
    let rendered: Vec<String> = trace.paths.iter().map(|p| p.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "Home → Orders List",
            "Home → Checkout → Go Confirm → Orders List"
        ]
    );
}

#[test]
fn test_execute_limits_paths_per_trace() {
    let home = ComponentId::new(ComponentKind::View, "Home");
    let (result, reporter) = execute(
        order_app(),
        request()
            .with_trace(TraceRequest::new(PathShape::Navigation, home))
            .with_max_paths(1),
    );
    let response = result.unwrap();

    assert_eq!(response.traces[0].paths.len(), 1);
    assert!(response.traces[0].limited);
    assert!(reporter
        .warnings
        .borrow()
        .iter()
        .any(|w| w.contains("raise --max-paths")));
}

#[test]
fn test_execute_resolves_trace_start_by_local_column_name() {
    let start = ComponentId::new(ComponentKind::Column, "total");
    let (result, _) = execute(
        order_app(),
        request().with_trace(TraceRequest::new(PathShape::ColumnDependency, start)),
    );
    let response = result.unwrap();

    let trace = &response.traces[0];
    assert_eq!(trace.request.start.name(), "Orders[Total]");
    assert!(trace.paths.iter().any(|p| p.is_cyclic()));
}

#[test]
fn test_execute_rejects_unknown_trace_start() {
    let start = ComponentId::new(ComponentKind::View, "Nowhere");
    let (result, _) = execute(
        order_app(),
        request().with_trace(TraceRequest::new(PathShape::Navigation, start)),
    );

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::InvalidTraceStart { .. })
    ));
}

#[test]
fn test_execute_records_unknown_roots() {
    let roots = RootSet::appsheet_defaults().with_names(ComponentKind::View, ["Dashboard"]);
    let (result, reporter) = execute(order_app(), request().with_roots(roots));
    let response = result.unwrap();

    assert_eq!(response.diagnostics.unknown_roots.len(), 1);
    assert_eq!(response.diagnostics.unknown_roots[0].name, "Dashboard");
    assert!(reporter
        .warnings
        .borrow()
        .iter()
        .any(|w| w.contains("Root view 'Dashboard' did not match any component.")));
}

#[test]
fn test_execute_propagates_load_failure() {
    let reporter = RecordingProgressReporter::default();
    let use_case = AnalyzeDocumentUseCase::new(FailingRecordSource, &reporter);

    let err = use_case.execute(request()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::InputNotFound { .. })
    ));
}

#[test]
fn test_execute_duplicate_identity_is_fatal() {
    let records = ComponentRecords::new()
        .with(ComponentKind::View, record([("view_name", "Home")]))
        .with(ComponentKind::View, record([("name", "Home")]));

    let (result, _) = execute(records, request());
    assert!(matches!(
        result.unwrap_err().downcast_ref::<AnalysisError>(),
        Some(AnalysisError::DuplicateIdentity { .. })
    ));
}
