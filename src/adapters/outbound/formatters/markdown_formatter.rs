use crate::application::read_models::{
    AnalysisMetadataView, AnalysisReadModel, ComponentRefView, DiagnosticsView, GraphSummaryView,
    GroupFindingView, KindFindingsView, TraceView,
};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

const SUMMARY_TABLE_HEADER: &str = "| Kind | Components | Orphans | Exempted | Inert |\n";
const SUMMARY_TABLE_SEPARATOR: &str = "|------|------------|---------|----------|-------|\n";

const ORPHAN_TABLE_HEADER: &str = "| Name | Reason |\n";
const ORPHAN_TABLE_SEPARATOR: &str = "|------|--------|\n";

const UNRESOLVED_TABLE_HEADER: &str = "| Component | Field | Mention | Expected | Candidates |\n";
const UNRESOLVED_TABLE_SEPARATOR: &str = "|-----------|-------|---------|----------|------------|\n";

/// MarkdownFormatter adapter rendering a human-readable analysis report
///
/// Sections appear in a fixed order: summary, orphans, inert and exempted
/// components, reference chains, column cycles, grouped actions and finally
/// diagnostics. Empty optional sections are omitted.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn plural(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
        if count == 1 {
            singular
        } else {
            plural
        }
    }

    fn describe(component: &ComponentRefView) -> String {
        format!(
            "{} `{}`",
            component.kind,
            Self::escape_markdown_table_cell(&component.name)
        )
    }
}

/// Helper methods for rendering sections
impl MarkdownFormatter {
    fn render_header(&self, output: &mut String, metadata: &AnalysisMetadataView) {
        output.push_str("# AppSheet Dependency Report\n\n");
        output.push_str(&format!(
            "Generated by {} {} on {} from `{}`.\n\n",
            metadata.tool_name, metadata.tool_version, metadata.timestamp, metadata.input
        ));
    }

    fn render_summary(
        &self,
        output: &mut String,
        summary: &GraphSummaryView,
        findings: &[KindFindingsView],
        roots: &[ComponentRefView],
    ) {
        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "The dependency graph has {} {} and {} {}, starting from {} {}.\n\n",
            summary.nodes,
            Self::plural(summary.nodes, "node", "nodes"),
            summary.edges,
            Self::plural(summary.edges, "edge", "edges"),
            roots.len(),
            Self::plural(roots.len(), "root", "roots"),
        ));

        output.push_str(SUMMARY_TABLE_HEADER);
        output.push_str(SUMMARY_TABLE_SEPARATOR);
        for kind in findings {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                kind.label,
                kind.total,
                kind.orphans.len(),
                kind.exempted.len(),
                kind.inert.len()
            ));
        }
        output.push('\n');

        if summary.dangling_targets > 0 {
            output.push_str(&format!(
                "{} {} referenced but never defined.\n\n",
                summary.dangling_targets,
                Self::plural(summary.dangling_targets, "component is", "components are"),
            ));
        }
    }

    fn render_orphans(&self, output: &mut String, findings: &[KindFindingsView]) {
        output.push_str("## Orphaned Components\n\n");
        output.push_str(
            "Components no root reaches through any reference chain, excluding exempted ones.\n\n",
        );

        if findings.iter().all(|kind| kind.orphans.is_empty()) {
            output.push_str("*No orphaned components*\n\n");
            return;
        }

        for kind in findings.iter().filter(|kind| !kind.orphans.is_empty()) {
            output.push_str(&format!("### {}\n\n", kind.label));
            output.push_str(ORPHAN_TABLE_HEADER);
            output.push_str(ORPHAN_TABLE_SEPARATOR);
            for orphan in &kind.orphans {
                output.push_str(&format!(
                    "| {} | {} |\n",
                    Self::escape_markdown_table_cell(&orphan.name),
                    orphan.reason
                ));
            }
            output.push('\n');
        }
    }

    fn render_inert(&self, output: &mut String, findings: &[KindFindingsView]) {
        if findings.iter().all(|kind| kind.inert.is_empty()) {
            return;
        }
        output.push_str("## Inert Components\n\n");
        output.push_str("Components whose condition can never be true.\n\n");
        output.push_str("| Kind | Name | Field | Condition |\n");
        output.push_str("|------|------|-------|-----------|\n");
        for kind in findings {
            for inert in &kind.inert {
                output.push_str(&format!(
                    "| {} | {} | {} | `{}` |\n",
                    kind.label,
                    Self::escape_markdown_table_cell(&inert.name),
                    inert.field,
                    Self::escape_markdown_table_cell(&inert.condition)
                ));
            }
        }
        output.push('\n');
    }

    fn render_exempted(&self, output: &mut String, findings: &[KindFindingsView]) {
        if findings.iter().all(|kind| kind.exempted.is_empty()) {
            return;
        }
        output.push_str("## Exempted Components\n\n");
        output.push_str("| Kind | Name | Rule |\n");
        output.push_str("|------|------|------|\n");
        for kind in findings {
            for exempted in &kind.exempted {
                output.push_str(&format!(
                    "| {} | {} | {} |\n",
                    kind.label,
                    Self::escape_markdown_table_cell(&exempted.name),
                    Self::escape_markdown_table_cell(&exempted.rule)
                ));
            }
        }
        output.push('\n');
    }

    fn render_traces(&self, output: &mut String, traces: &[TraceView]) {
        if traces.is_empty() {
            return;
        }
        output.push_str("## Reference Chains\n\n");
        for trace in traces {
            output.push_str(&format!(
                "### {} from {}\n\n",
                trace.shape.replace('_', " "),
                Self::describe(&trace.start)
            ));

            let walked: Vec<_> = trace.paths.iter().filter(|p| !p.hops.is_empty()).collect();
            if walked.is_empty() {
                output.push_str("*No outgoing references*\n\n");
                continue;
            }
            for (index, path) in walked.iter().enumerate() {
                output.push_str(&format!("{}. `{}`\n", index + 1, path.display));
            }
            if trace.limited {
                output.push_str(&format!(
                    "\n*Only the first {} paths are shown; raise --max-paths to see more.*\n",
                    trace.paths.len()
                ));
            }
            output.push('\n');
        }
    }

    fn render_column_cycles(&self, output: &mut String, cycles: &[Vec<String>]) {
        if cycles.is_empty() {
            return;
        }
        output.push_str("## Column Cycles\n\n");
        output.push_str("Columns whose formulas depend on each other in a loop.\n\n");
        for cycle in cycles {
            let mut names = cycle.clone();
            if let Some(first) = cycle.first() {
                names.push(first.clone());
            }
            output.push_str(&format!("- `{}`\n", names.join(" → ")));
        }
        output.push('\n');
    }

    fn render_group_findings(&self, output: &mut String, findings: &[GroupFindingView]) {
        if findings.is_empty() {
            return;
        }
        output.push_str("## Grouped Actions\n\n");
        output.push_str("Members that never run because an earlier member always navigates away.\n\n");
        for finding in findings {
            output.push_str(&format!(
                "- `{}`: {}\n",
                finding.group,
                finding
                    .unreachable_members
                    .iter()
                    .map(|member| format!("`{}`", member))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        output.push('\n');
    }

    fn render_diagnostics(&self, output: &mut String, diagnostics: &DiagnosticsView) {
        output.push_str("## Diagnostics\n\n");

        let total = diagnostics.unresolved.len()
            + diagnostics.dangling.len()
            + diagnostics.external_tables.len()
            + diagnostics.skipped_records.len()
            + diagnostics.unknown_roots.len();
        if total == 0 {
            output.push_str("*Every reference resolved*\n");
            return;
        }

        if !diagnostics.unresolved.is_empty() {
            output.push_str("### Unresolved References\n\n");
            output.push_str(UNRESOLVED_TABLE_HEADER);
            output.push_str(UNRESOLVED_TABLE_SEPARATOR);
            for unresolved in &diagnostics.unresolved {
                let candidates = if unresolved.candidates.is_empty() {
                    "not found".to_string()
                } else {
                    unresolved
                        .candidates
                        .iter()
                        .map(Self::describe)
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                output.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    Self::describe(&unresolved.from),
                    unresolved.field,
                    Self::escape_markdown_table_cell(&unresolved.mention),
                    unresolved.expected.join(" or "),
                    candidates
                ));
            }
            output.push('\n');
        }

        if !diagnostics.dangling.is_empty() {
            output.push_str("### Undefined Targets\n\n");
            for dangling in &diagnostics.dangling {
                output.push_str(&format!(
                    "- {} references {} via `{}`\n",
                    Self::describe(&dangling.from),
                    Self::describe(&dangling.to),
                    dangling.field
                ));
            }
            output.push('\n');
        }

        if !diagnostics.external_tables.is_empty() {
            output.push_str("### Data Table References\n\n");
            for external in &diagnostics.external_tables {
                output.push_str(&format!(
                    "- {} reads table `{}` via `{}`\n",
                    Self::describe(&external.from),
                    external.table,
                    external.field
                ));
            }
            output.push('\n');
        }

        if !diagnostics.skipped_records.is_empty() {
            output.push_str("### Skipped Records\n\n");
            for skipped in &diagnostics.skipped_records {
                output.push_str(&format!(
                    "- {} record #{}: {}\n",
                    skipped.kind, skipped.index, skipped.reason
                ));
            }
            output.push('\n');
        }

        if !diagnostics.unknown_roots.is_empty() {
            output.push_str("### Unknown Roots\n\n");
            for root in &diagnostics.unknown_roots {
                output.push_str(&format!("- {}\n", Self::describe(root)));
            }
            output.push('\n');
        }
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, model: &AnalysisReadModel) -> Result<String> {
        let mut output = String::new();

        self.render_header(&mut output, &model.metadata);
        self.render_summary(&mut output, &model.summary, &model.orphans, &model.roots);
        self.render_orphans(&mut output, &model.orphans);
        self.render_inert(&mut output, &model.orphans);
        self.render_exempted(&mut output, &model.orphans);
        self.render_traces(&mut output, &model.traces);
        self.render_column_cycles(&mut output, &model.column_cycles);
        self.render_group_findings(&mut output, &model.group_findings);
        self.render_diagnostics(&mut output, &model.diagnostics);

        Ok(output)
    }
}
