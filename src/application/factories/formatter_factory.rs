use crate::adapters::outbound::formatters::{JsonFormatter, MarkdownFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::ReportFormatter;

/// Factory for creating report formatters
///
/// Selects the formatter adapter for a requested output format, so the
/// binary only deals with the `ReportFormatter` port.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Examples
    /// ```
    /// use appsheet_deps::application::dto::OutputFormat;
    /// use appsheet_deps::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Markdown);
    /// ```
    pub fn create(format: OutputFormat) -> Box<dyn ReportFormatter> {
        match format {
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new()),
        }
    }

    /// Returns the progress message for the specified output format
    ///
    /// # Examples
    /// ```
    /// use appsheet_deps::application::dto::OutputFormat;
    /// use appsheet_deps::application::factories::FormatterFactory;
    ///
    /// let message = FormatterFactory::progress_message(OutputFormat::Json);
    /// assert_eq!(message, "📝 Generating JSON report...");
    /// ```
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => "📝 Generating JSON report...",
            OutputFormat::Markdown => "📝 Generating Markdown report...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::AnalysisResponse;
    use crate::application::read_models::AnalysisReadModelBuilder;
    use crate::dependency_analysis::domain::{record, ComponentKind, ComponentRecords};
    use crate::dependency_analysis::policies::{ExemptionRules, RootSet};
    use crate::dependency_analysis::services::{GraphBuilder, MetadataGenerator, OrphanDetector};

    fn sample_response() -> AnalysisResponse {
        let records = ComponentRecords::new()
            .with(ComponentKind::View, record([("view_name", "Home"), ("linked_view", "Old")]))
            .with(ComponentKind::View, record([("view_name", "Old")]));
        let built = GraphBuilder::build(&records).unwrap();
        let roots = RootSet::new().with_names(ComponentKind::View, ["Home"]);
        let orphans = OrphanDetector::report(&built.graph, &roots, &ExemptionRules::new());
        AnalysisResponse {
            graph: built.graph,
            diagnostics: built.diagnostics,
            orphans,
            traces: Vec::new(),
            column_cycles: Vec::new(),
            group_findings: Vec::new(),
            metadata: MetadataGenerator::generate_default_metadata("records.yaml"),
        }
    }

    #[test]
    fn test_created_formatters_render_their_format() {
        let model = AnalysisReadModelBuilder::build(&sample_response());

        let json = FormatterFactory::create(OutputFormat::Json)
            .format(&model)
            .unwrap();
        assert!(json.trim_start().starts_with('{'));

        let markdown = FormatterFactory::create(OutputFormat::Markdown)
            .format(&model)
            .unwrap();
        assert!(markdown.starts_with("# "));
    }

    #[test]
    fn test_progress_message_json() {
        assert_eq!(
            FormatterFactory::progress_message(OutputFormat::Json),
            "📝 Generating JSON report..."
        );
    }

    #[test]
    fn test_progress_message_markdown() {
        assert_eq!(
            FormatterFactory::progress_message(OutputFormat::Markdown),
            "📝 Generating Markdown report..."
        );
    }
}
