use crate::application::read_models::AnalysisReadModel;
use crate::shared::Result;

/// ReportFormatter port for rendering analysis reports
///
/// This port abstracts the formatting logic for the different report
/// formats (JSON, Markdown).
pub trait ReportFormatter {
    /// Formats the analysis read model
    ///
    /// # Arguments
    /// * `model` - Read model holding metadata, graph summary, orphans,
    ///   traces and diagnostics
    ///
    /// # Returns
    /// Formatted report content as a string
    ///
    /// # Errors
    /// Returns an error if formatting or serialization fails
    fn format(&self, model: &AnalysisReadModel) -> Result<String>;
}
