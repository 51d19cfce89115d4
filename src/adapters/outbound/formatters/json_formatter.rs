use crate::application::read_models::AnalysisReadModel;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use serde::Serialize;

const REPORT_FORMAT: &str = "appsheet-deps";
const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct Report<'a> {
    #[serde(rename = "reportFormat")]
    report_format: &'static str,
    #[serde(rename = "schemaVersion")]
    schema_version: u32,
    #[serde(flatten)]
    model: &'a AnalysisReadModel,
}

/// JsonFormatter adapter rendering the read model as pretty-printed JSON
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, model: &AnalysisReadModel) -> Result<String> {
        let report = Report {
            report_format: REPORT_FORMAT,
            schema_version: SCHEMA_VERSION,
            model,
        };
        serde_json::to_string_pretty(&report).map_err(Into::into)
    }
}
