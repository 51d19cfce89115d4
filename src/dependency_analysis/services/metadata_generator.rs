use crate::dependency_analysis::domain::AnalysisMetadata;
use chrono::Utc;
use uuid::Uuid;

/// MetadataGenerator service stamping an analysis run
pub struct MetadataGenerator;

impl MetadataGenerator {
    /// Generates metadata with the current timestamp and a fresh run id
    ///
    /// # Arguments
    /// * `tool_name` - Name of the tool running the analysis
    /// * `tool_version` - Version of the tool
    /// * `input` - Display form of the analyzed document's path
    pub fn generate_metadata(tool_name: &str, tool_version: &str, input: &str) -> AnalysisMetadata {
        let timestamp = Utc::now().to_rfc3339();
        let run_id = format!("urn:uuid:{}", Uuid::new_v4());

        AnalysisMetadata::new(
            timestamp,
            tool_name.to_string(),
            tool_version.to_string(),
            run_id,
            input.to_string(),
        )
    }

    /// Generates metadata with this tool's name and compile-time version
    pub fn generate_default_metadata(input: &str) -> AnalysisMetadata {
        Self::generate_metadata("appsheet-deps", env!("CARGO_PKG_VERSION"), input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_metadata() {
        let metadata = MetadataGenerator::generate_metadata("test-tool", "1.0.0", "app.json");

        assert_eq!(metadata.tool_name(), "test-tool");
        assert_eq!(metadata.tool_version(), "1.0.0");
        assert_eq!(metadata.input(), "app.json");
        assert!(metadata.run_id().starts_with("urn:uuid:"));
        assert!(!metadata.timestamp().is_empty());
    }

    #[test]
    fn test_generate_default_metadata() {
        let metadata = MetadataGenerator::generate_default_metadata("app.json");

        assert_eq!(metadata.tool_name(), "appsheet-deps");
        assert_eq!(metadata.tool_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_run_ids_are_unique() {
        let first = MetadataGenerator::generate_default_metadata("a");
        let second = MetadataGenerator::generate_default_metadata("a");
        assert_ne!(first.run_id(), second.run_id());
    }
}
