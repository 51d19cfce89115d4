/// AnalysisMetadata value object identifying one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisMetadata {
    timestamp: String,
    tool_name: String,
    tool_version: String,
    run_id: String,
    input: String,
}

impl AnalysisMetadata {
    pub fn new(
        timestamp: String,
        tool_name: String,
        tool_version: String,
        run_id: String,
        input: String,
    ) -> Self {
        Self {
            timestamp,
            tool_name,
            tool_version,
            run_id,
            input,
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// The record document the run analyzed
    pub fn input(&self) -> &str {
        &self.input
    }
}
