use crate::dependency_analysis::domain::ComponentRecords;
use crate::shared::Result;
use std::path::Path;

/// RecordSource port for loading component records
///
/// This port abstracts where the structured records of an exported
/// AppSheet documentation come from (a JSON/YAML/TOML file, a fixture,
/// an in-memory mock).
pub trait RecordSource {
    /// Loads the component records of one document
    ///
    /// # Arguments
    /// * `path` - Path to the record document
    ///
    /// # Returns
    /// The records per component kind, in document order
    ///
    /// # Errors
    /// Returns an error if:
    /// - The document does not exist or cannot be read
    /// - The document format is not supported
    /// - The document content cannot be parsed
    fn load_records(&self, path: &Path) -> Result<ComponentRecords>;
}
