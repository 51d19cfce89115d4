use crate::dependency_analysis::domain::ComponentRecords;
use crate::ports::outbound::RecordSource;
use crate::shared::error::AnalysisError;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use std::path::Path;

/// Serialization formats a record document may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(DocumentFormat::Json),
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            "toml" => Some(DocumentFormat::Toml),
            _ => None,
        }
    }

    fn parse(self, content: &str) -> std::result::Result<ComponentRecords, String> {
        match self {
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Yaml => serde_yaml_ng::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// FileSystemReader adapter for loading record documents from disk
///
/// Implements the RecordSource port. The document format is chosen by file
/// extension; the file itself passes the checks in `shared::security`.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSource for FileSystemReader {
    fn load_records(&self, path: &Path) -> Result<ComponentRecords> {
        if !path.exists() {
            return Err(AnalysisError::InputNotFound {
                path: path.to_path_buf(),
                suggestion: format!(
                    "No file at \"{}\".\n   \
                     Export the app documentation as a record document and pass it with --input.",
                    path.display()
                ),
            }
            .into());
        }

        let format = DocumentFormat::from_path(path).ok_or_else(|| {
            AnalysisError::UnsupportedInputFormat {
                path: path.to_path_buf(),
            }
        })?;

        let content = read_regular_file(path, "record document")?;

        format.parse(&content).map_err(|details| {
            AnalysisError::InputParseError {
                path: path.to_path_buf(),
                details,
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_analysis::domain::{ComponentKind, FieldValue};
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_yaml_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "records.yaml",
            r#"
views:
  - view_name: Home
    category: primary
    linked_view: Details
  - view_name: Details
    is_system_view: false
columns:
  - table_name: Orders
    column_name: Total
    app_formula: "[Price] * [Qty]"
declared:
  view: [Archive]
tables: [Orders]
"#,
        );

        let records = FileSystemReader::new().load_records(&path).unwrap();
        assert_eq!(records.views.len(), 2);
        assert_eq!(records.columns.len(), 1);
        assert_eq!(
            records.views[1].get("is_system_view"),
            Some(&FieldValue::Flag(false))
        );
        assert_eq!(records.declared[&ComponentKind::View], vec!["Archive"]);
        assert_eq!(records.tables, vec!["Orders"]);
    }

    #[test]
    fn test_load_json_records_preserves_field_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "records.json",
            r#"{"actions": [{"action_name": "Go", "navigate_target": "Home", "do_this": "App: go to another view"}]}"#,
        );

        let records = FileSystemReader::new().load_records(&path).unwrap();
        let labels: Vec<&str> = records.actions[0].keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["action_name", "navigate_target", "do_this"]);
    }

    #[test]
    fn test_load_toml_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "records.toml",
            r#"
[[slices]]
slice_name = "Open Orders"
source_table = "Orders"
row_filter_condition = "[Status] = \"Open\""
"#,
        );

        let records = FileSystemReader::new().load_records(&path).unwrap();
        assert_eq!(records.slices.len(), 1);
    }

    #[test]
    fn test_missing_document_is_input_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.yaml");

        let err = FileSystemReader::new().load_records(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::InputNotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "records.csv", "view_name\nHome\n");

        let err = FileSystemReader::new().load_records(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported record document format"));
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "records.json", "{ not json");

        let err = FileSystemReader::new().load_records(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::InputParseError { .. })
        ));
    }
}
