use crate::ports::outbound::OutputPresenter;
use crate::shared::error::AnalysisError;
use crate::shared::security::validate_not_symlink;
use crate::shared::Result;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// FileSystemWriter adapter for writing the report to a file
///
/// The parent directory must already exist and an existing target must not
/// be a symbolic link. The report is written to a temporary file in the same
/// directory and renamed into place, so readers never see a partial report.
pub struct FileSystemWriter {
    output_path: PathBuf,
}

impl FileSystemWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    fn write_error(&self, details: String) -> AnalysisError {
        AnalysisError::FileWriteError {
            path: self.output_path.clone(),
            details,
        }
    }

    /// The directory the report lands in, which must already exist
    fn parent_directory(&self) -> Result<&Path> {
        let parent = match self.output_path.parent() {
            Some(parent) if parent != Path::new("") => parent,
            _ => Path::new("."),
        };
        if !parent.is_dir() {
            return Err(self
                .write_error(format!(
                    "Parent directory does not exist: {}",
                    parent.display()
                ))
                .into());
        }
        Ok(parent)
    }
}

impl OutputPresenter for FileSystemWriter {
    fn present(&self, content: &str) -> Result<()> {
        let parent = self.parent_directory()?;
        if fs::symlink_metadata(&self.output_path).is_ok() {
            validate_not_symlink(&self.output_path, "write")?;
        }

        let mut staged =
            NamedTempFile::new_in(parent).map_err(|e| self.write_error(e.to_string()))?;
        staged
            .write_all(content.as_bytes())
            .map_err(|e| self.write_error(e.to_string()))?;
        staged
            .persist(&self.output_path)
            .map_err(|e| self.write_error(e.error.to_string()))?;

        eprintln!("✅ Output complete: {}", self.output_path.display());
        Ok(())
    }
}

/// StdoutPresenter adapter for writing the report to stdout
pub struct StdoutPresenter;

impl StdoutPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPresenter for StdoutPresenter {
    fn present(&self, content: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| anyhow::anyhow!("Failed to write to stdout: {}", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_writer_success() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("report.json");

        let writer = FileSystemWriter::new(output_path.clone());
        writer.present("{}").unwrap();

        assert_eq!(fs::read_to_string(&output_path).unwrap(), "{}");
    }

    #[test]
    fn test_file_writer_overwrites_existing_report() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("report.md");
        fs::write(&output_path, "old").unwrap();

        FileSystemWriter::new(output_path.clone())
            .present("new")
            .unwrap();

        assert_eq!(fs::read_to_string(&output_path).unwrap(), "new");
    }

    #[test]
    fn test_file_writer_parent_directory_not_found() {
        let output_path = PathBuf::from("/nonexistent/directory/report.md");

        let result = FileSystemWriter::new(output_path).present("content");

        let err_string = result.unwrap_err().to_string();
        assert!(err_string.contains("Parent directory does not exist"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_writer_rejects_symlink_target() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("real.md");
        let link = temp_dir.path().join("report.md");
        fs::write(&target, "keep").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let result = FileSystemWriter::new(link).present("overwrite");

        assert!(result.unwrap_err().to_string().contains("Security violation"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "keep");
    }

    #[test]
    fn test_stdout_presenter_success() {
        assert!(StdoutPresenter::new().present("report\n").is_ok());
    }
}
