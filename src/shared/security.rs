use crate::shared::error::AnalysisError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of a record document or config file (100 MB)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validates that a path is not a symbolic link
///
/// Uses `symlink_metadata()` so the link itself is inspected, not its target.
///
/// # Arguments
/// * `path` - The path to validate
/// * `operation` - Description of the operation (e.g., "read", "write") for error messages
///
/// # Errors
/// Returns an error if the path is a symbolic link or if metadata cannot be read
pub fn validate_not_symlink(path: &Path, operation: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read metadata for {} operation on {}: {}",
            operation,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        return Err(AnalysisError::SecurityError {
            path: path.to_path_buf(),
            reason: format!("{} operations on symbolic links are not allowed", operation),
            hint: "Point the tool at the real file instead of a link".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Validates file size is within acceptable limits
///
/// # Arguments
/// * `file_size` - The size of the file in bytes
/// * `path` - The path to the file (for error messages)
/// * `max_size` - Maximum allowed size in bytes
///
/// # Errors
/// Returns an error if the file size exceeds the maximum
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        return Err(AnalysisError::SecurityError {
            path: path.to_path_buf(),
            reason: format!(
                "file is too large ({} bytes). Maximum allowed size is {} bytes",
                file_size, max_size
            ),
            hint: "Split the documentation export or remove unrelated sections".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Reads a whole file as UTF-8 after the symlink, file-type and size checks
///
/// # Arguments
/// * `path` - File to read
/// * `file_description` - Human-readable description used in error messages
///   (e.g., "record document", "config file")
///
/// # Errors
/// Returns an error if any security check fails or the file cannot be read
pub fn read_regular_file(path: &Path, file_description: &str) -> Result<String> {
    validate_not_symlink(path, "read")?;

    let metadata = fs::metadata(path).map_err(|e| AnalysisError::FileReadError {
        path: path.to_path_buf(),
        details: format!("Failed to read {} metadata: {}", file_description, e),
    })?;

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    validate_file_size(metadata.len(), path, MAX_FILE_SIZE)?;

    fs::read_to_string(path).map_err(|e| {
        AnalysisError::FileReadError {
            path: path.to_path_buf(),
            details: format!("Failed to read {}: {}", file_description, e),
        }
        .into()
    })
}
