/// Type alias for Result with anyhow::Error as the error type.
/// Typed failures are raised as `AnalysisError` and converted with `?`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
