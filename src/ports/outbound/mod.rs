/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, console).
pub mod output_presenter;
pub mod progress_reporter;
pub mod record_source;
pub mod report_formatter;

pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use record_source::RecordSource;
pub use report_formatter::ReportFormatter;
