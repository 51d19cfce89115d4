mod cli;

use appsheet_deps::adapters::outbound::console::StderrProgressReporter;
use appsheet_deps::adapters::outbound::filesystem::FileSystemReader;
use appsheet_deps::application::dto::AnalysisRequest;
use appsheet_deps::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use appsheet_deps::application::read_models::AnalysisReadModelBuilder;
use appsheet_deps::application::use_cases::AnalyzeDocumentUseCase;
use appsheet_deps::config::{self, AnalysisConfig};
use appsheet_deps::shared::error::ExitCode;
use appsheet_deps::shared::Result;
use clap::Parser;
use cli::Args;
use std::path::Path;
use std::process;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version land here too and are not failures
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    match run(args) {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = load_analysis_config(&args)?;

    // CLI flags take precedence over the config file
    let format = args.format.or(config.format).unwrap_or_default();
    let max_depth = args.max_depth.unwrap_or(config.max_trace_depth);
    let max_paths = args.max_paths.unwrap_or(config.max_paths);

    let request = args.trace_requests().into_iter().fold(
        AnalysisRequest::new(args.input.clone())
            .with_roots(config.roots)
            .with_exemptions(config.exemptions)
            .with_max_depth(max_depth)
            .with_max_paths(max_paths),
        AnalysisRequest::with_trace,
    );

    // Create adapters (Dependency Injection)
    let record_source = FileSystemReader::new();
    let progress_reporter = StderrProgressReporter::new();

    let use_case = AnalyzeDocumentUseCase::new(record_source, progress_reporter);
    let response = use_case.execute(request)?;

    eprintln!("{}", FormatterFactory::progress_message(format));

    let read_model = AnalysisReadModelBuilder::build(&response);
    let formatted_output = FormatterFactory::create(format).format(&read_model)?;

    let presenter = PresenterFactory::create(PresenterType::from_output(args.output));
    presenter.present(&formatted_output)?;

    if args.fail_on_orphans && response.has_orphans() {
        return Ok(ExitCode::OrphansDetected);
    }
    Ok(ExitCode::Success)
}

/// Explicit --config wins; otherwise look next to the input document
fn load_analysis_config(args: &Args) -> Result<AnalysisConfig> {
    let file = match &args.config {
        Some(path) => Some(config::load_config_from_path(path)?),
        None => config::discover_config(config_dir(&args.input))?,
    };

    match file {
        Some(file) => AnalysisConfig::from_file(&file),
        None => Ok(AnalysisConfig::appsheet_defaults()),
    }
}

fn config_dir(input: &Path) -> &Path {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
