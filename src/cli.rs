use clap::Parser;
use std::path::PathBuf;

use appsheet_deps::application::dto::{OutputFormat, TraceRequest};
use appsheet_deps::dependency_analysis::domain::{ComponentId, ComponentKind, PathShape};

/// Find orphaned components and trace reference chains in AppSheet documentation exports
#[derive(Parser, Debug)]
#[command(name = "appsheet-deps")]
#[command(version)]
#[command(
    about = "Find orphaned components and trace reference chains in AppSheet documentation exports",
    long_about = None
)]
pub struct Args {
    /// Record document exported from the app documentation (.json, .yaml, .yml or .toml)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Config file (defaults to appsheet-deps.config.yml next to the input, if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format: json or markdown [default: markdown]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Trace navigation paths starting at this view.
    /// Can be specified multiple times
    #[arg(long = "trace-navigation", value_name = "VIEW")]
    pub trace_navigation: Vec<String>,

    /// Expand this grouped action into its member chains.
    /// Can be specified multiple times
    #[arg(long = "trace-group", value_name = "ACTION")]
    pub trace_group: Vec<String>,

    /// Trace formula dependencies of this column (Table[Column] or column name).
    /// Can be specified multiple times
    #[arg(long = "trace-column", value_name = "COLUMN")]
    pub trace_column: Vec<String>,

    /// Maximum hops per traced path
    #[arg(long, value_name = "N", value_parser = parse_positive)]
    pub max_depth: Option<usize>,

    /// Maximum paths reported per trace
    #[arg(long, value_name = "N", value_parser = parse_positive)]
    pub max_paths: Option<usize>,

    /// Exit with code 1 when orphaned components are found
    #[arg(long)]
    pub fail_on_orphans: bool,
}

impl Args {
    /// Trace requests in command-line order: navigation, groups, columns
    pub fn trace_requests(&self) -> Vec<TraceRequest> {
        let requests = |names: &[String], kind: ComponentKind, shape: PathShape| {
            names
                .iter()
                .map(move |name| TraceRequest::new(shape, ComponentId::new(kind, name.trim())))
                .collect::<Vec<_>>()
        };

        let mut traces = requests(&self.trace_navigation, ComponentKind::View, PathShape::Navigation);
        traces.extend(requests(
            &self.trace_group,
            ComponentKind::Action,
            PathShape::GroupedActionExpansion,
        ));
        traces.extend(requests(
            &self.trace_column,
            ComponentKind::Column,
            PathShape::ColumnDependency,
        ));
        traces
    }
}

fn parse_positive(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_args() {
        let args = Args::try_parse_from(["appsheet-deps", "-i", "records.yaml"]).unwrap();
        assert_eq!(args.input, PathBuf::from("records.yaml"));
        assert!(args.format.is_none());
        assert!(!args.fail_on_orphans);
        assert!(args.trace_requests().is_empty());
    }

    #[test]
    fn test_parse_format_case_insensitive() {
        let args =
            Args::try_parse_from(["appsheet-deps", "-i", "r.json", "-f", "JSON"]).unwrap();
        assert_eq!(args.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_parse_invalid_format() {
        let result = Args::try_parse_from(["appsheet-deps", "-i", "r.json", "-f", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["appsheet-deps"]).is_err());
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        assert!(Args::try_parse_from(["appsheet-deps", "-i", "r.json", "--max-depth", "0"]).is_err());
        assert!(Args::try_parse_from(["appsheet-deps", "-i", "r.json", "--max-paths", "0"]).is_err());
    }

    #[test]
    fn test_trace_requests_in_order() {
        let args = Args::try_parse_from([
            "appsheet-deps",
            "-i",
            "r.yaml",
            "--trace-column",
            "Orders[Total]",
            "--trace-navigation",
            "Home",
            "--trace-group",
            "Checkout",
            "--trace-navigation",
            "Settings",
        ])
        .unwrap();

        let traces = args.trace_requests();
        let summary: Vec<(PathShape, &str)> = traces
            .iter()
            .map(|t| (t.shape, t.start.name()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (PathShape::Navigation, "Home"),
                (PathShape::Navigation, "Settings"),
                (PathShape::GroupedActionExpansion, "Checkout"),
                (PathShape::ColumnDependency, "Orders[Total]"),
            ]
        );
    }
}
