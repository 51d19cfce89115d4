//! Configuration file support for appsheet-deps.
//!
//! Provides YAML-based configuration through `appsheet-deps.config.yml`
//! files: the raw file schema, loading and discovery, validation, and the
//! resolved [`AnalysisConfig`] the CLI works with.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::application::dto::{OutputFormat, DEFAULT_MAX_PATHS};
use crate::dependency_analysis::domain::ComponentKind;
use crate::dependency_analysis::policies::{AttributePredicate, ExemptionRules, RootSet};
use crate::dependency_analysis::services::ChainTracer;
use crate::shared::security::read_regular_file;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "appsheet-deps.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    /// Root names and selectors keyed by component kind
    pub roots: Option<BTreeMap<String, RootConfig>>,
    /// Exemption predicates keyed by component kind
    pub exemptions: Option<BTreeMap<String, Vec<AttributePredicate>>>,
    pub limits: Option<LimitsConfig>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Roots of one component kind.
#[derive(Debug, Deserialize, Default)]
pub struct RootConfig {
    #[serde(default)]
    pub names: Vec<String>,
    /// Every component matching one of these predicates is a root
    #[serde(default)]
    pub when: Vec<AttributePredicate>,
}

/// Bounds on chain tracing.
#[derive(Debug, Deserialize, Default)]
pub struct LimitsConfig {
    pub max_trace_depth: Option<usize>,
    pub max_paths: Option<usize>,
}

/// Settings for one analysis run after defaults are applied
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub format: Option<OutputFormat>,
    pub roots: RootSet,
    pub exemptions: ExemptionRules,
    pub max_trace_depth: usize,
    pub max_paths: usize,
}

impl AnalysisConfig {
    /// Built-in AppSheet roots and exemptions, default limits
    pub fn appsheet_defaults() -> Self {
        Self {
            format: None,
            roots: RootSet::appsheet_defaults(),
            exemptions: ExemptionRules::appsheet_defaults(),
            max_trace_depth: ChainTracer::MAX_TRACE_DEPTH,
            max_paths: DEFAULT_MAX_PATHS,
        }
    }

    /// Applies a config file on top of the defaults
    ///
    /// `roots` and `exemptions` each replace the built-in section as a
    /// whole when present in the file.
    pub fn from_file(file: &ConfigFile) -> Result<Self> {
        let mut config = Self::appsheet_defaults();

        if let Some(format) = &file.format {
            config.format = Some(format.parse::<OutputFormat>().map_err(anyhow::Error::msg)?);
        }

        if let Some(roots) = &file.roots {
            let mut root_set = RootSet::new();
            for (key, root) in roots {
                let kind = parse_kind(key, "roots")?;
                root_set = root_set.with_names(kind, root.names.iter().map(|n| n.trim()));
                for selector in &root.when {
                    root_set = root_set.with_selector(kind, selector.clone());
                }
            }
            config.roots = root_set;
        }

        if let Some(exemptions) = &file.exemptions {
            let mut rules = ExemptionRules::new();
            for (key, predicates) in exemptions {
                let kind = parse_kind(key, "exemptions")?;
                for predicate in predicates {
                    rules = rules.with_rule(kind, predicate.clone());
                }
            }
            config.exemptions = rules;
        }

        if let Some(limits) = &file.limits {
            if let Some(depth) = limits.max_trace_depth {
                config.max_trace_depth = depth;
            }
            if let Some(max_paths) = limits.max_paths {
                config.max_paths = max_paths;
            }
        }

        Ok(config)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::appsheet_defaults()
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = read_regular_file(path, "config file").with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Accepts the singular or plural snake_case kind name
fn parse_kind(key: &str, section: &str) -> Result<ComponentKind> {
    let kind = match key.trim().to_lowercase().as_str() {
        "view" | "views" => ComponentKind::View,
        "column" | "columns" => ComponentKind::Column,
        "action" | "actions" => ComponentKind::Action,
        "slice" | "slices" => ComponentKind::Slice,
        "format_rule" | "format_rules" => ComponentKind::FormatRule,
        _ => bail!(
            "Invalid config: unknown component kind '{}' in {}.\n\n\
             💡 Hint: Use one of: view, column, action, slice, format_rule.",
            key,
            section
        ),
    };
    Ok(kind)
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(format) = &config.format {
        if let Err(message) = format.parse::<OutputFormat>() {
            bail!("Invalid config: {}.\n\n💡 Hint: Set 'format' to json or markdown.", message);
        }
    }

    if let Some(roots) = &config.roots {
        for (key, root) in roots {
            parse_kind(key, "roots")?;
            for (i, name) in root.names.iter().enumerate() {
                if name.trim().is_empty() {
                    bail!(
                        "Invalid config: roots.{}.names[{}] must not be empty.\n\n\
                         💡 Hint: Each root name must match a component name (e.g., \"Home\").",
                        key,
                        i
                    );
                }
            }
            for (i, selector) in root.when.iter().enumerate() {
                if let Err(message) = selector.validate() {
                    bail!(
                        "Invalid config: roots.{}.when[{}]: {}.\n\n\
                         💡 Hint: Selectors need a 'field' plus equals, not_equals, one_of, contains or present.",
                        key,
                        i,
                        message
                    );
                }
            }
        }
    }

    if let Some(exemptions) = &config.exemptions {
        for (key, predicates) in exemptions {
            parse_kind(key, "exemptions")?;
            for (i, predicate) in predicates.iter().enumerate() {
                if let Err(message) = predicate.validate() {
                    bail!(
                        "Invalid config: exemptions.{}[{}]: {}.\n\n\
                         💡 Hint: Predicates need a 'field' plus equals, not_equals, one_of, contains or present.",
                        key,
                        i,
                        message
                    );
                }
            }
        }
    }

    if let Some(limits) = &config.limits {
        if limits.max_trace_depth == Some(0) {
            bail!(
                "Invalid config: limits.max_trace_depth must be at least 1.\n\n\
                 💡 Hint: Omit the field to use the default depth of {}.",
                ChainTracer::MAX_TRACE_DEPTH
            );
        }
        if limits.max_paths == Some(0) {
            bail!(
                "Invalid config: limits.max_paths must be at least 1.\n\n\
                 💡 Hint: Omit the field to keep up to {} paths per trace.",
                DEFAULT_MAX_PATHS
            );
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
