//! Configuration file support for dotnet-sbom.
//!
//! Provides YAML-based configuration through `dotnet-sbom.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::sbom_generation::domain::ComponentType;
use crate::shared::security::read_validated_file;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "dotnet-sbom.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub exclude_dev: Option<bool>,
    pub exclude_test_projects: Option<bool>,
    pub include_project_references: Option<bool>,
    pub dependency_exclude_filter: Option<ExcludeFilter>,
    pub set_name: Option<String>,
    pub set_version: Option<String>,
    pub set_type: Option<String>,
    pub test_project_patterns: Option<Vec<String>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// The exclude filter, written either as the CLI's comma-separated string
/// or as a YAML list of `name` / `name@version` entries.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ExcludeFilter {
    Joined(String),
    List(Vec<String>),
}

impl ExcludeFilter {
    /// The filter in the comma-separated form the CLI accepts
    pub fn to_filter_string(&self) -> String {
        match self {
            ExcludeFilter::Joined(joined) => joined.clone(),
            ExcludeFilter::List(entries) => entries.join(","),
        }
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = read_validated_file(path, "config file").with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

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

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref set_type) = config.set_type {
        if let Err(e) = set_type.parse::<ComponentType>() {
            bail!(
                "Invalid config: set_type: {}\n\n\
                 💡 Hint: Use a CycloneDX component type such as \"application\" or \"library\".",
                e
            );
        }
    }

    if let Some(ref patterns) = config.test_project_patterns {
        for (i, pattern) in patterns.iter().enumerate() {
            if pattern.trim().is_empty() {
                bail!(
                    "Invalid config: test_project_patterns[{}] must not be empty.\n\n\
                     💡 Hint: Each entry is a project name pattern such as \"*.Tests\".",
                    i
                );
            }
        }
    }

    for (name, value) in [("set_name", &config.set_name), ("set_version", &config.set_version)] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            bail!("Invalid config: {} must not be empty.", name);
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<_> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
