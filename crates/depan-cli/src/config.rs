//! Configuration loading for the `depan` binary.
//!
//! The project file lives at `.depan/config.toml` under the working
//! directory; every field has a default, so a missing file is not an error.

use anyhow::{Context, Result};
use depan_core::matcher::RelationSetMatcher;
use depan_core::model::Relation;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::output::OutputMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepanConfig {
    #[serde(default)]
    pub hierarchy: HierarchyConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyConfig {
    #[serde(default = "default_forward_relations")]
    pub forward_relations: Vec<String>,
    #[serde(default)]
    pub reverse_relations: Vec<String>,
    #[serde(default = "default_true")]
    pub spanning: bool,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            forward_relations: default_forward_relations(),
            reverse_relations: Vec::new(),
            spanning: default_true(),
        }
    }
}

impl HierarchyConfig {
    #[must_use]
    pub fn matcher(&self) -> RelationSetMatcher {
        RelationSetMatcher::new(
            self.forward_relations.iter().map(|r| Relation::new(r.as_str())),
            self.reverse_relations.iter().map(|r| Relation::new(r.as_str())),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

/// Load `explicit` if given, else `.depan/config.toml` under `root`, else
/// defaults.
///
/// # Errors
///
/// Returns an error if the chosen file cannot be read or parsed. An
/// explicit path that does not exist is an error; a missing project file
/// is not.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<DepanConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = root.join(".depan/config.toml");
            if !path.exists() {
                return Ok(DepanConfig::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<DepanConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Pick the output mode: `--json` flag, then `DEPAN_FORMAT`, then the
/// config file. Unknown values fall through to the next source.
#[must_use]
pub fn resolve_output(cli_json: bool, env_format: Option<&str>, file_format: &str) -> OutputMode {
    if cli_json {
        return OutputMode::Json;
    }

    env_format
        .and_then(OutputMode::parse)
        .or_else(|| OutputMode::parse(file_format))
        .unwrap_or(OutputMode::Text)
}

const fn default_true() -> bool {
    true
}

fn default_forward_relations() -> Vec<String> {
    vec!["contains".to_string()]
}

fn default_format() -> String {
    "text".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_project_config_uses_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let cfg = load_config(dir.path(), None).expect("load should succeed");
        assert_eq!(cfg.hierarchy.forward_relations, vec!["contains"]);
        assert!(cfg.hierarchy.reverse_relations.is_empty());
        assert!(cfg.hierarchy.spanning);
        assert_eq!(cfg.output.format, "text");
    }

    #[test]
    fn project_config_is_discovered() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::create_dir_all(dir.path().join(".depan")).expect("mkdir");
        std::fs::write(
            dir.path().join(".depan/config.toml"),
            "[hierarchy]\nforward_relations = [\"owns\"]\nreverse_relations = [\"extends\"]\nspanning = false\n",
        )
        .expect("write config");

        let cfg = load_config(dir.path(), None).expect("load");
        assert_eq!(cfg.hierarchy.forward_relations, vec!["owns"]);
        assert!(!cfg.hierarchy.spanning);
        assert_eq!(cfg.output.format, "text");

        let matcher = cfg.hierarchy.matcher();
        assert!(matcher.forward.contains(&Relation::from("owns")));
        assert!(matcher.reverse.contains(&Relation::from("extends")));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("nope.toml");
        assert!(load_config(dir.path(), Some(&missing)).is_err());
    }

    #[test]
    fn malformed_config_reports_path() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[hierarchy\n").expect("write");
        let err = load_config(dir.path(), Some(&path)).expect_err("parse error");
        assert!(format!("{err:#}").contains("bad.toml"));
    }

    #[test]
    fn cli_json_overrides_env_and_config() {
        assert_eq!(resolve_output(true, Some("text"), "text"), OutputMode::Json);
    }

    #[test]
    fn env_overrides_config_and_unknown_values_fall_through() {
        assert_eq!(resolve_output(false, Some("json"), "text"), OutputMode::Json);
        assert_eq!(resolve_output(false, Some("fancy"), "json"), OutputMode::Json);
        assert_eq!(resolve_output(false, None, "bogus"), OutputMode::Text);
    }
}
