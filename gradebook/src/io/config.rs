//! Gradebook configuration stored in `gradebook.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::OrphanPolicy;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gradebook.toml";

/// Gradebook configuration (TOML).
///
/// Missing fields fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GradebookConfig {
    /// Roster document read and written by every command.
    pub data_path: PathBuf,

    /// How loads and catalog replacements treat orphaned grades.
    pub orphan_policy: OrphanPolicy,

    /// Seed fresh rosters with the built-in course catalog.
    pub seed_catalog: bool,
}

impl Default for GradebookConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("student_data.json"),
            orphan_policy: OrphanPolicy::Lenient,
            seed_catalog: true,
        }
    }
}

impl GradebookConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_path.as_os_str().is_empty() {
            return Err(anyhow!("data_path must not be empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `GradebookConfig::default()`.
pub fn load_config(path: &Path) -> Result<GradebookConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = GradebookConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: GradebookConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    debug!(path = %path.display(), data_path = %cfg.data_path.display(), "config loaded");
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &GradebookConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, GradebookConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("gradebook.toml");
        let cfg = GradebookConfig {
            data_path: PathBuf::from("data/roster.json"),
            orphan_policy: OrphanPolicy::Strict,
            seed_catalog: false,
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_uses_defaults_for_missing_fields() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("gradebook.toml");
        fs::write(&path, "orphan_policy = \"strict\"\n").expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.orphan_policy, OrphanPolicy::Strict);
        assert_eq!(cfg.data_path, GradebookConfig::default().data_path);
        assert!(cfg.seed_catalog);
    }

    #[test]
    fn empty_data_path_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("gradebook.toml");
        fs::write(&path, "data_path = \"\"\n").expect("write");

        let err = load_config(&path).expect_err("invalid");
        assert!(err.to_string().contains("data_path"));
    }
}
