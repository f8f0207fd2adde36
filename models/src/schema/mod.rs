//! Reading and writing model documents.
//!
//! Models are stored as YAML (the default) or JSON. Parsing does not run
//! [`Model::check`]; callers decide when a model must be well formed.

use crate::error::Result;
use crate::model::Model;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Parse a model file. Files ending in `.json` are read as JSON, anything
/// else as YAML.
pub fn parse_model(path: &Path) -> Result<Model> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    log::debug!("parsing model from {}", path.display());
    if is_json {
        parse_model_json(&content)
    } else {
        parse_model_str(&content)
    }
}

/// Parse a model YAML string
pub fn parse_model_str(content: &str) -> Result<Model> {
    let model: Model = serde_yaml::from_str(content)?;
    Ok(model)
}

pub fn parse_model_json(content: &str) -> Result<Model> {
    let model: Model = serde_json::from_str(content)?;
    Ok(model)
}

pub fn model_to_yaml(model: &Model) -> Result<String> {
    Ok(serde_yaml::to_string(model)?)
}

/// Write `model` to `path` as YAML (or JSON for a `.json` path). An
/// existing file is first copied to `<path>.bak`.
pub fn write_model(path: &Path, model: &Model) -> Result<()> {
    if path.exists() {
        let backup = backup_path(path);
        log::debug!("backing up {} to {}", path.display(), backup.display());
        std::fs::copy(path, &backup)?;
    }
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let content = if is_json {
        serde_json::to_string_pretty(model)?
    } else {
        model_to_yaml(model)?
    };
    std::fs::write(path, content)?;
    Ok(())
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}
