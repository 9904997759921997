//! Loader module — build a [`Namespace`] from whatever the source path is.

pub mod manifest;
pub mod python;

use crate::model::Namespace;
use anyhow::{anyhow, bail, Result};
use std::path::Path;

/// Load a namespace from a package directory or a `.json` manifest.
pub fn load(path: &Path) -> Result<Namespace> {
    if path.is_dir() {
        return python::scan(path);
    }
    if !path.exists() {
        bail!("source not found: {}", path.display());
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => manifest::read(path),
        _ => Err(anyhow!(
            "unsupported input: {}. Use a package directory or a .json manifest",
            path.display()
        )),
    }
}
