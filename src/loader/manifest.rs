//! JSON manifest input.
//!
//! ```json
//! {
//!   "name": "indsl",
//!   "toolboxes": [
//!     {
//!       "name": "smooth",
//!       "display_name": "Smooth",
//!       "exported": ["sg"],
//!       "functions": [{ "name": "sg", "doc": "Savitzky-Golay." }]
//!     }
//!   ]
//! }
//! ```

use crate::model::Namespace;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Read a namespace manifest.
pub fn read(path: &Path) -> Result<Namespace> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let namespace: Namespace = serde_json::from_str(&content)
        .with_context(|| format!("invalid manifest: {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        toolboxes = namespace.toolboxes.len(),
        "loaded manifest"
    );
    Ok(namespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_manifest() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(
            br#"{"name": "indsl", "toolboxes": [{"name": "smooth", "display_name": "Smooth",
                "exported": ["sg"], "functions": [{"name": "sg", "doc": "Filter."}, {"name": "x"}]}]}"#,
        )
        .unwrap();

        let ns = read(file.path()).unwrap();
        let tb = &ns.toolboxes[0];
        assert_eq!(tb.display_name.as_deref(), Some("Smooth"));
        assert!(tb.is_exported("sg"));
        assert_eq!(tb.functions[1].doc, "");
    }

    #[test]
    fn invalid_manifest_names_file() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = read(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid manifest"));
    }
}
