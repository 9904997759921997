//! Flat key/value registry and its JSON output.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Generated key → display string. Later inserts overwrite earlier ones.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registry {
    entries: BTreeMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: String) {
        match self.entries.entry(key) {
            Entry::Occupied(mut slot) => {
                tracing::debug!(key = %slot.key(), previous = %slot.get(), "overwrote registry key");
                slot.insert(value);
            }
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty JSON object, 4-space indent, keys sorted, no trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.entries
            .serialize(&mut ser)
            .context("failed to serialize registry")?;
        String::from_utf8(buf).context("registry JSON is not UTF-8")
    }

    /// Atomically replace `path` with the registry's JSON.
    ///
    /// The JSON goes to a temporary file next to `path` first; `path` is only
    /// touched by the final rename, so a failure leaves it as it was.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .with_context(|| format!("failed to write {}", tmp.path().display()))?;
        tmp.as_file()
            .sync_all()
            .with_context(|| format!("failed to sync {}", tmp.path().display()))?;
        tmp.persist(path)
            .with_context(|| format!("failed to write {}", path.display()))?;

        tracing::info!(path = %path.display(), keys = self.len(), "wrote registry");
        Ok(())
    }
}
