//! Descriptors for the library surface — format-agnostic.
//!
//! Filled by a loader (package scan or JSON manifest) or declared directly in
//! Rust with the builder methods.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The root namespace: every member that may carry a toolbox.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    /// Members in enumeration order.
    #[serde(default)]
    pub toolboxes: Vec<Toolbox>,
}

/// A member of the namespace (sub-package or module).
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolbox {
    pub name: String,
    /// `TOOLBOX_NAME` marker, shown to end users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Function names declared exportable (`__cognite__`).
    #[serde(default)]
    pub exported: BTreeSet<String>,
    /// Every callable of the member, exported or not.
    #[serde(default)]
    pub functions: Vec<FunctionUnit>,
}

/// A callable with its documentation comment.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionUnit {
    pub name: String,
    /// Raw docstring; empty when the function has none.
    #[serde(default)]
    pub doc: String,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            toolboxes: Vec::new(),
        }
    }

    pub fn toolbox(mut self, toolbox: Toolbox) -> Self {
        self.toolboxes.push(toolbox);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.toolboxes.is_empty()
    }
}

impl Toolbox {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn display_name(mut self, display: impl Into<String>) -> Self {
        self.display_name = Some(display.into());
        self
    }

    /// Add a function and mark it exportable.
    pub fn export(mut self, function: FunctionUnit) -> Self {
        self.exported.insert(function.name.clone());
        self.functions.push(function);
        self
    }

    /// Add a function that is not exported.
    pub fn function(mut self, function: FunctionUnit) -> Self {
        self.functions.push(function);
        self
    }

    pub fn is_exported(&self, name: &str) -> bool {
        self.exported.contains(name)
    }

    /// Functions whose name appears in the exported set, in declaration order.
    pub fn exported_functions(&self) -> impl Iterator<Item = &FunctionUnit> {
        self.functions.iter().filter(|f| self.is_exported(&f.name))
    }
}

impl FunctionUnit {
    pub fn new(name: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
        }
    }
}
