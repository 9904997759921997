//! toolbox-strings — turn exported toolbox docstrings into localization keys.
//!
//! A [`model::Namespace`] describes the library surface: toolboxes, their
//! display names, and which functions they export. [`extract::extract`] parses
//! each exported function's docstring and flattens the readable parts into a
//! [`registry::Registry`], which is written out as `toolboxes.json`.

pub mod docstring;
pub mod error;
pub mod extract;
pub mod loader;
pub mod model;
pub mod registry;

/// Key prefix used by the analytics library's UI strings.
pub const DEFAULT_PREFIX: &str = "INDSL";

/// Output file written relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "toolboxes.json";

/// Package directory scanned when no source is given.
pub const DEFAULT_SOURCE: &str = "indsl";
