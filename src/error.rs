//! Error types for docstring parsing.

use thiserror::Error;

/// A docstring that does not follow its grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A section title with no entries under it.
    #[error("no specification for \"{title}\": \"{chunk}\"")]
    NoSpecification { title: String, chunk: String },

    /// A section entry that should be `name: description`.
    #[error("expected a colon in {text:?}")]
    ExpectedColon { text: String },
}
