//! Docstring parsing — trait-based grammar dispatch.
//!
//! The extractor only needs the short description, the parameters and the
//! return name, but the parsers keep the rest of what the grammar defines so
//! either implementation can be swapped in behind [`DocParser`].

pub mod google;
pub mod numpy;

use crate::error::ParseError;
use std::fmt;

/// Parsed documentation of one function.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Docstring {
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    /// Parameters in docstring order.
    pub params: Vec<Param>,
    /// First returns/yields entry.
    pub returns: Option<Returns>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Param {
    pub arg_name: String,
    pub type_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Returns {
    /// Only grammars that name return values fill this (NumPy `name : type`).
    pub return_name: Option<String>,
    pub type_name: Option<String>,
    pub description: Option<String>,
    pub is_generator: bool,
}

impl Docstring {
    /// Name of the return value, if the grammar gave one.
    pub fn return_name(&self) -> Option<&str> {
        self.returns.as_ref().and_then(|r| r.return_name.as_deref())
    }
}

/// Docstring conventions understood by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DocStyle {
    /// `Args:` / `Returns:` sections.
    #[default]
    Google,
    /// Underlined `Parameters` / `Returns` sections.
    Numpy,
}

impl fmt::Display for DocStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocStyle::Google => f.write_str("google"),
            DocStyle::Numpy => f.write_str("numpy"),
        }
    }
}

/// Trait for turning raw docstring text into a [`Docstring`].
pub trait DocParser {
    fn parse(&self, text: &str) -> Result<Docstring, ParseError>;
    fn style(&self) -> DocStyle;
}

/// Create a parser for the given docstring style.
pub fn create_parser(style: DocStyle) -> Box<dyn DocParser> {
    match style {
        DocStyle::Google => Box::new(google::GoogleParser),
        DocStyle::Numpy => Box::new(numpy::NumpyParser),
    }
}

/// Normalize docstring indentation.
///
/// Tabs expand to 8 columns, the first line loses its leading whitespace, the
/// common indentation of the remaining non-blank lines is removed, and empty
/// lines at either end are dropped.
pub fn cleandoc(text: &str) -> String {
    let expanded = expand_tabs(text, 8);
    let mut lines: Vec<&str> = expanded.split('\n').collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let content = line.trim_start();
            if content.is_empty() {
                None
            } else {
                Some(line.chars().count() - content.chars().count())
            }
        })
        .min();

    if let Some(first) = lines.first_mut() {
        *first = first.trim_start();
    }
    if let Some(margin) = margin {
        for line in lines.iter_mut().skip(1) {
            *line = skip_chars(line, margin);
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.is_empty()).count();
    lines.drain(..leading);

    lines.join("\n")
}

/// Strip leading and trailing `\n` only, leaving other whitespace alone.
pub(crate) fn strip_newlines(s: &str) -> &str {
    s.trim_matches('\n')
}

fn skip_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}

fn expand_tabs(s: &str, tabsize: usize) -> String {
    let mut out = String::with_capacity(s.len());
    let mut column = 0;
    for c in s.chars() {
        match c {
            '\t' => {
                let pad = tabsize - column % tabsize;
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}
