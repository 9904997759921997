//! NumPy-style docstring parser.
//!
//! ```text
//! Short description.
//!
//! Parameters
//! ----------
//! window : int, optional
//!     Window length.
//!
//! Returns
//! -------
//! smoothed : pandas.Series
//!     Smoothed data.
//! ```
//!
//! Unlike the Google grammar, a `Returns` entry may name the value it returns.

use super::{cleandoc, DocParser, DocStyle, Docstring, Param, Returns};
use crate::error::ParseError;
use regex::Regex;
use std::sync::LazyLock;

static RE_OPTIONAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)(?:, optional|\(optional\))$").unwrap());

pub struct NumpyParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Param,
    Returns,
    Yields,
    /// Delimits text but carries nothing the extractor reads.
    Other,
}

impl Section {
    fn from_title(title: &str) -> Option<Self> {
        match title {
            "Parameters" | "Params" | "Arguments" | "Args" | "Other Parameters"
            | "Other Params" | "Other Arguments" | "Other Args" | "Receives" | "Receive"
            | "Attributes" | "Attribute" => Some(Section::Param),
            "Returns" | "Return" => Some(Section::Returns),
            "Yields" | "Yield" => Some(Section::Yields),
            "Raises" | "Raise" | "Warns" | "Warn" | "Examples" | "Example" | "Warnings"
            | "Warning" | "See Also" | "Related" | "Notes" | "Note" | "References"
            | "Reference" => Some(Section::Other),
            _ => None,
        }
    }
}

/// A title line plus its dash underline.
struct Title<'a> {
    section: Section,
    name: &'a str,
    start: usize,
    end: usize,
}

impl DocParser for NumpyParser {
    fn parse(&self, text: &str) -> Result<Docstring, ParseError> {
        let mut ret = Docstring::default();
        if text.is_empty() {
            return Ok(ret);
        }
        let text = cleandoc(text);
        let titles = find_titles(&text);

        let desc_chunk = match titles.first() {
            Some(first) => &text[..first.start],
            None => text.as_str(),
        };
        let (short, long) = match desc_chunk.split_once('\n') {
            Some((short, long)) => (short, Some(long)),
            None => (desc_chunk, None),
        };
        ret.short_description = Some(short.to_string()).filter(|s| !s.is_empty());
        ret.long_description = long.and_then(clean_str);

        for (j, title) in titles.iter().enumerate() {
            let end = titles.get(j + 1).map(|t| t.start).unwrap_or(text.len());
            let body = &text[title.end..end];

            match title.section {
                Section::Param => {
                    for (key, value) in kv_items(body) {
                        ret.params.push(parse_param(key, &value));
                    }
                }
                Section::Returns | Section::Yields => {
                    for (key, value) in kv_items(body) {
                        if ret.returns.is_none() {
                            ret.returns =
                                Some(parse_returns(key, &value, title.section == Section::Yields));
                        }
                    }
                }
                Section::Other => {
                    tracing::trace!(section = title.name, "skipping numpy section");
                }
            }
        }

        Ok(ret)
    }

    fn style(&self) -> DocStyle {
        DocStyle::Numpy
    }
}

/// Split text into `(byte offset, line)` pairs, without the newline.
fn lines_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut offset = 0;
    for line in text.split('\n') {
        out.push((offset, line));
        offset += line.len() + 1;
    }
    out
}

fn find_titles(text: &str) -> Vec<Title<'_>> {
    let lines = lines_with_offsets(text);
    let mut titles = Vec::new();
    let mut i = 0;
    while i + 1 < lines.len() {
        let (start, line) = lines[i];
        let name = line.trim_end();
        if let Some(section) = Section::from_title(name) {
            let (underline_start, underline) = lines[i + 1];
            let dashes = underline.trim_end();
            if dashes.len() == name.len() && dashes.chars().all(|c| c == '-') {
                titles.push(Title {
                    section,
                    name,
                    start,
                    end: underline_start + underline.len(),
                });
                i += 2;
                continue;
            }
        }
        i += 1;
    }
    titles
}

/// Key lines start at column 0; the indented lines below form the value.
fn kv_items(body: &str) -> Vec<(&str, String)> {
    let keys: Vec<(usize, &str)> = lines_with_offsets(body)
        .into_iter()
        .filter(|(_, line)| line.chars().next().is_some_and(|c| !c.is_whitespace()))
        .collect();

    keys.iter()
        .enumerate()
        .map(|(j, &(start, key))| {
            let value_start = start + key.len();
            let value_end = keys.get(j + 1).map(|&(next, _)| next).unwrap_or(body.len());
            (key, cleandoc(&body[value_start..value_end]))
        })
        .collect()
}

fn parse_param(key: &str, value: &str) -> Param {
    let (arg_name, type_name) = match key.split_once(':') {
        Some((name, ty)) => (name.trim_end(), clean_str(ty)),
        None => (key, None),
    };
    let type_name = type_name.map(|ty| {
        RE_OPTIONAL
            .captures(&ty)
            .map(|caps| caps[1].to_string())
            .unwrap_or_else(|| ty.clone())
    });
    Param {
        arg_name: arg_name.to_string(),
        type_name,
        description: clean_str(value),
    }
}

fn parse_returns(key: &str, value: &str, is_generator: bool) -> Returns {
    let (return_name, type_name) = match key.split_once(':') {
        Some((name, ty)) => (Some(name.trim_end().to_string()), ty.trim_start()),
        None => (None, key),
    };
    Returns {
        return_name,
        type_name: clean_str(type_name),
        description: clean_str(value),
        is_generator,
    }
}

fn clean_str(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
