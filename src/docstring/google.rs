//! Google-style docstring parser.
//!
//! ```text
//! Short description.
//!
//! Long description.
//!
//! Args:
//!     window (int, optional): Window length.
//!         Continuation lines are dedented.
//!
//! Returns:
//!     pandas.Series: Smoothed data.
//! ```
//!
//! Section titles sit at column 0 after [`cleandoc`]. A section body ends at
//! the next title or at the first column-0 line that is not a title.

use super::{cleandoc, strip_newlines, DocParser, DocStyle, Docstring, Param, Returns};
use crate::error::ParseError;
use regex::Regex;
use std::sync::LazyLock;

static RE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^(Arguments|Args|Parameters|Params|Raises|Exceptions|Except|Attributes|Example|Examples|Returns|Yields):[ \t\r\f\v]*$",
    )
    .unwrap()
});

static RE_UNKNOWN_META: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\S").unwrap());

// `type: description` rather than a bare description
static RE_MULTIPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\s*[^:\s]+:|[^:]*\]:)").unwrap());

static RE_TYPED_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(.+?)\s*\(\s*(.*\S)\s*\)").unwrap());

pub struct GoogleParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Param,
    Raises,
    Examples,
    Returns,
    Yields,
}

impl Section {
    fn from_title(title: &str) -> Option<Self> {
        match title {
            "Arguments" | "Args" | "Parameters" | "Params" | "Attributes" => Some(Section::Param),
            "Raises" | "Exceptions" | "Except" => Some(Section::Raises),
            "Example" | "Examples" => Some(Section::Examples),
            "Returns" => Some(Section::Returns),
            "Yields" => Some(Section::Yields),
            _ => None,
        }
    }

    fn is_singular(self) -> bool {
        self == Section::Examples
    }

    fn is_singular_or_multiple(self) -> bool {
        matches!(self, Section::Returns | Section::Yields)
    }
}

/// One parsed section entry; only the kinds the extractor reads are kept.
enum Meta {
    Param(Param),
    Returns(Returns),
    Other,
}

impl DocParser for GoogleParser {
    fn parse(&self, text: &str) -> Result<Docstring, ParseError> {
        let mut ret = Docstring::default();
        if text.is_empty() {
            return Ok(ret);
        }
        let text = cleandoc(text);

        let (desc_chunk, meta_chunk) = match RE_TITLE.find(&text) {
            Some(m) => (&text[..m.start()], &text[m.start()..]),
            None => (text.as_str(), ""),
        };

        let (short, long) = match desc_chunk.split_once('\n') {
            Some((short, long)) => (short, Some(long)),
            None => (desc_chunk, None),
        };
        ret.short_description = non_empty(short);
        ret.long_description = long.and_then(|l| non_empty(l.trim()));

        for (title, chunk) in section_chunks(meta_chunk) {
            let Some(section) = Section::from_title(title) else {
                continue;
            };

            if section.is_singular() || section.is_singular_or_multiple() {
                let part = cleandoc(chunk);
                push_meta(&mut ret, build_meta(&part, section)?);
                continue;
            }

            let indent: String = chunk.chars().take_while(|c| c.is_whitespace()).collect();
            let starts = item_starts(chunk, &indent);
            if starts.is_empty() {
                return Err(ParseError::NoSpecification {
                    title: title.to_string(),
                    chunk: chunk.to_string(),
                });
            }
            for (j, &start) in starts.iter().enumerate() {
                let end = starts
                    .get(j + 1)
                    .map(|next| next - indent.len())
                    .unwrap_or(chunk.len());
                let part = strip_newlines(&chunk[start..end]);
                push_meta(&mut ret, build_meta(part, section)?);
            }
        }

        Ok(ret)
    }

    fn style(&self) -> DocStyle {
        DocStyle::Google
    }
}

/// Split the meta part into `(title, body)` pairs.
///
/// A repeated title keeps its first position but takes the later body.
fn section_chunks(meta_chunk: &str) -> Vec<(&str, &str)> {
    let matches: Vec<_> = RE_TITLE.captures_iter(meta_chunk).collect();
    let mut chunks: Vec<(&str, &str)> = Vec::new();

    for (j, caps) in matches.iter().enumerate() {
        let (Some(whole), Some(title)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = matches
            .get(j + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(meta_chunk.len());

        let mut body = &meta_chunk[whole.end()..end];
        if let Some(unknown) = RE_UNKNOWN_META.find(body) {
            body = &body[..unknown.start()];
        }
        let body = strip_newlines(body);

        match chunks.iter_mut().find(|(t, _)| *t == title.as_str()) {
            Some(existing) => existing.1 = body,
            None => chunks.push((title.as_str(), body)),
        }
    }
    chunks
}

/// Byte offsets just past `indent` on every line that starts an item.
fn item_starts(chunk: &str, indent: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut line_start = 0;
    loop {
        let rest = &chunk[line_start..];
        if let Some(after) = rest.strip_prefix(indent) {
            if after.chars().next().is_some_and(|c| !c.is_whitespace()) {
                starts.push(line_start + indent.len());
            }
        }
        match rest.find('\n') {
            Some(nl) => line_start += nl + 1,
            None => break,
        }
    }
    starts
}

fn build_meta(text: &str, section: Section) -> Result<Meta, ParseError> {
    if section.is_singular() || (section.is_singular_or_multiple() && !RE_MULTIPLE.is_match(text)) {
        return Ok(build_single_meta(text, section));
    }

    let Some((before, desc)) = text.split_once(':') else {
        return Err(ParseError::ExpectedColon {
            text: text.to_string(),
        });
    };

    let desc = desc.strip_prefix(' ').unwrap_or(desc);
    let desc = match desc.split_once('\n') {
        Some((first_line, rest)) => format!("{}\n{}", first_line, cleandoc(rest)),
        None => desc.to_string(),
    };
    let desc = strip_newlines(&desc);

    Ok(build_multi_meta(before, desc, section))
}

fn build_single_meta(desc: &str, section: Section) -> Meta {
    match section {
        Section::Returns | Section::Yields => Meta::Returns(Returns {
            return_name: None,
            type_name: None,
            description: non_empty(desc),
            is_generator: section == Section::Yields,
        }),
        _ => Meta::Other,
    }
}

fn build_multi_meta(before: &str, desc: &str, section: Section) -> Meta {
    match section {
        Section::Param => {
            let (arg_name, type_name) = match RE_TYPED_ARG.captures(before) {
                Some(caps) => {
                    let type_name = &caps[2];
                    let type_name = type_name.strip_suffix(", optional").unwrap_or(type_name);
                    (caps[1].to_string(), Some(type_name.to_string()))
                }
                None => (before.to_string(), None),
            };
            Meta::Param(Param {
                arg_name,
                type_name,
                description: non_empty(desc),
            })
        }
        Section::Returns | Section::Yields => Meta::Returns(Returns {
            return_name: None,
            type_name: non_empty(before),
            description: non_empty(desc),
            is_generator: section == Section::Yields,
        }),
        Section::Raises | Section::Examples => Meta::Other,
    }
}

fn push_meta(doc: &mut Docstring, meta: Meta) {
    match meta {
        Meta::Param(param) => doc.params.push(param),
        Meta::Returns(returns) => {
            if doc.returns.is_none() {
                doc.returns = Some(returns);
            }
        }
        Meta::Other => {}
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
