//! Docstring extractor — namespace in, flat key/value registry out.
//!
//! Keys are `PREFIX_NAME`, with the name uppercased and spaces turned into
//! underscores. Per toolbox one display-name pair; per exported function one
//! summary pair, two pairs per parameter (label and description), and one
//! pair for a named return value.

use crate::docstring::{DocParser, Docstring};
use crate::error::ParseError;
use crate::model::{FunctionUnit, Namespace, Toolbox};
use crate::registry::Registry;

/// Walk every member of `namespace` and collect its strings.
pub fn extract(
    namespace: &Namespace,
    parser: &dyn DocParser,
    prefix: &str,
) -> Result<Registry, ParseError> {
    let mut registry = Registry::new();

    for toolbox in &namespace.toolboxes {
        extract_toolbox(&mut registry, toolbox, parser, prefix)?;
    }

    tracing::debug!(
        namespace = %namespace.name,
        style = %parser.style(),
        keys = registry.len(),
        "extracted toolbox strings"
    );
    Ok(registry)
}

fn extract_toolbox(
    registry: &mut Registry,
    toolbox: &Toolbox,
    parser: &dyn DocParser,
    prefix: &str,
) -> Result<(), ParseError> {
    if let Some(ref display) = toolbox.display_name {
        registry.insert(make_key(prefix, display), display.clone());
    }

    for function in toolbox.exported_functions() {
        let doc = parser.parse(&function.doc).inspect_err(|e| {
            tracing::error!(
                toolbox = %toolbox.name,
                function = %function.name,
                "bad docstring: {}",
                e
            );
        })?;
        emit_function(registry, prefix, function, &doc);
    }
    Ok(())
}

/// Emit the pairs for one exported function from its parsed docstring.
pub fn emit_function(
    registry: &mut Registry,
    prefix: &str,
    function: &FunctionUnit,
    doc: &Docstring,
) {
    let short = doc.short_description.as_deref().unwrap_or_default();
    registry.insert(make_key(prefix, &function.name), collapse_newlines(short));

    for param in &doc.params {
        let name = &param.arg_name;
        let description = param.description.as_deref().unwrap_or_default();
        registry.insert(make_key(prefix, name), param_label(name));
        registry.insert(
            format!("{}_DESCRIPTION", make_key(prefix, name)),
            param_description(name, description),
        );
    }

    if let Some(return_name) = doc.return_name().filter(|r| !r.is_empty()) {
        registry.insert(
            format!("{}_RETURN", make_key(prefix, return_name)),
            collapse_newlines(return_name).replace('.', ""),
        );
    }
}

/// `PREFIX_` + the name uppercased, spaces as underscores.
pub fn make_key(prefix: &str, name: &str) -> String {
    format!("{}_{}", prefix, name.to_uppercase().replace(' ', "_"))
}

/// Human-readable parameter label: `window_length.` → `Window length`.
pub fn param_label(name: &str) -> String {
    capitalize(&collapse_newlines(name).replace('.', "").replace('_', " "))
}

/// Parameter description with the parameter's own name removed.
///
/// Removal is a literal, case-sensitive substring match: a parameter named
/// `a` loses every `a` in its description, not just the word.
pub fn param_description(name: &str, description: &str) -> String {
    collapse_newlines(description).replace(name, "")
}

fn collapse_newlines(s: &str) -> String {
    s.replace('\n', " ")
}

/// First character uppercased, the rest lowercased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
