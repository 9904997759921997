//! Static scan of a Python package.
//!
//! Reads the library's declared surface straight from source, without
//! importing it:
//! - `TOOLBOX_NAME = "Smooth"` in a member module → display name
//! - `__cognite__ = ["sg", "alma"]` → exported function names
//! - top-level `def name(...)` and its leading string literal → docstring
//! - `from .impl import sg as savgol` → `savgol` is a function of the module,
//!   documented by the docstring of `sg` in `impl`
//!
//! Members are the package's sub-packages and top-level modules, in name
//! order. A member's functions are its module attributes that resolve to a
//! `def` inside the scanned package.

use crate::model::{FunctionUnit, Namespace, Toolbox};
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::LazyLock;

static RE_TOOLBOX_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^TOOLBOX_NAME\s*(?::[^=]*)?=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

static RE_EXPORTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^__cognite__\s*(?::[^=]*)?=\s*[\[\(]([^\]\)]*)[\]\)]").unwrap()
});

static RE_ALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^__all__\s*(?::[^=]*)?=\s*[\[\(]([^\]\)]*)[\]\)]").unwrap()
});

static RE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|'([^']*)'"#).unwrap());

static RE_DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:async\s+)?def\s+([A-Za-z_]\w*)\s*\(").unwrap());

static RE_FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^from\s+(\.*)\s*([\w.]*)\s+import\s+(.+)$").unwrap());

static RE_DOC_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^([rRuU]{0,2})("""|'''|"|')"#).unwrap());

/// One namespace member before scanning.
struct MemberSource {
    name: String,
    module_file: PathBuf,
}

/// A top-level statement that binds names in a module.
#[derive(Debug)]
enum Binding {
    Def(FunctionUnit),
    From(FromImport),
}

/// `from <dots><module> import <names>`.
#[derive(Debug, Default, PartialEq)]
struct FromImport {
    level: usize,
    module: String,
    /// `(name in the source module, name bound here)`.
    names: Vec<(String, String)>,
    star: bool,
}

/// Function attributes of one scanned module.
#[derive(Debug, Default)]
struct Module {
    functions: BTreeMap<String, FunctionUnit>,
    /// `__all__`, when the module declares one.
    public: Option<BTreeSet<String>>,
}

/// Loads module files of one package tree and follows their imports.
struct Resolver {
    root: PathBuf,
    root_name: String,
    modules: HashMap<PathBuf, Rc<Module>>,
    loading: HashSet<PathBuf>,
}

/// Scan a package directory into a namespace.
pub fn scan(root: &Path) -> Result<Namespace> {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string());

    let mut resolver = Resolver::new(root, &name);
    let mut namespace = Namespace::new(name);
    for member in discover_members(root)? {
        let toolbox = scan_member(&mut resolver, &member)?;
        if toolbox.display_name.is_none()
            && toolbox.exported.is_empty()
            && toolbox.functions.is_empty()
        {
            continue;
        }
        tracing::debug!(
            member = %toolbox.name,
            display_name = ?toolbox.display_name,
            exported = toolbox.exported.len(),
            functions = toolbox.functions.len(),
            "scanned member"
        );
        namespace.toolboxes.push(toolbox);
    }
    Ok(namespace)
}

fn discover_members(root: &Path) -> Result<Vec<MemberSource>> {
    let base = glob::Pattern::escape(&root.to_string_lossy());
    let packages = format!("{}/*/__init__.py", base);
    let modules = format!("{}/*.py", base);

    let mut members = Vec::new();
    for entry in glob::glob(&packages)
        .with_context(|| format!("invalid glob pattern: {}", packages))?
    {
        let init = entry.with_context(|| format!("failed to list {}", root.display()))?;
        let Some(dir) = init.parent().and_then(Path::file_name) else {
            continue;
        };
        members.push(MemberSource {
            name: dir.to_string_lossy().to_string(),
            module_file: init,
        });
    }
    for entry in glob::glob(&modules)
        .with_context(|| format!("invalid glob pattern: {}", modules))?
    {
        let path = entry.with_context(|| format!("failed to list {}", root.display()))?;
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
            continue;
        };
        if stem != "__init__" && path.is_file() {
            members.push(MemberSource {
                name: stem,
                module_file: path,
            });
        }
    }
    // Sort for deterministic output
    members.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(members)
}

fn scan_member(resolver: &mut Resolver, member: &MemberSource) -> Result<Toolbox> {
    let src = fs::read_to_string(&member.module_file)
        .with_context(|| format!("failed to read {}", member.module_file.display()))?;
    let module = resolver.module(&member.module_file)?;

    let exported = find_exports(&src);
    for name in exported.iter().filter(|n| !module.functions.contains_key(*n)) {
        tracing::warn!(
            member = %member.name,
            function = %name,
            "exported name does not resolve to a function in the package"
        );
    }

    Ok(Toolbox {
        name: member.name.clone(),
        display_name: find_toolbox_name(&src),
        exported,
        functions: module.functions.values().cloned().collect(),
    })
}

impl Resolver {
    fn new(root: &Path, root_name: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            root_name: root_name.to_string(),
            modules: HashMap::new(),
            loading: HashSet::new(),
        }
    }

    /// Function attributes of the module at `file`, imports followed.
    fn module(&mut self, file: &Path) -> Result<Rc<Module>> {
        if let Some(module) = self.modules.get(file) {
            return Ok(Rc::clone(module));
        }
        if !self.loading.insert(file.to_path_buf()) {
            tracing::debug!(path = %file.display(), "import cycle, module seen as empty");
            return Ok(Rc::default());
        }

        let src = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let bindings =
            parse_module(&src).with_context(|| format!("failed to parse {}", file.display()))?;

        // A later binding of a name replaces the earlier one.
        let mut functions = BTreeMap::new();
        for binding in bindings {
            match binding {
                Binding::Def(function) => {
                    functions.insert(function.name.clone(), function);
                }
                Binding::From(import) => self.bind_import(file, &import, &mut functions)?,
            }
        }

        let module = Rc::new(Module {
            functions,
            public: find_name_list(&RE_ALL, &src),
        });
        self.loading.remove(file);
        self.modules.insert(file.to_path_buf(), Rc::clone(&module));
        Ok(module)
    }

    fn bind_import(
        &mut self,
        file: &Path,
        import: &FromImport,
        functions: &mut BTreeMap<String, FunctionUnit>,
    ) -> Result<()> {
        let Some(target) = self.resolve(file, import) else {
            tracing::debug!(
                path = %file.display(),
                module = %import.module,
                "import from outside the package"
            );
            for (_, bound) in &import.names {
                functions.remove(bound);
            }
            return Ok(());
        };
        let source = self.module(&target)?;

        if import.star {
            for (name, function) in &source.functions {
                let public = match &source.public {
                    Some(public) => public.contains(name),
                    None => !name.starts_with('_'),
                };
                if public {
                    functions.insert(name.clone(), function.clone());
                }
            }
        }
        for (name, bound) in &import.names {
            match source.functions.get(name) {
                Some(function) => {
                    functions.insert(bound.clone(), FunctionUnit::new(bound, &function.doc));
                }
                // submodule or non-function attribute
                None => {
                    functions.remove(bound);
                }
            }
        }
        Ok(())
    }

    /// File of the module an import names, if it lives in the package.
    fn resolve(&self, file: &Path, import: &FromImport) -> Option<PathBuf> {
        let mut parts = import.module.split('.').filter(|p| !p.is_empty());
        let mut base = if import.level > 0 {
            let mut dir = file.parent()?;
            for _ in 1..import.level {
                dir = dir.parent()?;
            }
            dir.to_path_buf()
        } else {
            if parts.next() != Some(self.root_name.as_str()) {
                return None;
            }
            self.root.clone()
        };
        base.extend(parts);

        let init = base.join("__init__.py");
        if init.is_file() {
            return Some(init);
        }
        let module = base.with_extension("py");
        module.is_file().then_some(module)
    }
}

/// Last `TOOLBOX_NAME` assignment at module level.
fn find_toolbox_name(src: &str) -> Option<String> {
    RE_TOOLBOX_NAME
        .captures_iter(src)
        .last()
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
}

/// Names listed in the last `__cognite__` assignment.
fn find_exports(src: &str) -> BTreeSet<String> {
    find_name_list(&RE_EXPORTS, src).unwrap_or_default()
}

/// Quoted names in the last assignment matched by `re`.
fn find_name_list(re: &Regex, src: &str) -> Option<BTreeSet<String>> {
    let caps = re.captures_iter(src).last()?;
    Some(
        RE_QUOTED
            .captures_iter(&caps[1])
            .filter_map(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str().to_string())
            .collect(),
    )
}

/// Top-level `def`s and `from ... import`s, in source order.
fn parse_module(src: &str) -> Result<Vec<Binding>> {
    let lines: Vec<&str> = src.lines().collect();
    let mut bindings = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        // Module-level strings hold prose, not statements.
        if RE_DOC_OPEN.is_match(lines[i]) {
            let used = read_docstring(lines[i], &lines[i + 1..])
                .with_context(|| format!("string at line {}", i + 1))?
                .map_or(0, |(_, used)| used);
            i += used + 1;
            continue;
        }
        if let Some((import, end)) = parse_from_import(&lines, i)? {
            bindings.push(Binding::From(import));
            i = end + 1;
            continue;
        }
        let Some(caps) = RE_DEF.captures(lines[i]) else {
            i += 1;
            continue;
        };
        let name = caps[1].to_string();
        let (j, inline) = signature_end(&lines, i);
        let inline = inline.trim();

        // First statement of the body: after the colon, or on the next code line.
        let first = if !inline.is_empty() && !inline.starts_with('#') {
            Some((j, inline))
        } else {
            (j + 1..lines.len())
                .find(|&k| {
                    let line = lines[k].trim();
                    !line.is_empty() && !line.starts_with('#')
                })
                .map(|k| (k, lines[k].trim_start()))
        };

        let (doc, next) = match first {
            Some((k, text)) => match read_docstring(text, &lines[k + 1..])
                .with_context(|| format!("docstring of `{}` at line {}", name, k + 1))?
            {
                Some((doc, used)) => (doc, k + used + 1),
                None => (String::new(), j + 1),
            },
            None => (String::new(), j + 1),
        };

        bindings.push(Binding::Def(FunctionUnit { name, doc }));
        i = next;
    }
    Ok(bindings)
}

/// Parse a `from ... import ...` statement starting at line `start`.
///
/// Returns the import and the index of its last line.
fn parse_from_import(lines: &[&str], start: usize) -> Result<Option<(FromImport, usize)>> {
    let Some(caps) = RE_FROM.captures(lines[start]) else {
        return Ok(None);
    };

    let mut names = strip_comment(&caps[3]).trim_end().to_string();
    let mut end = start;
    if names.starts_with('(') {
        while !names.contains(')') && end + 1 < lines.len() {
            end += 1;
            names.push(' ');
            names.push_str(strip_comment(lines[end]));
        }
    } else {
        while names.ends_with('\\') && end + 1 < lines.len() {
            names.pop();
            end += 1;
            names.push(' ');
            names.push_str(strip_comment(lines[end]).trim_end());
        }
    }

    let mut import = FromImport {
        level: caps[1].len(),
        module: caps[2].to_string(),
        ..Default::default()
    };
    for entry in names.replace(['(', ')'], " ").split(',').map(str::trim) {
        match entry.split_whitespace().collect::<Vec<_>>().as_slice() {
            [] => {}
            ["*"] => import.star = true,
            [name] => import.names.push((name.to_string(), name.to_string())),
            [name, "as", bound] => import.names.push((name.to_string(), bound.to_string())),
            _ => bail!("malformed import at line {}: {:?}", start + 1, entry),
        }
    }
    Ok(Some((import, end)))
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(code, _)| code)
}

/// Find the colon that closes a signature starting at line `start`.
///
/// Returns the line holding it and the text after it on that line. Brackets
/// inside quoted text or comments don't count.
fn signature_end<'a>(lines: &[&'a str], start: usize) -> (usize, &'a str) {
    let mut depth = 0;
    for (j, line) in lines.iter().enumerate().skip(start) {
        let mut quote = None;
        let mut escaped = false;
        for (pos, ch) in line.char_indices() {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                }
                continue;
            }
            match ch {
                '\'' | '"' => quote = Some(ch),
                '#' => break,
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                ':' if depth <= 0 => return (j, &line[pos + 1..]),
                _ => {}
            }
        }
    }
    (lines.len().saturating_sub(1), "")
}

/// Read the string literal that opens `first`, continuing into `rest` for a
/// triple-quoted string.
///
/// Returns the decoded body and how many lines of `rest` it spans, or `None`
/// when the statement is not a lone string literal.
fn read_docstring(first: &str, rest: &[&str]) -> Result<Option<(String, usize)>> {
    let Some(caps) = RE_DOC_OPEN.captures(first) else {
        return Ok(None);
    };
    let raw = caps[1].contains(['r', 'R']);
    let quote = &caps[2];
    let open = &first[caps[0].len()..];

    if let Some(pos) = find_closing(open, quote) {
        let lone = is_statement_end(&open[pos + quote.len()..]);
        return Ok(lone.then(|| (finish(&open[..pos], raw), 0)));
    }
    if quote.len() == 1 {
        bail!("unterminated string literal");
    }

    let mut body = open.to_string();
    for (idx, line) in rest.iter().enumerate() {
        body.push('\n');
        if let Some(pos) = find_closing(line, quote) {
            body.push_str(&line[..pos]);
            let lone = is_statement_end(&line[pos + quote.len()..]);
            return Ok(lone.then(|| (finish(&body, raw), idx + 1)));
        }
        body.push_str(line);
    }
    bail!("unterminated docstring")
}

/// Byte offset of the first unescaped `quote` in `s`.
fn find_closing(s: &str, quote: &str) -> Option<usize> {
    let mut escaped = false;
    for (pos, ch) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if s[pos..].starts_with(quote) {
            return Some(pos);
        }
    }
    None
}

fn is_statement_end(tail: &str) -> bool {
    let tail = tail.trim();
    tail.is_empty() || tail.starts_with('#')
}

fn finish(body: &str, raw: bool) -> String {
    if raw {
        body.to_string()
    } else {
        unescape(body)
    }
}

/// Decode the escapes that show up in docstrings; unknown ones stay as written.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\n') => {}
            _ => {
                out.push('\\');
                continue;
            }
        }
        chars.next();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docstring::google::GoogleParser;
    use tempfile::TempDir;

    const SMOOTH_INIT: &str = r#"from .savgol import sg
from .alma import (
    alma,  # Arnaud Legoux
)

TOOLBOX_NAME = "Smooth"

__all__ = ["sg", "alma"]

__cognite__ = [
    "sg",
    'alma',
]
"#;

    const SAVGOL: &str = r#"import pandas as pd


@check_types
def sg(
    data: pd.Series,
    window_length: int = 11,  # odd (really)
    mode: str = "(",
) -> pd.Series:
    """Saviztky-Golay.

    Args:
        data: Time series.
        window_length: Window length.
    """
    return data


def _helper(x):
    return x
"#;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn defs(src: &str) -> Vec<FunctionUnit> {
        parse_module(src)
            .unwrap()
            .into_iter()
            .filter_map(|binding| match binding {
                Binding::Def(function) => Some(function),
                Binding::From(_) => None,
            })
            .collect()
    }

    fn function_names(toolbox: &Toolbox) -> Vec<&str> {
        toolbox.functions.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn toolbox_name_and_exports() {
        assert_eq!(find_toolbox_name(SMOOTH_INIT).as_deref(), Some("Smooth"));
        let exports: Vec<_> = find_exports(SMOOTH_INIT).into_iter().collect();
        assert_eq!(exports, vec!["alma", "sg"]);
    }

    #[test]
    fn no_markers() {
        assert_eq!(find_toolbox_name("x = 1\n"), None);
        assert!(find_exports("x = 1\n").is_empty());
        assert_eq!(find_name_list(&RE_ALL, "x = 1\n"), None);
    }

    #[test]
    fn multiline_signature_and_docstring() {
        let functions = defs(SAVGOL);
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].name, "sg");
        assert!(functions[0].doc.starts_with("Saviztky-Golay.\n\n    Args:"));
        assert!(functions[0].doc.ends_with("Window length.\n    "));
        assert_eq!(functions[1].name, "_helper");
        assert_eq!(functions[1].doc, "");
    }

    #[test]
    fn single_line_and_raw_docstrings() {
        let src = "def a():\n    \"\"\"One liner.\"\"\"\n\ndef b():\n    r'''Raw \\n stays.'''\n";
        let functions = defs(src);
        assert_eq!(functions[0].doc, "One liner.");
        assert_eq!(functions[1].doc, "Raw \\n stays.");
    }

    #[test]
    fn docstring_on_signature_line_and_plain_quotes() {
        let src = "def a(): \"\"\"Inline.\"\"\"\n\n\
                   def b(x):\n    # note\n    'Single quoted.'\n    return x\n\n\
                   def c(): return 1\n";
        let functions = defs(src);
        let docs: Vec<_> = functions.iter().map(|f| f.doc.as_str()).collect();
        assert_eq!(docs, vec!["Inline.", "Single quoted.", ""]);
    }

    #[test]
    fn string_expression_is_not_a_docstring() {
        let src = "def a(xs):\n    \"-\".join(xs)\n";
        assert_eq!(defs(src)[0].doc, "");
    }

    #[test]
    fn escapes_decoded_in_plain_docstrings() {
        let src = "def a():\n    \"\"\"Tab\\there, quote \\\" and \\d kept.\"\"\"\n";
        assert_eq!(defs(src)[0].doc, "Tab\there, quote \" and \\d kept.");
    }

    #[test]
    fn escaped_quotes_do_not_close() {
        let src = "def a():\n    \"\"\"Say \\\"\"\" twice.\"\"\"\n";
        assert_eq!(defs(src)[0].doc, "Say \"\" twice.");
    }

    #[test]
    fn module_docstring_is_skipped() {
        let src = "\"\"\"Smoothing.\n\nfrom scipy import the filter design\n\"\"\"\n\n\
                   def sg():\n    \"\"\"SG.\"\"\"\n";
        let functions = defs(src);
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].doc, "SG.");
    }

    #[test]
    fn nested_defs_ignored() {
        let src = "class A:\n    def method(self):\n        \"\"\"Nope.\"\"\"\n";
        assert!(defs(src).is_empty());
    }

    #[test]
    fn unterminated_docstring_fails() {
        let err = parse_module("def a():\n    \"\"\"Never closed.\n").unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("docstring of `a` at line 2"), "{}", message);
        assert!(message.contains("unterminated docstring"), "{}", message);

        assert!(parse_module("def b():\n    \"open\n    return 1\n").is_err());
    }

    #[test]
    fn signature_end_skips_strings_and_comments() {
        let lines = [
            "def f(a, b=\"(\",  # (",
            "      c={'k': 1}) -> Dict[str, int]:  # done",
        ];
        assert_eq!(signature_end(&lines, 0), (1, "  # done"));
        assert_eq!(signature_end(&["def g(): pass"], 0), (0, " pass"));
    }

    #[test]
    fn from_imports() {
        let lines = [
            "from .impl import sg as savgol, alma",
            "from ..core import (",
            "    a,  # first",
            "    b as c,",
            ")",
            "from indsl.smooth import *",
        ];

        let (import, end) = parse_from_import(&lines, 0).unwrap().unwrap();
        assert_eq!(end, 0);
        assert_eq!(
            import,
            FromImport {
                level: 1,
                module: "impl".into(),
                names: vec![("sg".into(), "savgol".into()), ("alma".into(), "alma".into())],
                star: false,
            }
        );

        let (import, end) = parse_from_import(&lines, 1).unwrap().unwrap();
        assert_eq!(end, 4);
        assert_eq!(import.level, 2);
        assert_eq!(import.module, "core");
        assert_eq!(
            import.names,
            vec![("a".to_string(), "a".to_string()), ("b".into(), "c".into())]
        );

        let (import, _) = parse_from_import(&lines, 5).unwrap().unwrap();
        assert_eq!(import.module, "indsl.smooth");
        assert!(import.star);

        assert!(parse_from_import(&["import os"], 0).unwrap().is_none());
        assert!(parse_from_import(&["from .x import a b"], 0).is_err());
    }

    #[test]
    fn scan_package() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("indsl");
        write(&root.join("__init__.py"), "from . import smooth\n");
        write(&root.join("smooth/__init__.py"), SMOOTH_INIT);
        write(&root.join("smooth/savgol.py"), SAVGOL);
        write(
            &root.join("smooth/alma.py"),
            "def alma(data):\n    \"\"\"Arnaud Legoux.\"\"\"\n",
        );
        write(&root.join("smooth/unused.py"), "def orphan():\n    pass\n");
        write(&root.join("ts_utils.py"), "def helper():\n    pass\n");
        write(&root.join("empty/__init__.py"), "");
        write(&root.join("notes.txt"), "TOOLBOX_NAME = 'nope'\n");

        let ns = scan(&root).unwrap();
        assert_eq!(ns.name, "indsl");
        let names: Vec<_> = ns.toolboxes.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["smooth", "ts_utils"]);

        let smooth = &ns.toolboxes[0];
        assert_eq!(smooth.display_name.as_deref(), Some("Smooth"));
        // only what the package module imports, not every def under it
        assert_eq!(function_names(smooth), vec!["alma", "sg"]);
        assert_eq!(smooth.exported_functions().count(), 2);
        assert_eq!(function_names(&ns.toolboxes[1]), vec!["helper"]);
    }

    #[test]
    fn aliased_and_cross_package_exports() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("indsl");
        write(&root.join("__init__.py"), "");
        write(
            &root.join("smooth/__init__.py"),
            "from .impl import sg as savgol\n\nTOOLBOX_NAME = \"Smooth\"\n__cognite__ = [\"savgol\"]\n",
        );
        write(
            &root.join("smooth/impl.py"),
            "def sg(data):\n    \"\"\"Savitzky-Golay.\"\"\"\n",
        );
        write(
            &root.join("filter/__init__.py"),
            "from indsl.smooth.impl import sg\nfrom scipy.signal import savgol_filter\n\n\
             TOOLBOX_NAME = \"Filter\"\n__cognite__ = [\"sg\", \"savgol_filter\"]\n",
        );

        let ns = scan(&root).unwrap();
        let filter = &ns.toolboxes[0];
        assert_eq!(function_names(filter), vec!["sg"]);
        assert_eq!(filter.functions[0].doc, "Savitzky-Golay.");
        let smooth = &ns.toolboxes[1];
        assert_eq!(function_names(smooth), vec!["savgol"]);

        let registry = crate::extract::extract(&ns, &GoogleParser, "INDSL").unwrap();
        assert_eq!(registry.get("INDSL_SAVGOL"), Some("Savitzky-Golay."));
        assert_eq!(registry.get("INDSL_SG"), Some("Savitzky-Golay."));
        assert_eq!(registry.get("INDSL_SAVGOL_FILTER"), None);
    }

    #[test]
    fn star_import_follows_all() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("lib");
        write(
            &root.join("ops/__init__.py"),
            "from .impl import *\n__cognite__ = [\"add\", \"sub\"]\n",
        );
        write(
            &root.join("ops/impl.py"),
            "__all__ = [\"add\"]\n\ndef add(a, b):\n    \"\"\"Add.\"\"\"\n\n\
             def sub(a, b):\n    \"\"\"Subtract.\"\"\"\n",
        );

        let ns = scan(&root).unwrap();
        assert_eq!(function_names(&ns.toolboxes[0]), vec!["add"]);
    }

    #[test]
    fn import_cycle_terminates() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("lib");
        write(&root.join("a/__init__.py"), "from .x import f\n__cognite__ = [\"f\"]\n");
        write(
            &root.join("a/x.py"),
            "from .y import g\n\ndef f():\n    \"\"\"F.\"\"\"\n",
        );
        write(&root.join("a/y.py"), "from .x import f\n\ndef g():\n    pass\n");

        let ns = scan(&root).unwrap();
        assert_eq!(function_names(&ns.toolboxes[0]), vec!["f"]);
        assert_eq!(ns.toolboxes[0].functions[0].doc, "F.");
    }

    #[test]
    fn broken_imported_module_fails_scan() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("lib");
        write(&root.join("t/__init__.py"), "from .impl import f\n__cognite__ = [\"f\"]\n");
        write(&root.join("t/impl.py"), "def f():\n    \"\"\"Never closed.\n");

        let message = format!("{:#}", scan(&root).unwrap_err());
        assert!(message.contains("impl.py"), "{}", message);
        assert!(message.contains("unterminated docstring"), "{}", message);
    }
}
