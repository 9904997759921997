//! toolbox-strings — generate `toolboxes.json` from exported toolbox functions.
//!
//! With no arguments, scans the `indsl` package in the working directory and
//! writes `toolboxes.json` next to it:
//!
//! - **package mode**: `toolbox-strings path/to/indsl`
//! - **manifest mode**: `toolbox-strings toolboxes.manifest.json -o out.json`

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use toolbox_strings::docstring::{self, DocStyle};
use toolbox_strings::{extract, loader, DEFAULT_OUTPUT, DEFAULT_PREFIX, DEFAULT_SOURCE};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "toolbox-strings",
    about = "Extract localizable strings from exported toolbox functions into a key/value JSON file"
)]
struct Cli {
    /// Package directory to scan, or a .json namespace manifest
    #[arg(default_value = DEFAULT_SOURCE)]
    source: PathBuf,

    /// Output file, replaced atomically
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Docstring convention of the exported functions
    #[arg(short = 's', long, value_enum, default_value_t = DocStyle::Google)]
    style: DocStyle,

    /// Prefix for every generated key
    #[arg(short = 'p', long, default_value = DEFAULT_PREFIX)]
    prefix: String,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run(&cli)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let namespace = loader::load(&cli.source)
        .with_context(|| format!("failed to load {}", cli.source.display()))?;
    if namespace.is_empty() {
        tracing::warn!(source = %cli.source.display(), "no toolboxes found");
    }

    let parser = docstring::create_parser(cli.style);
    let registry = extract::extract(&namespace, parser.as_ref(), &cli.prefix)
        .with_context(|| format!("failed to extract docstrings from {}", namespace.name))?;

    registry.persist(&cli.output)?;
    tracing::info!(
        toolboxes = namespace.toolboxes.len(),
        keys = registry.len(),
        output = %cli.output.display(),
        "done"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_reproduce_plain_run() {
        let cli = Cli::try_parse_from(["toolbox-strings"]).unwrap();
        assert_eq!(cli.source, PathBuf::from("indsl"));
        assert_eq!(cli.output, PathBuf::from("toolboxes.json"));
        assert_eq!(cli.style, DocStyle::Google);
        assert_eq!(cli.prefix, "INDSL");
    }

    #[test]
    fn style_flag() {
        let cli = Cli::try_parse_from(["toolbox-strings", "--style", "numpy"]).unwrap();
        assert_eq!(cli.style, DocStyle::Numpy);
        assert!(Cli::try_parse_from(["toolbox-strings", "--style", "sphinx"]).is_err());
    }
}
